//! Per-match player ratings.

use crate::config::RatingConfig;
use crate::models::{Outcome, Player, PositionCategory};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// What happened to one player's team in one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPerformance {
    pub outcome: Outcome,
    pub goals_conceded: u8,
    pub goals: u32,
    pub assists: u32,
}

/// Rating before noise, rounding and clamping.
pub fn base_rating(player: &Player, perf: &MatchPerformance, cfg: &RatingConfig) -> f64 {
    let mut rating = cfg.anchor;

    rating += match perf.outcome {
        Outcome::Win => cfg.win_bonus,
        Outcome::Draw => cfg.draw_bonus,
        Outcome::Loss => 0.0,
    };
    rating += perf.goals as f64 * cfg.goal_bonus;
    rating += perf.assists as f64 * cfg.assist_bonus;

    let conceded = perf.goals_conceded as f64;
    match player.position {
        PositionCategory::GK => {
            if perf.goals_conceded == 0 {
                rating += cfg.gk_clean_sheet_bonus;
            }
            rating -= conceded * cfg.gk_conceded_penalty;
        }
        PositionCategory::DEF => {
            if perf.goals_conceded == 0 {
                rating += cfg.def_clean_sheet_bonus;
            }
            rating -= conceded * cfg.def_conceded_penalty;
        }
        _ => {}
    }

    rating += (player.skill - cfg.reference_skill) / cfg.skill_divisor;
    rating += (player.form() - 1.0) * cfg.form_influence;
    rating
}

/// Full match rating: base plus normal noise, rounded to one decimal and
/// clamped to `[min_rating, max_rating]`.
pub fn match_rating<R: Rng + ?Sized>(
    player: &Player,
    perf: &MatchPerformance,
    cfg: &RatingConfig,
    rng: &mut R,
) -> f64 {
    let noise = match Normal::new(0.0, cfg.noise_std_dev) {
        Ok(normal) => normal.sample(rng),
        Err(_) => 0.0,
    };
    let rating = ((base_rating(player, perf, cfg) + noise) * 10.0).round() / 10.0;
    rating.clamp(cfg.min_rating, cfg.max_rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn perf(outcome: Outcome, conceded: u8, goals: u32, assists: u32) -> MatchPerformance {
        MatchPerformance { outcome, goals_conceded: conceded, goals, assists }
    }

    #[test]
    fn reference_player_in_a_quiet_draw_sits_near_anchor() {
        let cfg = RatingConfig::default();
        let mid = Player::new("m", "M", "t", PositionCategory::MID, 75.0);
        assert!((base_rating(&mid, &perf(Outcome::Draw, 1, 0, 0), &cfg) - 6.3).abs() < 1e-9);
    }

    #[test]
    fn goalkeeper_clean_sheet_and_conceded_goals() {
        let cfg = RatingConfig::default();
        let gk = Player::new("g", "G", "t", PositionCategory::GK, 75.0);
        let clean = base_rating(&gk, &perf(Outcome::Win, 0, 0, 0), &cfg);
        let leaky = base_rating(&gk, &perf(Outcome::Loss, 4, 0, 0), &cfg);
        assert!((clean - 7.7).abs() < 1e-9);
        assert!((leaky - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_noise_is_deterministic() {
        let mut cfg = RatingConfig::default();
        cfg.noise_std_dev = 0.0;
        let fwd = Player::new("f", "F", "t", PositionCategory::FWD, 85.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // 6.0 + 0.7 + 2 * 1.2 + 0.8 + 0.2
        assert_eq!(match_rating(&fwd, &perf(Outcome::Win, 0, 2, 1), &cfg, &mut rng), 10.0);
    }

    proptest! {
        #[test]
        fn rating_always_within_bounds(
            seed in any::<u64>(),
            skill in 0.0f64..100.0,
            goals in 0u32..6,
            assists in 0u32..6,
            conceded in 0u8..9,
            outcome_idx in 0usize..3,
            pos_idx in 0usize..4,
        ) {
            let cfg = RatingConfig::default();
            let positions = [PositionCategory::GK, PositionCategory::DEF, PositionCategory::MID, PositionCategory::FWD];
            let outcomes = [Outcome::Win, Outcome::Draw, Outcome::Loss];
            let player = Player::new("p", "P", "t", positions[pos_idx], skill);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let r = match_rating(&player, &perf(outcomes[outcome_idx], conceded, goals, assists), &cfg, &mut rng);
            prop_assert!((4.0..=10.0).contains(&r));
        }
    }
}
