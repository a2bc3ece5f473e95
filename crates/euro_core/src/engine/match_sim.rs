//! Match Simulator
//!
//! Strength-driven outcome model with bounded scorelines, followed by
//! optional per-player attribution (goals, assists, ratings) when rosters
//! are available.
//!
//! Pipeline for one match:
//! 1. `probabilities`: linear model around a base split, floored and renormalized
//! 2. `play`: outcome bucket, then winner tally and a dependent loser tally
//! 3. `play_extra_time`: single-leg deciders only
//! 4. `attribute`: starting XIs, weighted scorer/assister draws, ratings

use crate::config::{EngineConfig, MatchConfig, PositionWeights, RatingConfig};
use crate::engine::lineup::{select_best_eleven, XI_SIZE};
use crate::engine::player_rating::{match_rating, MatchPerformance};
use crate::error::{EngineError, EngineWarning, Result, WarningLog};
use crate::models::{
    Contribution, ContributionKind, ExtraTime, MatchResult, Outcome, PlayerId, PositionCategory,
    Team, TeamId,
};
use crate::registry::PlayerRegistry;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

/// One fielded player as seen by the attribution step.
#[derive(Debug, Clone)]
struct Fielded {
    id: PlayerId,
    position: PositionCategory,
    effective_skill: f64,
}

pub struct MatchSimulator<'a> {
    match_cfg: &'a MatchConfig,
    rating_cfg: &'a RatingConfig,
}

impl<'a> MatchSimulator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { match_cfg: &config.match_, rating_cfg: &config.rating }
    }

    pub fn probabilities(&self, home: f64, away: f64, neutral: bool) -> OutcomeProbabilities {
        let cfg = self.match_cfg;
        let factor = if neutral { 1.0 } else { cfg.home_advantage_factor };
        let diff = home * factor - away;

        let (base_home, base_away) = if neutral {
            let even = (cfg.base_home_win + cfg.base_away_win()) / 2.0;
            (even, even)
        } else {
            (cfg.base_home_win, cfg.base_away_win())
        };

        let floor = cfg.probability_floor;
        let home_win = (base_home + diff * cfg.win_sensitivity).clamp(floor, cfg.win_cap);
        let away_win = (base_away - diff * cfg.win_sensitivity).clamp(floor, cfg.win_cap);
        let draw = (cfg.base_draw - diff.abs() * cfg.draw_shrink).clamp(floor, cfg.draw_cap);

        let total = home_win + draw + away_win;
        OutcomeProbabilities {
            home_win: home_win / total,
            draw: draw / total,
            away_win: away_win / total,
        }
    }

    /// Scoreline only. No player is touched.
    pub fn play<R: Rng + ?Sized>(
        &self,
        home: &Team,
        away: &Team,
        neutral: bool,
        rng: &mut R,
    ) -> MatchResult {
        let probs = self.probabilities(home.strength(), away.strength(), neutral);
        let (home_goals, away_goals) = self.scoreline(&probs, rng);
        let mut result = MatchResult::scoreline(home.id.clone(), away.id.clone(), home_goals, away_goals);
        result.neutral_venue = neutral;
        result
    }

    fn scoreline<R: Rng + ?Sized>(&self, probs: &OutcomeProbabilities, rng: &mut R) -> (u8, u8) {
        let cfg = self.match_cfg;
        let roll: f64 = rng.gen();
        if roll < probs.home_win {
            let (w, l) = self.decisive_goals(rng);
            (w, l)
        } else if roll < probs.home_win + probs.draw {
            let goals = rng.gen_range(0..=cfg.draw_goals_max);
            (goals, goals)
        } else {
            let (w, l) = self.decisive_goals(rng);
            (l, w)
        }
    }

    /// (winner, loser) with `loser < winner`.
    fn decisive_goals<R: Rng + ?Sized>(&self, rng: &mut R) -> (u8, u8) {
        let cfg = self.match_cfg;
        let winner = rng.gen_range(cfg.winner_goals_min.max(1)..=cfg.winner_goals_max.max(1));
        let margin = cfg.loser_margin_choices.choose(rng).copied().unwrap_or(1).max(1);
        let loser_max = winner.saturating_sub(margin);
        let loser = rng.gen_range(0..=loser_max);
        (winner, loser)
    }

    /// Each side independently gets at most one extra-time goal.
    pub fn play_extra_time<R: Rng + ?Sized>(&self, result: &mut MatchResult, rng: &mut R) {
        let p = self.match_cfg.extra_time_goal_probability;
        let home = u8::from(rng.gen_bool(p));
        let away = u8::from(rng.gen_bool(p));
        result.home_goals += home;
        result.away_goals += away;
        result.extra_time = Some(ExtraTime { home, away });
    }

    /// Pick both XIs, attribute every goal, then rate every fielded player.
    pub fn attribute<R: Rng + ?Sized>(
        &self,
        result: &mut MatchResult,
        home: &Team,
        away: &Team,
        registry: &mut PlayerRegistry,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> Result<()> {
        let home_xi = fielded(home, registry, warnings);
        let away_xi = fielded(away, registry, warnings);

        let mut contributions = Vec::new();
        self.assign_goals(&home.id, result.home_goals, &home_xi, rng, &mut contributions);
        self.assign_goals(&away.id, result.away_goals, &away_xi, rng, &mut contributions);
        registry.record_contributions(&contributions)?;
        result.contributions = contributions;

        for (team, xi) in [(&home.id, &home_xi), (&away.id, &away_xi)] {
            let (_, conceded) = result
                .goals_for(team)
                .ok_or_else(|| EngineError::UnknownTeam(team.clone()))?;
            let outcome = result.outcome_for(team).unwrap_or(Outcome::Draw);
            for member in xi {
                let perf = MatchPerformance {
                    outcome,
                    goals_conceded: conceded,
                    goals: result.count_for(&member.id, ContributionKind::Goal),
                    assists: result.count_for(&member.id, ContributionKind::Assist),
                };
                let rating = {
                    let player = registry
                        .get(&member.id)
                        .ok_or_else(|| EngineError::UnknownPlayer(member.id.clone()))?;
                    match_rating(player, &perf, self.rating_cfg, rng)
                };
                registry.apply_match_rating(&member.id, rating, &self.rating_cfg.form)?;
                if member.position.is_goalkeeper() && conceded == 0 {
                    registry.record_clean_sheet(&member.id)?;
                }
            }
        }
        Ok(())
    }

    fn assign_goals<R: Rng + ?Sized>(
        &self,
        team: &TeamId,
        goals: u8,
        xi: &[Fielded],
        rng: &mut R,
        out: &mut Vec<Contribution>,
    ) {
        let outfield: Vec<&Fielded> = xi.iter().filter(|p| !p.position.is_goalkeeper()).collect();
        if outfield.is_empty() {
            return;
        }
        let cfg = self.match_cfg;
        for _ in 0..goals {
            let scorer = weighted_pick(&outfield, &cfg.scorer_weights, rng);
            out.push(Contribution { player: scorer.id.clone(), team: team.clone(), kind: ContributionKind::Goal });

            if rng.gen_bool(cfg.assist_probability) {
                let others: Vec<&Fielded> =
                    outfield.iter().copied().filter(|p| p.id != scorer.id).collect();
                if others.is_empty() {
                    continue;
                }
                let assister = weighted_pick(&others, &cfg.assister_weights, rng);
                out.push(Contribution {
                    player: assister.id.clone(),
                    team: team.clone(),
                    kind: ContributionKind::Assist,
                });
            }
        }
    }

    /// Scoreline, then attribution when a registry is supplied.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        home: &Team,
        away: &Team,
        neutral: bool,
        registry: Option<&mut PlayerRegistry>,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> Result<MatchResult> {
        let mut result = self.play(home, away, neutral, rng);
        if let Some(registry) = registry {
            self.attribute(&mut result, home, away, registry, rng, warnings)?;
        }
        Ok(result)
    }
}

fn fielded(team: &Team, registry: &PlayerRegistry, warnings: &mut WarningLog) -> Vec<Fielded> {
    let roster = registry.roster(team);
    if roster.is_empty() {
        warnings.push_once(EngineWarning::ScorelineOnly { team: team.id.clone() });
        return Vec::new();
    }
    if roster.len() < XI_SIZE {
        warnings.push_once(EngineWarning::ShortLineup { team: team.id.clone(), available: roster.len() });
    }
    select_best_eleven(&roster, &team.formation_or_default())
        .into_iter()
        .filter_map(|id| registry.get(&id))
        .map(|p| Fielded { id: p.id.clone(), position: p.position, effective_skill: p.effective_skill() })
        .collect()
}

fn weighted_pick<'p, R: Rng + ?Sized>(
    candidates: &[&'p Fielded],
    weights: &PositionWeights,
    rng: &mut R,
) -> &'p Fielded {
    let w: Vec<f64> = candidates
        .iter()
        .map(|p| {
            let factor = match p.position {
                PositionCategory::FWD => weights.fwd,
                PositionCategory::MID => weights.mid,
                PositionCategory::DEF => weights.def,
                PositionCategory::GK => 0.0,
            };
            (p.effective_skill * factor).max(0.0)
        })
        .collect();
    match WeightedIndex::new(&w) {
        Ok(dist) => candidates[dist.sample(rng)],
        Err(_) => candidates[rng.gen_range(0..candidates.len())],
    }
}
