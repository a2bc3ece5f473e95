//! Knockout Bracket Engine
//!
//! Resolves two-legged ties and single-leg deciders, then walks the bracket
//! round by round until one team is left. Every round after the playoff is
//! reseeded by shuffling the winners.

use crate::config::{BracketShape, CompetitionFormat, EngineConfig, ShootoutConfig};
use crate::engine::match_sim::MatchSimulator;
use crate::error::{EngineError, EngineWarning, Result, WarningLog};
use crate::models::{KnockoutStage, MatchResult, PenaltyShootoutResult, Team, TeamId};
use crate::registry::PlayerRegistry;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a tie was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieMethod {
    Normal,
    AwayGoals,
    ExtraTime,
    Penalties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutTie {
    pub stage: KnockoutStage,
    /// Hosts the first leg (nominal home side of a single-leg match).
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub legs: Vec<MatchResult>,
    /// Goals over all legs, extra time included: (team_a, team_b).
    pub aggregate: (u32, u32),
    /// Shootout oriented with `home` = `team_a`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shootout: Option<PenaltyShootoutResult>,
    pub winner: TeamId,
    pub method: TieMethod,
}

impl KnockoutTie {
    pub fn loser(&self) -> &TeamId {
        if self.winner == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }

    pub fn is_single_leg(&self) -> bool {
        self.legs.len() == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutRound {
    pub stage: KnockoutStage,
    pub ties: Vec<KnockoutTie>,
}

impl KnockoutRound {
    pub fn winners(&self) -> Vec<TeamId> {
        self.ties.iter().map(|t| t.winner.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketOutcome {
    /// Shape actually played; `None` when there was no knockout stage.
    pub shape: Option<BracketShape>,
    pub rounds: Vec<KnockoutRound>,
    pub champion: Option<TeamId>,
    pub runner_up: Option<TeamId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shootout {
    pub result: PenaltyShootoutResult,
    /// Sudden death hit the cap and a coin toss decided it.
    pub capped: bool,
}

/// Five kicks each (configurable), then sudden death until a round ends
/// with the sides level no longer.
pub fn penalty_shootout<R: Rng + ?Sized>(cfg: &ShootoutConfig, rng: &mut R) -> Shootout {
    let p = cfg.conversion_probability;
    let (mut home, mut away) = (0u8, 0u8);
    for _ in 0..cfg.kicks_per_side {
        home += u8::from(rng.gen_bool(p));
        away += u8::from(rng.gen_bool(p));
    }

    let mut rounds = 0u8;
    let mut capped = false;
    while home == away {
        if rounds >= cfg.sudden_death_cap {
            if rng.gen_bool(0.5) {
                home += 1;
            } else {
                away += 1;
            }
            capped = true;
            break;
        }
        rounds += 1;
        home = home.saturating_add(u8::from(rng.gen_bool(p)));
        away = away.saturating_add(u8::from(rng.gen_bool(p)));
    }

    Shootout { result: PenaltyShootoutResult { home, away, sudden_death_rounds: rounds }, capped }
}

/// Winner of a two-legged tie on goals, or on away goals when the rule is
/// on. `None` means a shootout is needed. `leg1` is hosted by `a`.
pub fn settle_aggregate(
    a: &TeamId,
    b: &TeamId,
    leg1: &MatchResult,
    leg2: &MatchResult,
    away_goals_rule: bool,
) -> Option<(TeamId, TieMethod)> {
    let agg_a = leg1.home_goals as u32 + leg2.away_goals as u32;
    let agg_b = leg1.away_goals as u32 + leg2.home_goals as u32;
    if agg_a != agg_b {
        let winner = if agg_a > agg_b { a } else { b };
        return Some((winner.clone(), TieMethod::Normal));
    }
    if away_goals_rule && leg2.away_goals != leg1.away_goals {
        let winner = if leg2.away_goals > leg1.away_goals { a } else { b };
        return Some((winner.clone(), TieMethod::AwayGoals));
    }
    None
}

fn lookup<'t>(teams: &'t HashMap<TeamId, Team>, id: &TeamId) -> Result<&'t Team> {
    teams.get(id).ok_or_else(|| EngineError::UnknownTeam(id.clone()))
}

pub struct KnockoutEngine<'a> {
    config: &'a EngineConfig,
    format: &'a CompetitionFormat,
    sim: MatchSimulator<'a>,
}

impl<'a> KnockoutEngine<'a> {
    pub fn new(config: &'a EngineConfig, format: &'a CompetitionFormat) -> Self {
        Self { config, format, sim: MatchSimulator::new(config) }
    }

    pub fn away_goals_rule(&self) -> bool {
        self.format.away_goals(self.config.use_away_goals_rule)
    }

    fn shootout<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> PenaltyShootoutResult {
        let shootout = penalty_shootout(&self.config.shootout, rng);
        if shootout.capped {
            warnings.push(EngineWarning::ShootoutCapReached {
                rounds: shootout.result.sudden_death_rounds as usize,
            });
        }
        shootout.result
    }

    pub fn resolve_tie<R: Rng + ?Sized>(
        &self,
        stage: KnockoutStage,
        a: &Team,
        b: &Team,
        two_legged: bool,
        mut registry: Option<&mut PlayerRegistry>,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> Result<KnockoutTie> {
        if !two_legged {
            return self.resolve_single_leg(stage, a, b, registry, rng, warnings);
        }

        let mut leg1 = self.sim.play(a, b, false, rng);
        if let Some(reg) = registry.as_deref_mut() {
            self.sim.attribute(&mut leg1, a, b, reg, rng, warnings)?;
        }
        let mut leg2 = self.sim.play(b, a, false, rng);
        if let Some(reg) = registry.as_deref_mut() {
            self.sim.attribute(&mut leg2, b, a, reg, rng, warnings)?;
        }

        let aggregate = (
            leg1.home_goals as u32 + leg2.away_goals as u32,
            leg1.away_goals as u32 + leg2.home_goals as u32,
        );
        let (winner, method, shootout) =
            match settle_aggregate(&a.id, &b.id, &leg1, &leg2, self.away_goals_rule()) {
                Some((winner, method)) => (winner, method, None),
                None => {
                    let s = self.shootout(rng, warnings);
                    let winner = if s.home_won() { a.id.clone() } else { b.id.clone() };
                    (winner, TieMethod::Penalties, Some(s))
                }
            };

        tracing::debug!(
            %stage,
            a = %a.id,
            b = %b.id,
            ?aggregate,
            winner = %winner,
            ?method,
            "tie resolved"
        );
        Ok(KnockoutTie {
            stage,
            team_a: a.id.clone(),
            team_b: b.id.clone(),
            legs: vec![leg1, leg2],
            aggregate,
            shootout,
            winner,
            method,
        })
    }

    fn resolve_single_leg<R: Rng + ?Sized>(
        &self,
        stage: KnockoutStage,
        a: &Team,
        b: &Team,
        registry: Option<&mut PlayerRegistry>,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> Result<KnockoutTie> {
        let mut result = self.sim.play(a, b, true, rng);
        let mut method = TieMethod::Normal;
        if result.home_goals == result.away_goals {
            self.sim.play_extra_time(&mut result, rng);
            method = TieMethod::ExtraTime;
            if result.home_goals == result.away_goals {
                result.penalties = Some(self.shootout(rng, warnings));
                method = TieMethod::Penalties;
            }
        }
        if let Some(reg) = registry {
            self.sim.attribute(&mut result, a, b, reg, rng, warnings)?;
        }

        let winner = result.winner().cloned().ok_or_else(|| {
            EngineError::data(format!("{} vs {} ended without a winner", a.id, b.id))
        })?;
        tracing::debug!(
            %stage,
            a = %a.id,
            b = %b.id,
            home = result.home_goals,
            away = result.away_goals,
            winner = %winner,
            ?method,
            "single-leg tie resolved"
        );

        Ok(KnockoutTie {
            stage,
            team_a: a.id.clone(),
            team_b: b.id.clone(),
            aggregate: (result.home_goals as u32, result.away_goals as u32),
            shootout: result.penalties,
            legs: vec![result],
            winner,
            method,
        })
    }

    fn play_round<R: Rng + ?Sized>(
        &self,
        stage: KnockoutStage,
        pairs: &[(TeamId, TeamId)],
        two_legged: bool,
        teams: &HashMap<TeamId, Team>,
        mut registry: Option<&mut PlayerRegistry>,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> Result<KnockoutRound> {
        let mut ties = Vec::with_capacity(pairs.len());
        for (a, b) in pairs {
            let (team_a, team_b) = (lookup(teams, a)?, lookup(teams, b)?);
            let tie = self.resolve_tie(
                stage,
                team_a,
                team_b,
                two_legged,
                registry.as_deref_mut(),
                rng,
                warnings,
            )?;
            if let Some(reg) = registry.as_deref_mut() {
                let bonus = self.config.stage_bonus.for_stage(stage);
                reg.apply_stage_bonus(lookup(teams, &tie.winner)?, bonus);
            }
            ties.push(tie);
        }
        tracing::info!(%stage, ties = ties.len(), "knockout round complete");
        Ok(KnockoutRound { stage, ties })
    }

    /// Run the whole bracket from league-phase finishers in ranked order.
    pub fn run<R: Rng + ?Sized>(
        &self,
        ranked: &[TeamId],
        teams: &HashMap<TeamId, Team>,
        mut registry: Option<&mut PlayerRegistry>,
        rng: &mut R,
        warnings: &mut WarningLog,
    ) -> Result<BracketOutcome> {
        let configured = self.format.bracket;
        let Some(shape) = configured.fit(ranked.len()) else {
            warnings.push(EngineWarning::NoKnockout { qualifiers: ranked.len() });
            return Ok(BracketOutcome::default());
        };
        if shape != configured {
            warnings.push(EngineWarning::ReducedBracket {
                expected: configured.entrants(),
                actual: ranked.len(),
            });
        }

        let two_legged = self.format.two_legged_rounds;
        let mut rounds = Vec::new();
        let mut participants: Vec<TeamId> = match shape {
            BracketShape::SeededPlayoff { direct, playoff } => {
                let pool = &ranked[direct..direct + playoff];
                let pairs: Vec<(TeamId, TeamId)> = (0..playoff / 2)
                    .map(|i| (pool[i].clone(), pool[playoff - 1 - i].clone()))
                    .collect();
                let round = self.play_round(
                    KnockoutStage::PlayoffRound,
                    &pairs,
                    two_legged,
                    teams,
                    registry.as_deref_mut(),
                    rng,
                    warnings,
                )?;
                let mut next = ranked[..direct].to_vec();
                next.extend(round.winners());
                rounds.push(round);
                next
            }
            BracketShape::Straight { size } => ranked[..size].to_vec(),
        };

        let mut runner_up = None;
        while participants.len() > 1 {
            participants.shuffle(rng);
            let stage = KnockoutStage::for_participants(participants.len());
            let single = !two_legged || (stage.is_final() && self.format.single_leg_final);

            let mut pairs = Vec::with_capacity(participants.len() / 2);
            let mut byes = Vec::new();
            for chunk in participants.chunks(2) {
                match chunk {
                    [a, b] => pairs.push((a.clone(), b.clone())),
                    [a] => byes.push(a.clone()),
                    _ => {}
                }
            }

            let round = self.play_round(
                stage,
                &pairs,
                !single,
                teams,
                registry.as_deref_mut(),
                rng,
                warnings,
            )?;
            if stage.is_final() {
                runner_up = round.ties.first().map(|t| t.loser().clone());
            }
            participants = round.winners();
            participants.extend(byes);
            rounds.push(round);
        }

        let champion = participants.pop();
        if let Some(champion) = &champion {
            tracing::info!(competition = %self.format.name, champion = %champion, "champion decided");
        }
        Ok(BracketOutcome { shape: Some(shape), rounds, champion, runner_up })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrengthBounds;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(id: &str, strength: f64) -> Team {
        Team::new(id, id, "ENG", strength, &StrengthBounds::default()).unwrap()
    }

    fn field(n: usize) -> (Vec<TeamId>, HashMap<TeamId, Team>) {
        let teams: Vec<Team> = (0..n).map(|i| team(&format!("t{:02}", i), 90.0 - i as f64)).collect();
        let ranked = teams.iter().map(|t| t.id.clone()).collect();
        (ranked, teams.into_iter().map(|t| (t.id.clone(), t)).collect())
    }

    #[test]
    fn aggregate_win_without_shootout() {
        let (a, b) = (TeamId::from("a"), TeamId::from("b"));
        let leg1 = MatchResult::scoreline(a.clone(), b.clone(), 2, 1);
        let leg2 = MatchResult::scoreline(b.clone(), a.clone(), 1, 1);
        assert_eq!(settle_aggregate(&a, &b, &leg1, &leg2, false), Some((a.clone(), TieMethod::Normal)));
        assert_eq!(settle_aggregate(&a, &b, &leg1, &leg2, true), Some((a, TieMethod::Normal)));
    }

    #[test]
    fn away_goals_only_when_enabled() {
        let (a, b) = (TeamId::from("a"), TeamId::from("b"));
        let leg1 = MatchResult::scoreline(a.clone(), b.clone(), 0, 1);
        let leg2 = MatchResult::scoreline(b.clone(), a.clone(), 1, 2);
        assert_eq!(settle_aggregate(&a, &b, &leg1, &leg2, false), None);
        assert_eq!(settle_aggregate(&a, &b, &leg1, &leg2, true), Some((a, TieMethod::AwayGoals)));

        // level on away goals too
        let leg1 = MatchResult::scoreline("a".into(), "b".into(), 1, 1);
        let leg2 = MatchResult::scoreline("b".into(), "a".into(), 1, 1);
        assert_eq!(settle_aggregate(&"a".into(), &"b".into(), &leg1, &leg2, true), None);
    }

    #[test]
    fn shootout_is_reproducible_and_always_decided() {
        let cfg = ShootoutConfig::default();
        for seed in 0..500 {
            let first = penalty_shootout(&cfg, &mut ChaCha8Rng::seed_from_u64(seed));
            let second = penalty_shootout(&cfg, &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(first, second);
            assert_ne!(first.result.home, first.result.away);
            assert!(first.result.sudden_death_rounds <= cfg.sudden_death_cap);
        }
    }

    #[test]
    fn regulation_tie_rate_matches_binomial() {
        let cfg = ShootoutConfig::default();
        let p = cfg.conversion_probability;
        let n = cfg.kicks_per_side as u32;
        let binom = |k: u32| {
            let c = (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64);
            c * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
        };
        let expected: f64 = (0..=n).map(|k| binom(k).powi(2)).sum();

        let trials = 20_000;
        let ties = (0..trials)
            .filter(|&seed| {
                penalty_shootout(&cfg, &mut ChaCha8Rng::seed_from_u64(seed)).result.sudden_death_rounds > 0
            })
            .count();
        let observed = ties as f64 / trials as f64;
        assert!((observed - expected).abs() < 0.02, "observed {} expected {}", observed, expected);
    }

    #[test]
    fn certain_kicks_hit_the_cap() {
        let cfg = ShootoutConfig { conversion_probability: 1.0, ..ShootoutConfig::default() };
        let s = penalty_shootout(&cfg, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(s.capped);
        assert_eq!(s.result.sudden_death_rounds, cfg.sudden_death_cap);
        assert_ne!(s.result.home, s.result.away);
    }

    #[test]
    fn level_ties_always_produce_one_winner() {
        let config = EngineConfig::default();
        let format = CompetitionFormat::champions_league();
        let engine = KnockoutEngine::new(&config, &format);
        let (a, b) = (team("a", 70.0), team("b", 70.0));
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut warnings = WarningLog::new();
        let mut shootouts = 0;
        for _ in 0..300 {
            let tie = engine
                .resolve_tie(KnockoutStage::RoundOf16, &a, &b, true, None, &mut rng, &mut warnings)
                .unwrap();
            assert!(tie.winner == a.id || tie.winner == b.id);
            match tie.method {
                TieMethod::Normal => assert_ne!(tie.aggregate.0, tie.aggregate.1),
                TieMethod::Penalties => {
                    shootouts += 1;
                    assert_eq!(tie.aggregate.0, tie.aggregate.1);
                    let s = tie.shootout.unwrap();
                    assert_eq!(s.home_won(), tie.winner == a.id);
                }
                other => panic!("unexpected method {:?} with away goals off", other),
            }
        }
        assert!(shootouts > 0);
    }

    #[test]
    fn away_goals_rule_decides_or_falls_through_to_penalties() {
        let config = EngineConfig::legacy();
        let format = CompetitionFormat::champions_league();
        let engine = KnockoutEngine::new(&config, &format);
        let (a, b) = (team("a", 70.0), team("b", 70.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1904);
        let mut warnings = WarningLog::new();
        let (mut on_away_goals, mut on_penalties) = (0, 0);
        for _ in 0..2000 {
            let tie = engine
                .resolve_tie(KnockoutStage::RoundOf16, &a, &b, true, None, &mut rng, &mut warnings)
                .unwrap();
            assert!(tie.winner == a.id || tie.winner == b.id);
            assert_eq!(tie.legs.len(), 2);
            let (leg1, leg2) = (&tie.legs[0], &tie.legs[1]);
            // away goals: a scores them in leg 2, b in leg 1
            let (away_a, away_b) = (leg2.away_goals, leg1.away_goals);
            match tie.method {
                TieMethod::Normal => assert_ne!(tie.aggregate.0, tie.aggregate.1),
                TieMethod::AwayGoals => {
                    on_away_goals += 1;
                    assert_eq!(tie.aggregate.0, tie.aggregate.1);
                    assert_ne!(away_a, away_b);
                    assert_eq!(tie.winner == a.id, away_a > away_b);
                    assert!(tie.shootout.is_none());
                }
                TieMethod::Penalties => {
                    on_penalties += 1;
                    assert_eq!(tie.aggregate.0, tie.aggregate.1);
                    assert_eq!(away_a, away_b);
                    let s = tie.shootout.unwrap();
                    assert_eq!(s.home_won(), tie.winner == a.id);
                }
                TieMethod::ExtraTime => panic!("extra time in a two-legged tie"),
            }
        }
        assert!(on_away_goals > 0);
        assert!(on_penalties > 0);
    }

    #[test]
    fn single_leg_final_is_neutral_and_decided() {
        let config = EngineConfig::default();
        let format = CompetitionFormat::champions_league();
        let engine = KnockoutEngine::new(&config, &format);
        let (a, b) = (team("a", 70.0), team("b", 70.0));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut warnings = WarningLog::new();
        for _ in 0..200 {
            let tie = engine
                .resolve_tie(KnockoutStage::Final, &a, &b, false, None, &mut rng, &mut warnings)
                .unwrap();
            let leg = &tie.legs[0];
            assert!(tie.is_single_leg() && leg.neutral_venue);
            match tie.method {
                TieMethod::Normal => assert!(leg.extra_time.is_none()),
                TieMethod::ExtraTime => assert!(leg.extra_time.is_some() && leg.penalties.is_none()),
                TieMethod::Penalties => assert!(leg.penalties.is_some()),
                TieMethod::AwayGoals => panic!("away goals in a single match"),
            }
            assert_eq!(leg.winner(), Some(&tie.winner));
        }
    }

    #[test]
    fn champions_league_bracket_runs_to_a_champion() {
        let config = EngineConfig::default();
        let format = CompetitionFormat::champions_league();
        let engine = KnockoutEngine::new(&config, &format);
        let (ranked, teams) = field(36);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut warnings = WarningLog::new();

        let outcome = engine.run(&ranked, &teams, None, &mut rng, &mut warnings).unwrap();
        let stages: Vec<KnockoutStage> = outcome.rounds.iter().map(|r| r.stage).collect();
        assert_eq!(
            stages,
            vec![
                KnockoutStage::PlayoffRound,
                KnockoutStage::RoundOf16,
                KnockoutStage::QuarterFinal,
                KnockoutStage::SemiFinal,
                KnockoutStage::Final,
            ]
        );

        let playoff = &outcome.rounds[0];
        assert_eq!(playoff.ties.len(), 8);
        // 9th hosts 24th first
        assert_eq!(playoff.ties[0].team_a, ranked[8]);
        assert_eq!(playoff.ties[0].team_b, ranked[23]);
        assert!(playoff.ties.iter().all(|t| !ranked[..8].contains(&t.team_a) && !ranked[..8].contains(&t.team_b)));

        let final_tie = &outcome.rounds[4].ties[0];
        assert!(final_tie.is_single_leg());
        assert_eq!(outcome.champion.as_ref(), Some(&final_tie.winner));
        assert_eq!(outcome.runner_up.as_ref(), Some(final_tie.loser()));
        assert!(warnings.entries().iter().all(|w| matches!(w, EngineWarning::ShootoutCapReached { .. })));
    }

    #[test]
    fn short_field_plays_reduced_bracket() {
        let config = EngineConfig::default();
        let format = CompetitionFormat::champions_league();
        let engine = KnockoutEngine::new(&config, &format);
        let (ranked, teams) = field(20);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut warnings = WarningLog::new();

        let outcome = engine.run(&ranked, &teams, None, &mut rng, &mut warnings).unwrap();
        assert_eq!(outcome.shape, Some(BracketShape::Straight { size: 16 }));
        assert_eq!(outcome.rounds[0].stage, KnockoutStage::RoundOf16);
        assert!(outcome.champion.is_some());
        assert!(warnings.entries().contains(&EngineWarning::ReducedBracket { expected: 24, actual: 20 }));
    }

    #[test]
    fn single_qualifier_means_no_knockout() {
        let config = EngineConfig::default();
        let format = CompetitionFormat::champions_league();
        let engine = KnockoutEngine::new(&config, &format);
        let (ranked, teams) = field(1);
        let mut warnings = WarningLog::new();
        let outcome = engine
            .run(&ranked, &teams, None, &mut ChaCha8Rng::seed_from_u64(0), &mut warnings)
            .unwrap();
        assert_eq!(outcome, BracketOutcome::default());
        assert_eq!(warnings.entries(), &[EngineWarning::NoKnockout { qualifiers: 1 }]);
    }
}
