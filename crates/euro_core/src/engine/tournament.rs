//! Tournament orchestration: league phase, knockout bracket, awards.
//!
//! A [`Tournament`] owns everything a run mutates (the player registry, the
//! random source and the warning log) and consumes itself in [`Tournament::run`],
//! so a run can never be observed half finished.

use crate::config::{BracketShape, CompetitionFormat, EngineConfig};
use crate::engine::awards::{self, BestPlayer, BestXi, Leaderboards, ManagerAward};
use crate::engine::knockout::{BracketOutcome, KnockoutEngine};
use crate::engine::match_sim::MatchSimulator;
use crate::engine::scheduler::SwissScheduler;
use crate::engine::standings::{StandingsRow, StandingsTable};
use crate::error::{EngineError, EngineWarning, Result, WarningLog};
use crate::models::{Fixture, Manager, MatchResult, Player, Team, TeamId};
use crate::registry::PlayerRegistry;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub struct Tournament<R: Rng = ChaCha8Rng> {
    config: EngineConfig,
    format: CompetitionFormat,
    teams: Vec<Team>,
    managers: Vec<Manager>,
    registry: PlayerRegistry,
    rng: R,
    seed: Option<u64>,
    warnings: WarningLog,
}

impl Tournament<ChaCha8Rng> {
    /// Reproducible tournament: the same seed and inputs give the same report.
    pub fn with_seed(
        config: EngineConfig,
        format: CompetitionFormat,
        teams: Vec<Team>,
        players: Vec<Player>,
        managers: Vec<Manager>,
        seed: u64,
    ) -> Result<Self> {
        let mut tournament = Self::with_rng(
            config,
            format,
            teams,
            players,
            managers,
            ChaCha8Rng::seed_from_u64(seed),
        )?;
        tournament.seed = Some(seed);
        Ok(tournament)
    }
}

impl<R: Rng> Tournament<R> {
    pub fn with_rng(
        config: EngineConfig,
        format: CompetitionFormat,
        teams: Vec<Team>,
        players: Vec<Player>,
        managers: Vec<Manager>,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;
        format.validate()?;

        let mut entered = HashSet::with_capacity(teams.len());
        for team in &teams {
            if !entered.insert(team.id.clone()) {
                return Err(EngineError::DuplicateId(team.id.to_string()));
            }
        }
        if teams.len() != format.team_count {
            tracing::info!(
                competition = %format.name,
                entrants = teams.len(),
                expected = format.team_count,
                "field size differs from format"
            );
        }

        let (kept, dropped): (Vec<Player>, Vec<Player>) =
            players.into_iter().partition(|p| entered.contains(&p.team_id));
        if !dropped.is_empty() {
            tracing::debug!(dropped = dropped.len(), "ignoring players of clubs not entered");
        }
        let registry = PlayerRegistry::from_players(kept, &config.rating.form, &mut rng)?;

        Ok(Self {
            config,
            format,
            teams,
            managers,
            registry,
            rng,
            seed: None,
            warnings: WarningLog::new(),
        })
    }

    pub fn format(&self) -> &CompetitionFormat {
        &self.format
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn run(self) -> Result<TournamentReport> {
        let Tournament {
            config,
            format,
            teams,
            managers,
            mut registry,
            mut rng,
            seed,
            mut warnings,
        } = self;

        tracing::info!(competition = %format.name, teams = teams.len(), ?seed, "tournament starting");

        let ids: Vec<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
        let schedule =
            SwissScheduler::new(&config.schedule).schedule(&ids, format.rounds_per_team, &mut rng);
        warnings.extend(schedule.warnings());

        let by_id: HashMap<TeamId, Team> = teams.iter().map(|t| (t.id.clone(), t.clone())).collect();
        let sim = MatchSimulator::new(&config);
        let mut table = StandingsTable::new(&teams);
        let mut league_results = Vec::with_capacity(schedule.fixtures.len());
        for fixture in schedule.by_round() {
            let home = by_id
                .get(&fixture.home)
                .ok_or_else(|| EngineError::UnknownTeam(fixture.home.clone()))?;
            let away = by_id
                .get(&fixture.away)
                .ok_or_else(|| EngineError::UnknownTeam(fixture.away.clone()))?;
            let result = sim.simulate(home, away, false, Some(&mut registry), &mut rng, &mut warnings)?;
            table.apply_result(&result)?;
            league_results.push(result);
        }
        let league_table = table.rank();
        tracing::info!(
            competition = %format.name,
            matches = league_results.len(),
            leader = league_table.first().map(|r| r.name.as_str()).unwrap_or("-"),
            "league phase finished"
        );

        let ranked: Vec<TeamId> = league_table.iter().map(|r| r.team.clone()).collect();
        let knockout = KnockoutEngine::new(&config, &format).run(
            &ranked,
            &by_id,
            Some(&mut registry),
            &mut rng,
            &mut warnings,
        )?;

        let leaderboards = awards::leaderboards(&registry, &config.awards);
        let best_player = awards::best_player(&registry, &config.awards);
        let best_xi = awards::best_xi(&registry, &config.awards);
        if !best_xi.is_complete() {
            warnings.push(EngineWarning::PartialBestXi { filled: best_xi.picks.len() });
        }

        let (direct, knockout_cut) = match knockout.shape {
            Some(BracketShape::SeededPlayoff { direct, playoff }) => (direct, direct + playoff),
            Some(BracketShape::Straight { size }) => (size, size),
            None => (0, 0),
        };
        let manager_shortlist =
            awards::manager_rankings(&managers, &league_table, direct, knockout_cut, &config.awards);
        let manager_of_the_tournament = manager_shortlist.first().cloned();

        let mut fixtures = schedule.fixtures;
        fixtures.sort_by_key(|f| f.round);

        Ok(TournamentReport {
            competition: format.name,
            seed,
            teams,
            fixtures,
            fallback_teams: schedule.fallback_teams,
            league_results,
            league_table,
            champion: knockout.champion.clone(),
            runner_up: knockout.runner_up.clone(),
            knockout,
            leaderboards,
            best_player,
            best_xi,
            manager_of_the_tournament,
            manager_shortlist,
            players: registry.into_players(),
            warnings: warnings.into_vec(),
        })
    }
}

/// Everything a finished run produced, as plain data for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub competition: String,
    pub seed: Option<u64>,
    pub teams: Vec<Team>,
    pub fixtures: Vec<Fixture>,
    /// Teams that needed the fallback pass to complete their league schedule.
    pub fallback_teams: Vec<TeamId>,
    pub league_results: Vec<MatchResult>,
    pub league_table: Vec<StandingsRow>,
    pub knockout: BracketOutcome,
    pub champion: Option<TeamId>,
    pub runner_up: Option<TeamId>,
    pub leaderboards: Leaderboards,
    pub best_player: Option<BestPlayer>,
    pub best_xi: BestXi,
    pub manager_of_the_tournament: Option<ManagerAward>,
    pub manager_shortlist: Vec<ManagerAward>,
    pub players: Vec<Player>,
    pub warnings: Vec<EngineWarning>,
}

impl TournamentReport {
    pub fn team_name<'a>(&'a self, id: &'a TeamId) -> &'a str {
        self.teams
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or(id.as_str())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
