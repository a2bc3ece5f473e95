//! Domestic league season: double round robin, scoreline only.

use crate::config::EngineConfig;
use crate::engine::match_sim::MatchSimulator;
use crate::engine::scheduler::double_round_robin;
use crate::engine::standings::{StandingsRow, StandingsTable};
use crate::error::{EngineError, Result, WarningLog};
use crate::models::{LeagueId, MatchResult, Team, TeamId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonReport {
    pub league: LeagueId,
    pub table: Vec<StandingsRow>,
    pub results: Vec<MatchResult>,
}

impl SeasonReport {
    /// Final finishing order.
    pub fn ranked_ids(&self) -> Vec<TeamId> {
        self.table.iter().map(|r| r.team.clone()).collect()
    }

    pub fn champion(&self) -> Option<&StandingsRow> {
        self.table.first()
    }
}

pub struct DomesticSeason<'a> {
    sim: MatchSimulator<'a>,
}

impl<'a> DomesticSeason<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { sim: MatchSimulator::new(config) }
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        league: &LeagueId,
        teams: &[Team],
        rng: &mut R,
    ) -> Result<SeasonReport> {
        let by_id: HashMap<&TeamId, &Team> = teams.iter().map(|t| (&t.id, t)).collect();
        if by_id.len() != teams.len() {
            return Err(EngineError::data(format!("league {league} lists a club twice")));
        }
        let ids: Vec<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
        let fixtures = double_round_robin(&ids, rng);

        let mut table = StandingsTable::new(teams);
        let mut results = Vec::with_capacity(fixtures.len());
        // Rosters are never attributed here, so the log stays empty.
        let mut warnings = WarningLog::new();
        for fixture in &fixtures {
            let home = by_id
                .get(&fixture.home)
                .ok_or_else(|| EngineError::UnknownTeam(fixture.home.clone()))?;
            let away = by_id
                .get(&fixture.away)
                .ok_or_else(|| EngineError::UnknownTeam(fixture.away.clone()))?;
            let result = self.sim.simulate(home, away, false, None, rng, &mut warnings)?;
            table.apply_result(&result)?;
            results.push(result);
        }

        let table = table.rank();
        if let Some(top) = table.first() {
            tracing::info!(
                league = %league,
                matches = results.len(),
                champion = %top.name,
                points = top.points,
                "domestic season complete"
            );
        }
        Ok(SeasonReport { league: league.clone(), table, results })
    }
}
