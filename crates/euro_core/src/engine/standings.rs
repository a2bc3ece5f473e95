//! League table. Deterministic: ranking depends only on the results applied.

use crate::error::{EngineError, Result};
use crate::models::{MatchResult, Outcome, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: TeamId,
    pub name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl StandingsRow {
    pub fn new(team: TeamId, name: impl Into<String>) -> Self {
        Self {
            team,
            name: name.into(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            self.won as f64 / self.played as f64
        }
    }

    fn record(&mut self, scored: u8, conceded: u8) {
        let outcome = Outcome::from_goals(scored, conceded);
        self.played += 1;
        self.goals_for += scored as u32;
        self.goals_against += conceded as u32;
        self.points += outcome.points();
        match outcome {
            Outcome::Win => self.won += 1,
            Outcome::Draw => self.drawn += 1,
            Outcome::Loss => self.lost += 1,
        }
    }
}

/// Points, goal difference, goals scored, then name and id.
pub fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.team.cmp(&b.team))
}

#[derive(Debug, Clone, Default)]
pub struct StandingsTable {
    rows: HashMap<TeamId, StandingsRow>,
}

impl StandingsTable {
    pub fn new<'t>(teams: impl IntoIterator<Item = &'t Team>) -> Self {
        let rows = teams
            .into_iter()
            .map(|t| (t.id.clone(), StandingsRow::new(t.id.clone(), t.name.clone())))
            .collect();
        Self { rows }
    }

    /// Apply one completed match to both participants. Shootouts do not count.
    pub fn apply_result(&mut self, result: &MatchResult) -> Result<()> {
        if result.home == result.away {
            return Err(EngineError::data(format!("{} cannot play itself", result.home)));
        }
        for team in [&result.home, &result.away] {
            if !self.rows.contains_key(team) {
                return Err(EngineError::UnknownTeam(team.clone()));
            }
        }
        if let Some(row) = self.rows.get_mut(&result.home) {
            row.record(result.home_goals, result.away_goals);
        }
        if let Some(row) = self.rows.get_mut(&result.away) {
            row.record(result.away_goals, result.home_goals);
        }
        Ok(())
    }

    pub fn row(&self, team: &TeamId) -> Option<&StandingsRow> {
        self.rows.get(team)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rank(&self) -> Vec<StandingsRow> {
        let mut rows: Vec<StandingsRow> = self.rows.values().cloned().collect();
        rows.sort_by(compare_rows);
        rows
    }

    /// 1-based league position.
    pub fn position_of(&self, team: &TeamId) -> Option<usize> {
        self.rank().iter().position(|r| &r.team == team).map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrengthBounds;
    use proptest::prelude::*;

    fn teams(names: &[&str]) -> Vec<Team> {
        names
            .iter()
            .map(|n| Team::new(*n, *n, "ENG", 70.0, &StrengthBounds::default()).unwrap())
            .collect()
    }

    fn result(h: &str, a: &str, hg: u8, ag: u8) -> MatchResult {
        MatchResult::scoreline(h.into(), a.into(), hg, ag)
    }

    #[test]
    fn goals_for_only_breaks_ties_after_goal_difference() {
        let ts = teams(&["first", "second", "third", "x", "y", "z"]);
        let mut table = StandingsTable::new(&ts);
        // first: (6, +3, 5)
        table.apply_result(&result("first", "x", 3, 0)).unwrap();
        table.apply_result(&result("first", "y", 2, 2)).unwrap();
        table.apply_result(&result("first", "z", 0, 0)).unwrap();
        table.apply_result(&result("first", "x", 0, 0)).unwrap();
        table.apply_result(&result("first", "y", 0, 0)).unwrap();
        table.apply_result(&result("first", "z", 0, 0)).unwrap();
        // second: (6, +3, 4)
        table.apply_result(&result("second", "x", 3, 0)).unwrap();
        table.apply_result(&result("second", "y", 1, 1)).unwrap();
        table.apply_result(&result("second", "z", 0, 0)).unwrap();
        table.apply_result(&result("second", "x", 0, 0)).unwrap();
        table.apply_result(&result("second", "y", 0, 0)).unwrap();
        table.apply_result(&result("second", "z", 0, 0)).unwrap();
        // third: (6, +1, 7)
        table.apply_result(&result("third", "x", 4, 3)).unwrap();
        table.apply_result(&result("third", "y", 3, 3)).unwrap();
        table.apply_result(&result("third", "z", 0, 0)).unwrap();
        table.apply_result(&result("third", "x", 0, 0)).unwrap();
        table.apply_result(&result("third", "y", 0, 0)).unwrap();
        table.apply_result(&result("third", "z", 0, 0)).unwrap();

        let key = |t: &str| {
            let r = table.row(&t.into()).unwrap();
            (r.points, r.goal_difference(), r.goals_for)
        };
        assert_eq!(key("first"), (8, 3, 5));
        assert_eq!(key("second"), (8, 3, 4));
        assert_eq!(key("third"), (8, 1, 7));

        let order: Vec<String> = table.rank().into_iter().take(3).map(|r| r.name).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn exact_six_point_tie_break_chain() {
        let mut a = StandingsRow::new("a".into(), "A");
        let mut b = StandingsRow::new("b".into(), "B");
        let mut c = StandingsRow::new("c".into(), "C");
        for (row, gf, ga) in [(&mut c, 7, 6), (&mut b, 4, 1), (&mut a, 5, 2)] {
            row.points = 6;
            row.goals_for = gf;
            row.goals_against = ga;
        }
        let mut rows = vec![c.clone(), b.clone(), a.clone()];
        rows.sort_by(compare_rows);
        assert_eq!(rows, vec![a, b, c]);
    }

    #[test]
    fn name_is_last_resort() {
        let ts = teams(&["beta", "alpha"]);
        let table = StandingsTable::new(&ts);
        let names: Vec<String> = table.rank().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(table.position_of(&"beta".into()), Some(2));
    }

    #[test]
    fn unknown_team_is_rejected() {
        let ts = teams(&["a"]);
        let mut table = StandingsTable::new(&ts);
        assert!(matches!(
            table.apply_result(&result("a", "ghost", 1, 0)),
            Err(EngineError::UnknownTeam(_))
        ));
        assert_eq!(table.row(&"a".into()).unwrap().played, 0);
    }

    proptest! {
        #[test]
        fn ranking_is_deterministic(results in prop::collection::vec((0usize..6, 0usize..6, 0u8..5, 0u8..5), 0..60)) {
            let names = ["a", "b", "c", "d", "e", "f"];
            let ts = teams(&names);
            let matches: Vec<MatchResult> = results
                .iter()
                .filter(|(h, a, _, _)| h != a)
                .map(|&(h, a, hg, ag)| result(names[h], names[a], hg, ag))
                .collect();

            let build = || {
                let mut table = StandingsTable::new(&ts);
                for m in &matches {
                    table.apply_result(m).unwrap();
                }
                table.rank()
            };
            let first = build();
            prop_assert_eq!(&first, &build());

            let played: u32 = first.iter().map(|r| r.played).sum();
            prop_assert_eq!(played as usize, 2 * matches.len());
            let points: u32 = first.iter().map(|r| r.points).sum();
            let draws = matches.iter().filter(|m| m.home_goals == m.away_goals).count() as u32;
            prop_assert_eq!(points, 3 * (matches.len() as u32 - draws) + 2 * draws);
        }
    }
}
