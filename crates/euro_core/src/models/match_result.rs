//! Match result data structures.
//!
//! A `MatchResult` is produced by the match simulator and consumed right away
//! by the standings table, the knockout engine and the statistics tracker.

use super::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};

/// Result of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_goals(scored: u8, conceded: u8) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Goal,
    Assist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub player: PlayerId,
    pub team: TeamId,
    pub kind: ContributionKind,
}

/// Goals added during extra time (already included in the full-time score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTime {
    pub home: u8,
    pub away: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyShootoutResult {
    pub home: u8,
    pub away: u8,
    /// Sudden-death rounds needed after the regulation kicks.
    pub sudden_death_rounds: u8,
}

impl PenaltyShootoutResult {
    pub fn home_won(&self) -> bool {
        self.home > self.away
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home: TeamId,
    pub away: TeamId,
    /// Goals including any extra time.
    pub home_goals: u8,
    pub away_goals: u8,
    #[serde(default)]
    pub neutral_venue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_time: Option<ExtraTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalties: Option<PenaltyShootoutResult>,
    /// Empty when the match was simulated without rosters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributions: Vec<Contribution>,
}

impl MatchResult {
    pub fn scoreline(home: TeamId, away: TeamId, home_goals: u8, away_goals: u8) -> Self {
        Self {
            home,
            away,
            home_goals,
            away_goals,
            neutral_venue: false,
            extra_time: None,
            penalties: None,
            contributions: Vec::new(),
        }
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }

    /// (scored, conceded) for `team`, or `None` if it did not play.
    pub fn goals_for(&self, team: &TeamId) -> Option<(u8, u8)> {
        if &self.home == team {
            Some((self.home_goals, self.away_goals))
        } else if &self.away == team {
            Some((self.away_goals, self.home_goals))
        } else {
            None
        }
    }

    /// Outcome on the scoreboard, ignoring any shootout.
    pub fn outcome_for(&self, team: &TeamId) -> Option<Outcome> {
        self.goals_for(team).map(|(f, a)| Outcome::from_goals(f, a))
    }

    /// Winner on the day, shootout included. `None` for a drawn match.
    pub fn winner(&self) -> Option<&TeamId> {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => Some(&self.home),
            std::cmp::Ordering::Less => Some(&self.away),
            std::cmp::Ordering::Equal => self.penalties.map(|p| {
                if p.home_won() {
                    &self.home
                } else {
                    &self.away
                }
            }),
        }
    }

    pub fn count_for(&self, player: &PlayerId, kind: ContributionKind) -> u32 {
        self.contributions
            .iter()
            .filter(|c| &c.player == player && c.kind == kind)
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shootout_decides_drawn_winner() {
        let mut result = MatchResult::scoreline("a".into(), "b".into(), 1, 1);
        assert_eq!(result.winner(), None);
        result.penalties = Some(PenaltyShootoutResult { home: 3, away: 4, sudden_death_rounds: 0 });
        assert_eq!(result.winner(), Some(&TeamId::from("b")));
        assert_eq!(result.outcome_for(&"a".into()), Some(Outcome::Draw));
    }
}
