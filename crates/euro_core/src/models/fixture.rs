use super::TeamId;
use serde::{Deserialize, Serialize};

/// One scheduled league-phase match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub home: TeamId,
    pub away: TeamId,
    /// 1-based matchday; fallback-filled fixtures use `rounds_per_team + 1`.
    pub round: u32,
}

impl Fixture {
    pub fn new(home: TeamId, away: TeamId, round: u32) -> Self {
        Self { home, away, round }
    }

    /// Order-independent key for duplicate detection.
    pub fn pair_key(&self) -> (TeamId, TeamId) {
        if self.home <= self.away {
            (self.home.clone(), self.away.clone())
        } else {
            (self.away.clone(), self.home.clone())
        }
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }
}
