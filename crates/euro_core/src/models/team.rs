use super::{LeagueId, ManagerId, PlayerId, PositionCategory, TeamId};
use crate::config::StrengthBounds;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A club entered into a competition.
///
/// `strength` is fixed for the whole tournament: it is computed once by the
/// rating provider at qualification time and clamped into the configured
/// bounds, never recomputed between matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<LeagueId>,
    strength: f64,
    /// Ordered roster; empty means scoreline-only simulation.
    #[serde(default)]
    pub player_ids: Vec<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formation: Option<Formation>,
}

impl Team {
    pub fn new(
        id: impl Into<TeamId>,
        name: impl Into<String>,
        country: impl Into<String>,
        strength: f64,
        bounds: &StrengthBounds,
    ) -> Result<Self> {
        let id = id.into();
        if !strength.is_finite() {
            return Err(EngineError::InvalidStrength { team: id, value: strength });
        }
        Ok(Self {
            id,
            name: name.into(),
            country: country.into(),
            league: None,
            strength: bounds.clamp(strength),
            player_ids: Vec::new(),
            formation: None,
        })
    }

    pub fn with_league(mut self, league: impl Into<LeagueId>) -> Self {
        self.league = Some(league.into());
        self
    }

    pub fn with_players(mut self, players: Vec<PlayerId>) -> Self {
        self.player_ids = players;
        self
    }

    pub fn with_formation(mut self, formation: Formation) -> Self {
        self.formation = Some(formation);
        self
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn formation_or_default(&self) -> Formation {
        self.formation.clone().unwrap_or_default()
    }

    pub fn has_roster(&self) -> bool {
        !self.player_ids.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Formation {
    #[serde(rename = "4-4-2")]
    F442,
    #[default]
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-4-1-1")]
    F4411,
    #[serde(rename = "4-3-2-1")]
    F4321,
    #[serde(rename = "4-2-2-2")]
    F4222,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "3-4-2-1")]
    F3421,
    #[serde(rename = "3-4-1-2")]
    F3412,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "4-2-3-1")]
    F4231,
    #[serde(rename = "4-1-4-1")]
    F4141,
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "5-4-1")]
    F541,
}

impl Formation {
    pub const ALL: [Formation; 14] = [
        Formation::F442,
        Formation::F433,
        Formation::F4411,
        Formation::F4321,
        Formation::F4222,
        Formation::F451,
        Formation::F352,
        Formation::F3421,
        Formation::F3412,
        Formation::F532,
        Formation::F4231,
        Formation::F4141,
        Formation::F343,
        Formation::F541,
    ];

    pub fn get_positions(&self) -> (u8, u8, u8) {
        // Returns (defenders, midfielders, forwards)
        match self {
            Formation::F442 => (4, 4, 2),
            Formation::F433 => (4, 3, 3),
            Formation::F4411 => (4, 4, 2),
            Formation::F4321 => (4, 3, 3), // 2 behind striker counted as forwards
            Formation::F4222 => (4, 4, 2),
            Formation::F451 => (4, 5, 1),
            Formation::F352 => (3, 5, 2),
            Formation::F3421 => (3, 4, 3),
            Formation::F3412 => (3, 5, 2), // CAM+2 ST
            Formation::F532 => (5, 3, 2),
            Formation::F4231 => (4, 5, 1), // 2 DM + 3 AM
            Formation::F4141 => (4, 5, 1),
            Formation::F343 => (3, 4, 3),
            Formation::F541 => (5, 4, 1),
        }
    }

    /// Slot counts per coarse category, goalkeeper first.
    pub fn template(&self) -> [(PositionCategory, usize); 4] {
        let (def, mid, fwd) = self.get_positions();
        [
            (PositionCategory::GK, 1),
            (PositionCategory::DEF, def as usize),
            (PositionCategory::MID, mid as usize),
            (PositionCategory::FWD, fwd as usize),
        ]
    }

    /// Canonical formation code string (e.g., "4-3-3").
    pub fn code(&self) -> &'static str {
        match self {
            Formation::F442 => "4-4-2",
            Formation::F433 => "4-3-3",
            Formation::F4411 => "4-4-1-1",
            Formation::F4321 => "4-3-2-1",
            Formation::F4222 => "4-2-2-2",
            Formation::F451 => "4-5-1",
            Formation::F352 => "3-5-2",
            Formation::F3421 => "3-4-2-1",
            Formation::F3412 => "3-4-1-2",
            Formation::F532 => "5-3-2",
            Formation::F4231 => "4-2-3-1",
            Formation::F4141 => "4-1-4-1",
            Formation::F343 => "3-4-3",
            Formation::F541 => "5-4-1",
        }
    }

    /// Parse a formation code, falling back to 4-3-3 for anything unknown.
    pub fn parse_or_default(code: &str) -> Formation {
        code.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown formation '{}', using {}", code, Formation::default().code());
            Formation::default()
        })
    }
}

impl FromStr for Formation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Formation::ALL
            .iter()
            .find(|f| f.code() == trimmed)
            .cloned()
            .ok_or_else(|| EngineError::data(format!("unknown formation '{}'", s)))
    }
}

/// Head coach of a team, used for the Manager of the Tournament award.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manager {
    pub id: ManagerId,
    pub name: String,
    /// Club currently managed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    pub formation: Formation,
    pub ability: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_is_clamped_into_bounds() {
        let bounds = StrengthBounds::default();
        let weak = Team::new("a", "A", "ENG", 5.0, &bounds).unwrap();
        let strong = Team::new("b", "B", "ENG", 140.0, &bounds).unwrap();
        assert_eq!(weak.strength(), bounds.min);
        assert_eq!(strong.strength(), bounds.max);
    }

    #[test]
    fn non_finite_strength_is_rejected() {
        let bounds = StrengthBounds::default();
        assert!(Team::new("a", "A", "ENG", f64::NAN, &bounds).is_err());
    }

    #[test]
    fn every_template_fields_eleven() {
        for f in Formation::ALL {
            let total: usize = f.template().iter().map(|(_, n)| n).sum();
            assert_eq!(total, 11, "{}", f.code());
        }
    }

    #[test]
    fn unknown_formation_falls_back() {
        assert_eq!(Formation::parse_or_default("4-2-3-1"), Formation::F4231);
        assert_eq!(Formation::parse_or_default("2-3-5"), Formation::F433);
    }
}
