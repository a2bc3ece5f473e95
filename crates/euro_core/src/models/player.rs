use super::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse position category used by selection, attribution and awards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionCategory {
    GK,
    DEF,
    MID,
    FWD,
}

impl PositionCategory {
    /// Map a detailed position code (CB, CAM, ST, ...) or a category name
    /// onto its category.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "GK" | "G" | "GOALKEEPER" => Some(PositionCategory::GK),
            "DEF" | "DF" | "D" | "CB" | "LB" | "RB" | "LWB" | "RWB" | "SW" | "DEFENDER" => {
                Some(PositionCategory::DEF)
            }
            "MID" | "MF" | "M" | "DM" | "CDM" | "CM" | "LM" | "RM" | "AM" | "CAM"
            | "MIDFIELDER" => Some(PositionCategory::MID),
            "FWD" | "FW" | "F" | "LW" | "RW" | "ST" | "CF" | "SS" | "FORWARD" => {
                Some(PositionCategory::FWD)
            }
            _ => None,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, PositionCategory::GK)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionCategory::GK => "GK",
            PositionCategory::DEF => "DEF",
            PositionCategory::MID => "MID",
            PositionCategory::FWD => "FWD",
        }
    }
}

impl fmt::Display for PositionCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative tournament statistics. Only the player registry writes these.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerStats {
    pub(crate) matches_played: u32,
    pub(crate) goals: u32,
    pub(crate) assists: u32,
    pub(crate) clean_sheets: u32,
    pub(crate) total_rating_points: f64,
    pub(crate) avg_rating: f64,
}

impl PlayerStats {
    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    pub fn goals(&self) -> u32 {
        self.goals
    }

    pub fn assists(&self) -> u32 {
        self.assists
    }

    pub fn goals_and_assists(&self) -> u32 {
        self.goals + self.assists
    }

    pub fn clean_sheets(&self) -> u32 {
        self.clean_sheets
    }

    pub fn total_rating_points(&self) -> f64 {
        self.total_rating_points
    }

    pub fn avg_rating(&self) -> f64 {
        self.avg_rating
    }

    /// Re-derive the average from the running total (2 decimal places).
    pub(crate) fn refresh_average(&mut self) {
        if self.matches_played > 0 {
            let avg = self.total_rating_points / self.matches_played as f64;
            self.avg_rating = (avg * 100.0).round() / 100.0;
        }
    }
}

fn neutral_form() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub position: PositionCategory,
    /// Detailed role from the source data (e.g. "CB"), informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_position: Option<String>,
    pub skill: f64,
    /// Form multiplier around 1.0; scales attacking weight and rating.
    #[serde(default = "neutral_form")]
    pub(crate) form: f64,
    #[serde(default)]
    pub(crate) stats: PlayerStats,
}

impl Player {
    pub fn new(
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        team_id: impl Into<TeamId>,
        position: PositionCategory,
        skill: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            team_id: team_id.into(),
            position,
            detailed_position: None,
            skill,
            form: neutral_form(),
            stats: PlayerStats::default(),
        }
    }

    pub fn with_detailed_position(mut self, code: impl Into<String>) -> Self {
        self.detailed_position = Some(code.into());
        self
    }

    pub fn form(&self) -> f64 {
        self.form
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Skill scaled by current form.
    pub fn effective_skill(&self) -> f64 {
        self.skill * self.form
    }
}
