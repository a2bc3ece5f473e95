use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{PlayerId, TeamId};

/// Boundary failures. Anything that reaches the simulation core has already
/// passed through one of these checks.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Invalid strength for {team}: {value}")]
    InvalidStrength { team: TeamId, value: f64 },

    #[error("Invalid competition format: {0}")]
    InvalidFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub fn data(msg: impl Into<String>) -> Self {
        EngineError::Data(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Non-fatal degradations. These never abort a run; they are logged when
/// raised and handed back to the caller with the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineWarning {
    /// Scheduler could not fill a team's quota.
    ShortSchedule { team: TeamId, scheduled: usize, target: usize },
    /// Team fielded fewer than eleven players.
    ShortLineup { team: TeamId, available: usize },
    /// No roster at all, the match only produced a scoreline.
    ScorelineOnly { team: TeamId },
    /// Best XI could not be completed from qualified players.
    PartialBestXi { filled: usize },
    /// Not enough qualifiers for the configured bracket shape.
    ReducedBracket { expected: usize, actual: usize },
    /// Fewer than two qualifiers, no knockout stage was played.
    NoKnockout { qualifiers: usize },
    /// Sudden death hit the safety cap and was settled by a coin toss.
    ShootoutCapReached { rounds: usize },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineWarning::ShortSchedule { team, scheduled, target } => {
                write!(f, "{} scheduled for {} of {} fixtures", team, scheduled, target)
            }
            EngineWarning::ShortLineup { team, available } => {
                write!(f, "{} fielded only {} players", team, available)
            }
            EngineWarning::ScorelineOnly { team } => {
                write!(f, "{} has no roster, scoreline-only simulation", team)
            }
            EngineWarning::PartialBestXi { filled } => {
                write!(f, "Best XI incomplete: {}/11 positions filled", filled)
            }
            EngineWarning::ReducedBracket { expected, actual } => {
                write!(f, "bracket expected {} qualifiers, got {}", expected, actual)
            }
            EngineWarning::NoKnockout { qualifiers } => {
                write!(f, "only {} qualifier(s), knockout stage skipped", qualifiers)
            }
            EngineWarning::ShootoutCapReached { rounds } => {
                write!(f, "penalty shootout reached {} sudden-death rounds", rounds)
            }
        }
    }
}

/// Collects warnings while logging each one as it arrives.
#[derive(Debug, Default, Clone)]
pub struct WarningLog {
    entries: Vec<EngineWarning>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: EngineWarning) {
        tracing::warn!("{}", warning);
        self.entries.push(warning);
    }

    /// Push unless an identical warning was already recorded.
    pub fn push_once(&mut self, warning: EngineWarning) {
        if !self.entries.contains(&warning) {
            self.push(warning);
        }
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = EngineWarning>) {
        for w in warnings {
            self.push(w);
        }
    }

    pub fn entries(&self) -> &[EngineWarning] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<EngineWarning> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
