use serde::{Deserialize, Serialize};
use std::fmt;

/// Knockout rounds in bracket order. `Champion` is the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutStage {
    PlayoffRound,
    /// Early round with a participant count that has no traditional name.
    RoundOf(u16),
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
    Champion,
}

impl KnockoutStage {
    /// Stage name for a reseeded round with `participants` teams.
    pub fn for_participants(participants: usize) -> Self {
        match participants {
            0..=2 => KnockoutStage::Final,
            4 => KnockoutStage::SemiFinal,
            8 => KnockoutStage::QuarterFinal,
            16 => KnockoutStage::RoundOf16,
            n => KnockoutStage::RoundOf(n as u16),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, KnockoutStage::Final)
    }
}

impl fmt::Display for KnockoutStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KnockoutStage::PlayoffRound => f.write_str("Knockout Playoff"),
            KnockoutStage::RoundOf(n) => write!(f, "Round of {}", n),
            KnockoutStage::RoundOf16 => f.write_str("Round of 16"),
            KnockoutStage::QuarterFinal => f.write_str("Quarter-Final"),
            KnockoutStage::SemiFinal => f.write_str("Semi-Final"),
            KnockoutStage::Final => f.write_str("Final"),
            KnockoutStage::Champion => f.write_str("Champion"),
        }
    }
}
