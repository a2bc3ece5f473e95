//! Leaderboards, best player, Best XI and manager award parameters.

use crate::models::PositionCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AwardsConfig {
    /// Appearances required for rating-based awards (default: 3)
    pub min_appearances: u32,
    pub leaderboard_size: usize,
    pub clean_sheet_board_size: usize,

    // === Best player composite ===
    pub best_player_goal_weight: f64,
    pub best_player_assist_weight: f64,
    pub best_player_clean_sheet_weight: f64,

    /// Best XI slots in processing order (hardest to fill first).
    pub best_xi: Vec<SlotRule>,

    pub manager: ManagerScoreConfig,
}

/// One Best XI slot and the categories allowed to fill it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotRule {
    pub slot: BestXiSlot,
    /// (category, fractional rating penalty); penalty 0.0 marks the primary category.
    pub eligible: Vec<(PositionCategory, f64)>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BestXiSlot {
    GK,
    RB,
    CB1,
    CB2,
    LB,
    CM1,
    CM2,
    CM3,
    RW,
    ST,
    LW,
}

impl BestXiSlot {
    pub fn label(&self) -> &'static str {
        match self {
            BestXiSlot::GK => "Goalkeeper",
            BestXiSlot::RB => "Right-Back",
            BestXiSlot::CB1 | BestXiSlot::CB2 => "Centre-Back",
            BestXiSlot::LB => "Left-Back",
            BestXiSlot::CM1 | BestXiSlot::CM2 | BestXiSlot::CM3 => "Centre Midfielder",
            BestXiSlot::RW => "Right Winger",
            BestXiSlot::ST => "Striker",
            BestXiSlot::LW => "Left Winger",
        }
    }
}

impl fmt::Display for BestXiSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Manager of the Tournament score weights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagerScoreConfig {
    pub points_weight: f64,
    pub position_weight: f64,
    pub goal_difference_weight: f64,
    pub direct_qualifier_bonus: f64,
    pub knockout_qualifier_bonus: f64,
    pub win_rate_weight: f64,
    pub shortlist_size: usize,
}

impl Default for ManagerScoreConfig {
    fn default() -> Self {
        Self {
            points_weight: 10.0,
            position_weight: 5.0,
            goal_difference_weight: 2.0,
            direct_qualifier_bonus: 100.0,
            knockout_qualifier_bonus: 50.0,
            win_rate_weight: 50.0,
            shortlist_size: 5,
        }
    }
}

fn slot(slot: BestXiSlot, eligible: &[(PositionCategory, f64)]) -> SlotRule {
    SlotRule { slot, eligible: eligible.to_vec() }
}

impl Default for AwardsConfig {
    fn default() -> Self {
        use PositionCategory::{DEF, FWD, GK, MID};

        let centre_back = [(DEF, 0.0), (MID, 0.20)];
        let full_back = [(DEF, 0.0), (MID, 0.15)];
        let centre_mid = [(MID, 0.0), (DEF, 0.25), (FWD, 0.15)];
        let winger = [(FWD, 0.0), (MID, 0.10)];

        Self {
            min_appearances: 3,
            leaderboard_size: 10,
            clean_sheet_board_size: 5,

            best_player_goal_weight: 2.0,
            best_player_assist_weight: 1.5,
            best_player_clean_sheet_weight: 1.0,

            best_xi: vec![
                slot(BestXiSlot::GK, &[(GK, 0.0)]),
                slot(BestXiSlot::CB1, &centre_back),
                slot(BestXiSlot::CB2, &centre_back),
                slot(BestXiSlot::RB, &full_back),
                slot(BestXiSlot::LB, &full_back),
                slot(BestXiSlot::CM1, &centre_mid),
                slot(BestXiSlot::CM2, &centre_mid),
                slot(BestXiSlot::CM3, &centre_mid),
                slot(BestXiSlot::ST, &[(FWD, 0.0), (MID, 0.20)]),
                slot(BestXiSlot::RW, &winger),
                slot(BestXiSlot::LW, &winger),
            ],

            manager: ManagerScoreConfig::default(),
        }
    }
}
