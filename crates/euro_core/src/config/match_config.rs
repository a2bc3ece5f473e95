//! Match outcome and goal attribution parameters.

use serde::{Deserialize, Serialize};

/// Outcome model: a linear shift away from a base split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Multiplier on the home side's strength (default: 1.05). Not applied on neutral ground.
    pub home_advantage_factor: f64,
    /// Home win probability at zero strength difference (default: 0.40)
    pub base_home_win: f64,
    /// Draw probability at zero strength difference (default: 0.28)
    pub base_draw: f64,
    /// Win probability shift per strength point (default: 0.012)
    pub win_sensitivity: f64,
    /// Draw probability lost per absolute strength point (default: 0.006)
    pub draw_shrink: f64,
    /// Floor for each of the three probabilities (default: 0.05)
    pub probability_floor: f64,
    /// Ceiling for a win probability (default: 0.90)
    pub win_cap: f64,
    /// Ceiling for the draw probability (default: 0.50)
    pub draw_cap: f64,

    // === Scorelines ===
    pub winner_goals_min: u8,
    pub winner_goals_max: u8,
    pub draw_goals_max: u8,
    /// Margin choices subtracted from the winner's tally to cap the loser's draw.
    pub loser_margin_choices: Vec<u8>,

    // === Attribution ===
    /// Chance that a goal carries an assist (default: 0.65)
    pub assist_probability: f64,
    pub scorer_weights: PositionWeights,
    pub assister_weights: PositionWeights,

    /// Per-side chance of one extra-time goal in a single-leg decider (default: 0.30)
    pub extra_time_goal_probability: f64,
}

/// Relative weights by outfield category. Goalkeepers never score or assist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionWeights {
    pub def: f64,
    pub mid: f64,
    pub fwd: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            home_advantage_factor: 1.05,
            base_home_win: 0.40,
            base_draw: 0.28,
            win_sensitivity: 0.012,
            draw_shrink: 0.006,
            probability_floor: 0.05,
            win_cap: 0.90,
            draw_cap: 0.50,

            winner_goals_min: 1,
            winner_goals_max: 4,
            draw_goals_max: 2,
            loser_margin_choices: vec![1, 1, 2],

            assist_probability: 0.65,
            scorer_weights: PositionWeights { def: 1.0, mid: 2.0, fwd: 3.0 },
            assister_weights: PositionWeights { def: 1.0, mid: 3.0, fwd: 2.0 },

            extra_time_goal_probability: 0.30,
        }
    }
}

impl MatchConfig {
    /// Away win probability at zero difference.
    pub fn base_away_win(&self) -> f64 {
        1.0 - self.base_home_win - self.base_draw
    }
}
