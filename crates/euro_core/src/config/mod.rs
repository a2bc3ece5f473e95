//! # Engine Configuration
//!
//! Every tuning constant used by the simulation lives here instead of in
//! module-level globals, so two tournaments with different settings can run
//! side by side.
//!
//! ```rust
//! use euro_core::config::EngineConfig;
//!
//! let modern = EngineConfig::default();
//! let legacy = EngineConfig::legacy();
//! assert!(legacy.use_away_goals_rule && !modern.use_away_goals_rule);
//! ```

mod awards_config;
mod format;
mod match_config;
mod rating_config;

pub use awards_config::{AwardsConfig, BestXiSlot, ManagerScoreConfig, SlotRule};
pub use format::{BracketShape, CompetitionFormat};
pub use match_config::{MatchConfig, PositionWeights};
pub use rating_config::{FormConfig, RatingConfig};

use crate::error::{EngineError, Result};
use crate::models::KnockoutStage;
use serde::{Deserialize, Serialize};

/// Whole-engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(rename = "match")]
    pub match_: MatchConfig,
    pub rating: RatingConfig,
    pub shootout: ShootoutConfig,
    pub schedule: ScheduleConfig,
    pub awards: AwardsConfig,
    pub stage_bonus: StageBonusConfig,
    pub strength: StrengthBounds,
    /// Break level aggregates on away goals before penalties (default: off)
    pub use_away_goals_rule: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_: MatchConfig::default(),
            rating: RatingConfig::default(),
            shootout: ShootoutConfig::default(),
            schedule: ScheduleConfig::default(),
            awards: AwardsConfig::default(),
            stage_bonus: StageBonusConfig::default(),
            strength: StrengthBounds::default(),
            use_away_goals_rule: false,
        }
    }
}

impl EngineConfig {
    /// Current rules (default)
    pub fn modern() -> Self {
        Self::default()
    }

    /// Pre-2021 knockout rules with a stronger home side.
    pub fn legacy() -> Self {
        let mut cfg = Self::default();
        cfg.use_away_goals_rule = true;
        cfg.match_.home_advantage_factor = 1.1;
        cfg
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the simulation cannot work with.
    pub fn validate(&self) -> Result<()> {
        let m = &self.match_;
        check_probability("match.base_home_win", m.base_home_win)?;
        check_probability("match.base_draw", m.base_draw)?;
        if m.base_away_win() < 0.0 {
            return Err(invalid("match.base_home_win + match.base_draw exceeds 1"));
        }
        check_probability("match.probability_floor", m.probability_floor)?;
        if m.probability_floor * 3.0 > 1.0 {
            return Err(invalid("match.probability_floor leaves no room for three outcomes"));
        }
        check_probability("match.win_cap", m.win_cap)?;
        check_probability("match.draw_cap", m.draw_cap)?;
        if m.probability_floor > m.win_cap {
            return Err(invalid("match.probability_floor exceeds match.win_cap"));
        }
        if m.probability_floor > m.draw_cap {
            return Err(invalid("match.probability_floor exceeds match.draw_cap"));
        }
        check_probability("match.assist_probability", m.assist_probability)?;
        check_probability("match.extra_time_goal_probability", m.extra_time_goal_probability)?;
        if !(m.home_advantage_factor.is_finite() && m.home_advantage_factor > 0.0) {
            return Err(invalid("match.home_advantage_factor must be positive"));
        }
        if m.winner_goals_min == 0 || m.winner_goals_min > m.winner_goals_max {
            return Err(invalid("match.winner_goals_min must be in 1..=winner_goals_max"));
        }
        if m.loser_margin_choices.is_empty() || m.loser_margin_choices.contains(&0) {
            return Err(invalid("match.loser_margin_choices must be non-empty and positive"));
        }

        let r = &self.rating;
        if r.min_rating > r.max_rating {
            return Err(invalid("rating.min_rating exceeds rating.max_rating"));
        }
        if r.skill_divisor <= 0.0 {
            return Err(invalid("rating.skill_divisor must be positive"));
        }
        if !(r.noise_std_dev.is_finite() && r.noise_std_dev >= 0.0) {
            return Err(invalid("rating.noise_std_dev must be non-negative"));
        }
        let f = &r.form;
        if f.min > f.max || f.initial_min > f.initial_max || f.min <= 0.0 {
            return Err(invalid("rating.form ranges are inverted or non-positive"));
        }

        check_probability("shootout.conversion_probability", self.shootout.conversion_probability)?;
        if self.shootout.kicks_per_side == 0 {
            return Err(invalid("shootout.kicks_per_side must be at least 1"));
        }
        if self.schedule.max_attempts == 0 {
            return Err(invalid("schedule.max_attempts must be at least 1"));
        }

        let s = &self.strength;
        if !(0.0..=100.0).contains(&s.min) || !(0.0..=100.0).contains(&s.max) || s.min > s.max {
            return Err(invalid("strength bounds must satisfy 0 <= min <= max <= 100"));
        }

        if self.awards.best_xi.len() != 11 {
            return Err(invalid("awards.best_xi must describe 11 slots"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidConfig(msg.to_string())
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!("{} = {} is not a probability", name, value)))
    }
}

/// Clamp range for team strength.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrengthBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for StrengthBounds {
    fn default() -> Self {
        Self { min: 30.0, max: 100.0 }
    }
}

impl StrengthBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShootoutConfig {
    pub kicks_per_side: u8,
    pub conversion_probability: f64,
    /// Sudden-death rounds before a coin toss settles it. Should never bind.
    pub sudden_death_cap: u8,
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self { kicks_per_side: 5, conversion_probability: 0.75, sudden_death_cap: 20 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Allowed |home - away| per team; odd round counts always allow 1.
    pub imbalance_tolerance: u32,
    /// Full re-runs with fresh shuffles before settling for the best attempt.
    pub max_attempts: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { imbalance_tolerance: 0, max_attempts: 64 }
    }
}

/// Rating points granted to every player who appeared for a team that won a
/// knockout round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageBonusConfig {
    pub playoff: f64,
    pub round_of_16: f64,
    pub quarter_final: f64,
    pub semi_final: f64,
    pub champion: f64,
}

impl Default for StageBonusConfig {
    fn default() -> Self {
        Self {
            playoff: 2.0,
            round_of_16: 3.0,
            quarter_final: 4.0,
            semi_final: 5.0,
            champion: 6.0,
        }
    }
}

impl StageBonusConfig {
    /// Bonus for winning a tie in `stage`. Unnamed early rounds earn the
    /// playoff bonus; winning the final earns the champion bonus.
    pub fn for_stage(&self, stage: KnockoutStage) -> f64 {
        match stage {
            KnockoutStage::PlayoffRound | KnockoutStage::RoundOf(_) => self.playoff,
            KnockoutStage::RoundOf16 => self.round_of_16,
            KnockoutStage::QuarterFinal => self.quarter_final,
            KnockoutStage::SemiFinal => self.semi_final,
            KnockoutStage::Final | KnockoutStage::Champion => self.champion,
        }
    }
}
