//! Player match rating and form parameters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatingConfig {
    /// Starting point for every rating (default: 6.0)
    pub anchor: f64,
    pub win_bonus: f64,
    pub draw_bonus: f64,
    pub goal_bonus: f64,
    pub assist_bonus: f64,

    // === Defensive ===
    pub gk_clean_sheet_bonus: f64,
    pub gk_conceded_penalty: f64,
    pub def_clean_sheet_bonus: f64,
    pub def_conceded_penalty: f64,

    // === Skill / form / noise ===
    /// Skill at which the modifier is zero (default: 75)
    pub reference_skill: f64,
    /// Skill points per rating point (default: 50)
    pub skill_divisor: f64,
    pub form_influence: f64,
    /// Std dev of the normal noise term (default: 0.5)
    pub noise_std_dev: f64,

    pub min_rating: f64,
    pub max_rating: f64,

    pub form: FormConfig,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            anchor: 6.0,
            win_bonus: 0.7,
            draw_bonus: 0.3,
            goal_bonus: 1.2,
            assist_bonus: 0.8,

            gk_clean_sheet_bonus: 1.0,
            gk_conceded_penalty: 0.25,
            def_clean_sheet_bonus: 0.4,
            def_conceded_penalty: 0.15,

            reference_skill: 75.0,
            skill_divisor: 50.0,
            form_influence: 0.2,
            noise_std_dev: 0.5,

            min_rating: 4.0,
            max_rating: 10.0,

            form: FormConfig::default(),
        }
    }
}

/// Form drifts with recent ratings and feeds back into attribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    pub initial_min: f64,
    pub initial_max: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Ratings above this raise form (default: 7.2)
    pub good_rating: f64,
    /// Ratings below this lower form (default: 5.8)
    pub poor_rating: f64,
    /// Weight kept on current form when drifting back to 1.0 (default: 0.98)
    pub drift_retention: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            initial_min: 0.85,
            initial_max: 1.15,
            min: 0.80,
            max: 1.20,
            step: 0.03,
            good_rating: 7.2,
            poor_rating: 5.8,
            drift_retention: 0.98,
        }
    }
}
