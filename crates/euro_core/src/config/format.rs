//! Competition shape: league phase size and knockout bracket.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// How league-phase finishers enter the knockout stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BracketShape {
    /// Top `size` teams, plain single elimination.
    Straight { size: usize },
    /// Top `direct` teams wait in the main bracket while the next `playoff`
    /// teams play a rank-seeded preliminary round for the remaining places.
    SeededPlayoff { direct: usize, playoff: usize },
}

impl BracketShape {
    /// League-phase finishers this shape takes.
    pub fn entrants(&self) -> usize {
        match *self {
            BracketShape::Straight { size } => size,
            BracketShape::SeededPlayoff { direct, playoff } => direct + playoff,
        }
    }

    /// Teams in the first round after any playoff.
    pub fn main_bracket_size(&self) -> usize {
        match *self {
            BracketShape::Straight { size } => size,
            BracketShape::SeededPlayoff { direct, playoff } => direct + playoff / 2,
        }
    }

    /// Shape to use when only `available` teams can enter: the configured one
    /// if enough teams exist, otherwise the largest straight bracket that
    /// fits. `None` when fewer than two teams remain.
    pub fn fit(&self, available: usize) -> Option<BracketShape> {
        if available >= self.entrants() {
            return Some(*self);
        }
        if available < 2 {
            return None;
        }
        Some(BracketShape::Straight { size: largest_power_of_two(available) })
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            BracketShape::Straight { size } => {
                if size < 2 || !size.is_power_of_two() {
                    return Err(EngineError::InvalidFormat(format!(
                        "straight bracket size {} is not a power of two >= 2",
                        size
                    )));
                }
            }
            BracketShape::SeededPlayoff { direct, playoff } => {
                if playoff == 0 || playoff % 2 != 0 {
                    return Err(EngineError::InvalidFormat(format!(
                        "playoff pool of {} teams is not even",
                        playoff
                    )));
                }
                let main = direct + playoff / 2;
                if main < 2 || !main.is_power_of_two() {
                    return Err(EngineError::InvalidFormat(format!(
                        "{} direct + {} playoff winners is not a power of two",
                        direct,
                        playoff / 2
                    )));
                }
            }
        }
        Ok(())
    }
}

fn largest_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

/// One parameterized competition. Champions League, Europa League and any
/// other Swiss-model tournament differ only in these values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompetitionFormat {
    pub name: String,
    /// League-phase field size.
    pub team_count: usize,
    pub rounds_per_team: usize,
    pub bracket: BracketShape,
    /// Every round except the final is played home and away.
    pub two_legged_rounds: bool,
    /// Final is a single match on neutral ground.
    pub single_leg_final: bool,
    /// Overrides `EngineConfig::use_away_goals_rule` for this competition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_away_goals: Option<bool>,
}

impl CompetitionFormat {
    pub fn champions_league() -> Self {
        Self {
            name: "Champions League".to_string(),
            team_count: 36,
            rounds_per_team: 8,
            bracket: BracketShape::SeededPlayoff { direct: 8, playoff: 16 },
            two_legged_rounds: true,
            single_leg_final: true,
            use_away_goals: None,
        }
    }

    pub fn europa_league() -> Self {
        Self { name: "Europa League".to_string(), ..Self::champions_league() }
    }

    /// Plain `n`-team knockout with an `n`-team league phase.
    pub fn straight(n: usize) -> Self {
        Self {
            name: format!("{}-team knockout", n),
            team_count: n,
            rounds_per_team: n.saturating_sub(1).min(8),
            bracket: BracketShape::Straight { size: n },
            two_legged_rounds: true,
            single_leg_final: true,
            use_away_goals: None,
        }
    }

    pub fn away_goals(&self, default: bool) -> bool {
        self.use_away_goals.unwrap_or(default)
    }

    pub fn validate(&self) -> Result<()> {
        if self.team_count < 2 {
            return Err(EngineError::InvalidFormat(format!(
                "{}: league phase needs at least 2 teams",
                self.name
            )));
        }
        if self.rounds_per_team == 0 || self.rounds_per_team >= self.team_count {
            return Err(EngineError::InvalidFormat(format!(
                "{}: {} rounds cannot be played by {} teams without repeats",
                self.name, self.rounds_per_team, self.team_count
            )));
        }
        self.bracket.validate()?;
        if self.bracket.entrants() > self.team_count {
            return Err(EngineError::InvalidFormat(format!(
                "{}: bracket takes {} teams from a {}-team league phase",
                self.name,
                self.bracket.entrants(),
                self.team_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(CompetitionFormat::champions_league().validate().is_ok());
        assert!(CompetitionFormat::europa_league().validate().is_ok());
        assert!(CompetitionFormat::straight(16).validate().is_ok());
        assert_eq!(CompetitionFormat::champions_league().bracket.main_bracket_size(), 16);
    }

    #[test]
    fn rejects_odd_playoff_and_non_power_sizes() {
        assert!(BracketShape::Straight { size: 12 }.validate().is_err());
        assert!(BracketShape::SeededPlayoff { direct: 8, playoff: 15 }.validate().is_err());
        assert!(BracketShape::SeededPlayoff { direct: 6, playoff: 16 }.validate().is_err());
        assert!(CompetitionFormat::straight(6).validate().is_err());
    }

    #[test]
    fn short_field_degrades_to_largest_straight_bracket() {
        let shape = BracketShape::SeededPlayoff { direct: 8, playoff: 16 };
        assert_eq!(shape.fit(24), Some(shape));
        assert_eq!(shape.fit(20), Some(BracketShape::Straight { size: 16 }));
        assert_eq!(shape.fit(3), Some(BracketShape::Straight { size: 2 }));
        assert_eq!(shape.fit(1), None);
    }

    #[test]
    fn competition_override_beats_engine_default() {
        let mut format = CompetitionFormat::champions_league();
        assert!(!format.away_goals(false));
        format.use_away_goals = Some(true);
        assert!(format.away_goals(false));
    }
}
