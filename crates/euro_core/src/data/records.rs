//! Raw input records as they appear in source JSON.
//!
//! Source files disagree on key names (`id` vs `club_id`, `skill` vs
//! `current_ability`), so every alternative is accepted here and nowhere else.

use serde::{Deserialize, Serialize};

pub const DEFAULT_REPUTATION: f64 = 70.0;
pub const DEFAULT_FORMATION: &str = "4-3-3";
pub const DEFAULT_SKILL: f64 = 60.0;
pub const DEFAULT_MANAGER_ABILITY: u8 = 70;

fn default_reputation() -> f64 {
    DEFAULT_REPUTATION
}

fn default_skill() -> f64 {
    DEFAULT_SKILL
}

fn default_manager_ability() -> u8 {
    DEFAULT_MANAGER_ABILITY
}

fn default_formation() -> String {
    DEFAULT_FORMATION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueRecord {
    #[serde(alias = "league_id")]
    pub id: String,
    #[serde(alias = "league_name")]
    pub name: String,
    #[serde(default)]
    pub country: String,
    /// Champions League places
    #[serde(default, alias = "ucl_spots")]
    pub champions_league_spots: usize,
    /// Europa League places
    #[serde(default, alias = "uel_spots")]
    pub europa_league_spots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClubRecord {
    #[serde(alias = "club_id")]
    pub id: String,
    #[serde(alias = "club_name")]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, alias = "league")]
    pub league_id: Option<String>,
    #[serde(default = "default_reputation")]
    pub reputation: f64,
    #[serde(default, alias = "transfer_budget_initial")]
    pub transfer_budget: f64,
    #[serde(default, alias = "wage_budget_weekly_total")]
    pub weekly_wages: f64,
    #[serde(default, alias = "league_titles_won")]
    pub league_titles: u32,
    #[serde(default, alias = "continental_cup_wins")]
    pub continental_titles: u32,
    #[serde(default)]
    pub formation: Option<String>,
}

impl ClubRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: String::new(),
            league_id: None,
            reputation: DEFAULT_REPUTATION,
            transfer_budget: 0.0,
            weekly_wages: 0.0,
            league_titles: 0,
            continental_titles: 0,
            formation: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    #[serde(alias = "player_id")]
    pub id: String,
    #[serde(alias = "full_name")]
    pub name: String,
    /// Players without a club are ignored during normalization.
    #[serde(default, alias = "current_club_id")]
    pub club_id: Option<String>,
    #[serde(alias = "primary_position")]
    pub position: String,
    #[serde(default = "default_skill", alias = "current_ability", alias = "overall")]
    pub skill: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagerRecord {
    #[serde(alias = "manager_id")]
    pub id: String,
    #[serde(alias = "manager_name")]
    pub name: String,
    #[serde(default, alias = "current_club_id")]
    pub club_id: Option<String>,
    #[serde(default = "default_formation", alias = "formation")]
    pub preferred_formation: String,
    #[serde(default = "default_manager_ability", alias = "manager_ability")]
    pub ability: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn club_aliases_and_defaults() {
        let club: ClubRecord = serde_json::from_str(
            r#"{"club_id": "rma", "club_name": "Real Madrid", "continental_cup_wins": 15}"#,
        )
        .unwrap();
        assert_eq!(club.id, "rma");
        assert_eq!(club.reputation, DEFAULT_REPUTATION);
        assert_eq!(club.continental_titles, 15);
        assert_eq!(club.league_id, None);
    }

    #[test]
    fn player_accepts_current_ability() {
        let p: PlayerRecord = serde_json::from_str(
            r#"{"id": "p1", "name": "A", "current_club_id": "rma", "position": "CB", "current_ability": 81}"#,
        )
        .unwrap();
        assert_eq!(p.club_id.as_deref(), Some("rma"));
        assert_eq!(p.skill, 81.0);

        let p: PlayerRecord =
            serde_json::from_str(r#"{"id": "p2", "name": "B", "position": "GK"}"#).unwrap();
        assert_eq!(p.skill, DEFAULT_SKILL);
    }

    #[test]
    fn manager_defaults() {
        let m: ManagerRecord =
            serde_json::from_str(r#"{"manager_id": "m1", "name": "Boss", "manager_ability": 88}"#)
                .unwrap();
        assert_eq!(m.ability, 88);
        assert_eq!(m.preferred_formation, DEFAULT_FORMATION);
    }
}
