//! Data provider boundary.
//!
//! Raw records come in through a [`DataProvider`]; [`Dataset::normalize`]
//! turns them into strict `Team` / `Player` / `Manager` values and fails on
//! anything it cannot interpret. The simulation core never sees raw records.

mod records;

pub use records::{
    ClubRecord, LeagueRecord, ManagerRecord, PlayerRecord, DEFAULT_FORMATION,
    DEFAULT_MANAGER_ABILITY, DEFAULT_REPUTATION, DEFAULT_SKILL,
};

use crate::config::StrengthBounds;
use crate::error::{EngineError, Result};
use crate::models::{Formation, LeagueId, Manager, Player, PositionCategory, Team, TeamId};
use crate::rating::RatingProvider;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Source of raw competition data.
pub trait DataProvider {
    fn leagues(&self) -> Result<Vec<LeagueRecord>>;
    fn clubs(&self) -> Result<Vec<ClubRecord>>;
    fn players(&self) -> Result<Vec<PlayerRecord>>;
    fn managers(&self) -> Result<Vec<ManagerRecord>>;
}

/// Provider over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    pub leagues: Vec<LeagueRecord>,
    pub clubs: Vec<ClubRecord>,
    pub players: Vec<PlayerRecord>,
    pub managers: Vec<ManagerRecord>,
}

impl DataProvider for InMemoryProvider {
    fn leagues(&self) -> Result<Vec<LeagueRecord>> {
        Ok(self.leagues.clone())
    }

    fn clubs(&self) -> Result<Vec<ClubRecord>> {
        Ok(self.clubs.clone())
    }

    fn players(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.players.clone())
    }

    fn managers(&self) -> Result<Vec<ManagerRecord>> {
        Ok(self.managers.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub country: String,
    pub champions_league_spots: usize,
    pub europa_league_spots: usize,
}

/// Normalized, validated input for the engine.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub leagues: Vec<League>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub managers: Vec<Manager>,
}

impl Dataset {
    pub fn normalize(
        provider: &dyn DataProvider,
        rating: &dyn RatingProvider,
        bounds: &StrengthBounds,
    ) -> Result<Self> {
        let league_records = provider.leagues()?;
        let club_records = provider.clubs()?;
        let player_records = provider.players()?;
        let manager_records = provider.managers()?;

        let mut leagues = Vec::with_capacity(league_records.len());
        let mut league_ids = HashSet::new();
        for record in league_records {
            if !league_ids.insert(record.id.clone()) {
                return Err(EngineError::DuplicateId(record.id));
            }
            leagues.push(League {
                id: LeagueId::new(record.id),
                name: record.name,
                country: record.country,
                champions_league_spots: record.champions_league_spots,
                europa_league_spots: record.europa_league_spots,
            });
        }

        let mut club_index: HashMap<String, usize> = HashMap::new();
        for (i, club) in club_records.iter().enumerate() {
            if club_index.insert(club.id.clone(), i).is_some() {
                return Err(EngineError::DuplicateId(club.id.clone()));
            }
        }

        let mut players = Vec::with_capacity(player_records.len());
        let mut player_ids = HashSet::new();
        for record in player_records {
            if !player_ids.insert(record.id.clone()) {
                return Err(EngineError::DuplicateId(record.id));
            }
            let Some(club_id) = record.club_id else {
                tracing::debug!(player = %record.id, "skipping player without a club");
                continue;
            };
            if !club_index.contains_key(&club_id) {
                return Err(EngineError::UnknownTeam(TeamId::new(club_id)));
            }
            let position = PositionCategory::from_code(&record.position).ok_or_else(|| {
                EngineError::data(format!(
                    "player {} has unknown position '{}'",
                    record.id, record.position
                ))
            })?;
            if !(record.skill.is_finite() && (0.0..=100.0).contains(&record.skill)) {
                return Err(EngineError::data(format!(
                    "player {} has skill {} outside 0-100",
                    record.id, record.skill
                )));
            }
            players.push(
                Player::new(record.id, record.name, club_id, position, record.skill)
                    .with_detailed_position(record.position.trim().to_uppercase()),
            );
        }

        let mut managers = Vec::with_capacity(manager_records.len());
        let mut manager_ids = HashSet::new();
        let mut formation_by_club: HashMap<String, Formation> = HashMap::new();
        for record in manager_records {
            if !manager_ids.insert(record.id.clone()) {
                return Err(EngineError::DuplicateId(record.id));
            }
            let formation = Formation::parse_or_default(&record.preferred_formation);
            let team_id = match record.club_id {
                Some(club_id) if club_index.contains_key(&club_id) => {
                    formation_by_club.insert(club_id.clone(), formation.clone());
                    Some(TeamId::new(club_id))
                }
                Some(club_id) => return Err(EngineError::UnknownTeam(TeamId::new(club_id))),
                None => None,
            };
            managers.push(Manager {
                id: record.id.into(),
                name: record.name,
                team_id,
                formation,
                ability: record.ability,
            });
        }

        let mut squads: BTreeMap<&str, Vec<&Player>> = BTreeMap::new();
        for player in &players {
            squads.entry(player.team_id.as_str()).or_default().push(player);
        }

        let mut teams = Vec::with_capacity(club_records.len());
        for club in &club_records {
            let squad = squads.get(club.id.as_str()).cloned().unwrap_or_default();
            let strength = rating.club_strength(club, &squad);
            let mut team = Team::new(club.id.as_str(), club.name.as_str(), club.country.as_str(), strength, bounds)?
                .with_players(squad.iter().map(|p| p.id.clone()).collect());
            if let Some(league) = &club.league_id {
                team = team.with_league(league.as_str());
            }
            let formation = match &club.formation {
                Some(code) => Some(Formation::parse_or_default(code)),
                None => formation_by_club.get(&club.id).cloned(),
            };
            if let Some(formation) = formation {
                team = team.with_formation(formation);
            }
            teams.push(team);
        }

        tracing::info!(
            leagues = leagues.len(),
            teams = teams.len(),
            players = players.len(),
            managers = managers.len(),
            "dataset normalized"
        );
        Ok(Self { leagues, teams, players, managers })
    }

    /// Leagues named in the data plus any league a club points at.
    pub fn league_ids(&self) -> Vec<LeagueId> {
        let mut ids: Vec<LeagueId> = self.leagues.iter().map(|l| l.id.clone()).collect();
        for team in &self.teams {
            if let Some(league) = &team.league {
                if !ids.contains(league) {
                    ids.push(league.clone());
                }
            }
        }
        ids
    }

    pub fn teams_in(&self, league: &LeagueId) -> Vec<Team> {
        self.teams.iter().filter(|t| t.league.as_ref() == Some(league)).cloned().collect()
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::WeightedClubStrength;

    fn provider() -> InMemoryProvider {
        let mut club = ClubRecord::new("ars", "Arsenal");
        club.league_id = Some("epl".into());
        InMemoryProvider {
            leagues: vec![LeagueRecord {
                id: "epl".into(),
                name: "Premier League".into(),
                country: "ENG".into(),
                champions_league_spots: 4,
                europa_league_spots: 2,
            }],
            clubs: vec![club, ClubRecord::new("che", "Chelsea")],
            players: vec![
                PlayerRecord {
                    id: "p1".into(),
                    name: "Keeper".into(),
                    club_id: Some("ars".into()),
                    position: "gk".into(),
                    skill: 80.0,
                },
                PlayerRecord {
                    id: "p2".into(),
                    name: "Free Agent".into(),
                    club_id: None,
                    position: "ST".into(),
                    skill: 70.0,
                },
            ],
            managers: vec![ManagerRecord {
                id: "m1".into(),
                name: "Boss".into(),
                club_id: Some("ars".into()),
                preferred_formation: "3-5-2".into(),
                ability: 80,
            }],
        }
    }

    fn normalize(p: &InMemoryProvider) -> Result<Dataset> {
        Dataset::normalize(p, &WeightedClubStrength::default(), &StrengthBounds::default())
    }

    #[test]
    fn normalizes_into_typed_entities() {
        let data = normalize(&provider()).unwrap();
        assert_eq!(data.teams.len(), 2);
        assert_eq!(data.players.len(), 1);
        assert_eq!(data.players[0].position, PositionCategory::GK);

        let arsenal = data.team(&"ars".into()).unwrap();
        assert_eq!(arsenal.player_ids, vec!["p1".into()]);
        assert_eq!(arsenal.formation, Some(Formation::F352));
        assert_eq!(arsenal.league, Some(LeagueId::from("epl")));
        assert!(arsenal.strength() >= 30.0 && arsenal.strength() <= 100.0);
        assert_eq!(data.teams_in(&"epl".into()).len(), 1);
    }

    #[test]
    fn duplicate_club_fails_fast() {
        let mut p = provider();
        p.clubs.push(ClubRecord::new("ars", "Arsenal again"));
        assert!(matches!(normalize(&p), Err(EngineError::DuplicateId(id)) if id == "ars"));
    }

    #[test]
    fn unknown_position_fails_fast() {
        let mut p = provider();
        p.players[0].position = "libero-ish".into();
        assert!(matches!(normalize(&p), Err(EngineError::Data(_))));
    }

    #[test]
    fn player_of_unknown_club_fails_fast() {
        let mut p = provider();
        p.players[0].club_id = Some("nowhere".into());
        assert!(matches!(normalize(&p), Err(EngineError::UnknownTeam(_))));
    }
}
