//! Synthetic clubs, players and managers for self-contained runs.

use crate::config::StrengthBounds;
use crate::data::{ClubRecord, Dataset, InMemoryProvider, LeagueRecord, ManagerRecord, PlayerRecord};
use crate::error::{EngineError, Result};
use crate::models::Formation;
use crate::rating::WeightedClubStrength;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LEAGUES: [(&str, &str, &str); 5] = [
    ("ENG1", "Premier Division", "England"),
    ("ESP1", "Primera", "Spain"),
    ("GER1", "Erste Liga", "Germany"),
    ("ITA1", "Serie Uno", "Italy"),
    ("FRA1", "Division Une", "France"),
];

const TOWNS: [&str; 24] = [
    "Ashford", "Brackley", "Castellon", "Dorfheim", "Esterra", "Fontaine", "Granvia", "Holtz",
    "Isola", "Jarnac", "Kellburg", "Lormont", "Marbella", "Norden", "Oriano", "Pradal",
    "Quimper", "Rosenau", "Salento", "Tavira", "Ulmen", "Valence", "Wexham", "Zamora",
];

const SURNAMES: [&str; 16] = [
    "Adler", "Bianchi", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ivanov",
    "Jensen", "Keller", "Lopez", "Moreau", "Novak", "Rossi", "Silva",
];

/// Squad shape: detailed position codes, one entry per player.
const SQUAD: [&str; 21] = [
    "GK", "GK", "CB", "CB", "CB", "LB", "RB", "LB", "RB", "CDM", "CM", "CM", "CAM", "LM", "RM",
    "CM", "ST", "ST", "LW", "RW", "CF",
];

/// Deterministic dataset of `teams` clubs spread over five leagues.
pub fn synthetic_dataset(teams: usize, seed: u64) -> Result<Dataset> {
    if teams == 0 {
        return Err(EngineError::InvalidConfig("synthetic dataset needs at least one club".into()));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut provider = InMemoryProvider::default();

    let per_league = teams.div_ceil(LEAGUES.len());
    for (id, name, country) in LEAGUES {
        provider.leagues.push(LeagueRecord {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            champions_league_spots: per_league.min(4),
            europa_league_spots: per_league.saturating_sub(4).min(3),
        });
    }

    for i in 0..teams {
        let (league, _, country) = LEAGUES[i % LEAGUES.len()];
        let club_id = format!("C{:03}", i + 1);
        let town = TOWNS[i % TOWNS.len()];
        let name = if i < TOWNS.len() { format!("{town} FC") } else { format!("{town} United {}", i / TOWNS.len()) };

        let reputation: f64 = rng.gen_range(55.0..95.0);
        let mut club = ClubRecord::new(club_id.clone(), name);
        club.country = country.to_string();
        club.league_id = Some(league.to_string());
        club.reputation = round1(reputation);
        club.transfer_budget = (reputation * rng.gen_range(0.5..2.0)).round() * 1_000_000.0;
        club.weekly_wages = (reputation * rng.gen_range(10.0..30.0)).round() * 1_000.0;
        club.league_titles = rng.gen_range(0..(reputation as u32 / 8));
        club.continental_titles = rng.gen_range(0..=(reputation as u32).saturating_sub(80) / 4);
        provider.clubs.push(club);

        let base = 45.0 + (reputation - 55.0) * 0.9;
        for (n, position) in SQUAD.iter().enumerate() {
            let surname = SURNAMES.choose(&mut rng).copied().unwrap_or("Player");
            provider.players.push(PlayerRecord {
                id: format!("{club_id}-P{:02}", n + 1),
                name: format!("{} {surname}", (b'A' + (n as u8 % 26)) as char),
                club_id: Some(club_id.clone()),
                position: position.to_string(),
                skill: round1((base + rng.gen_range(-8.0..8.0)).clamp(35.0, 95.0)),
            });
        }

        let formation = Formation::ALL.choose(&mut rng).cloned().unwrap_or_default();
        provider.managers.push(ManagerRecord {
            id: format!("M{:03}", i + 1),
            name: format!("Coach {}", SURNAMES[i % SURNAMES.len()]),
            club_id: Some(club_id),
            preferred_formation: formation.code().to_string(),
            ability: rng.gen_range(60..=95),
        });
    }

    let bounds = StrengthBounds::default();
    Dataset::normalize(&provider, &WeightedClubStrength::with_bounds(bounds), &bounds)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
