//! Euro Runner Library
//!
//! Data directory → normalized dataset → domestic seasons → qualification →
//! continental competitions → console report and CSV / JSON exports.

pub mod export;
pub mod provider;
pub mod report;

use anyhow::{Context, Result};
use euro_core::config::StrengthBounds;
use euro_core::{
    CompetitionFormat, Dataset, DomesticSeason, EngineConfig, LeagueId, QualificationRules,
    SeasonReport, TeamId, Tournament, TournamentReport, WeightedClubStrength,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

pub use export::{export_season, ExportSummary};
pub use provider::DirectoryProvider;

/// Which continental competitions to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Competition {
    Ucl,
    Uel,
    Both,
}

impl Competition {
    fn includes_ucl(self) -> bool {
        matches!(self, Competition::Ucl | Competition::Both)
    }

    fn includes_uel(self) -> bool {
        matches!(self, Competition::Uel | Competition::Both)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub competition: Competition,
    pub seed: u64,
    pub config: EngineConfig,
}

/// One simulated season: every domestic league, then the cups it feeds.
#[derive(Debug, Clone)]
pub struct SeasonOutcome {
    pub seed: u64,
    pub domestic: Vec<SeasonReport>,
    pub tournaments: Vec<TournamentReport>,
}

/// Load and normalize a data directory.
pub fn load_dataset(dir: &Path, bounds: &StrengthBounds) -> Result<Dataset> {
    let provider = DirectoryProvider::new(dir);
    let rating = WeightedClubStrength::with_bounds(*bounds);
    Dataset::normalize(&provider, &rating, bounds)
        .with_context(|| format!("Failed to load data from {}", dir.display()))
}

/// Read an engine configuration file (validated).
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    EngineConfig::from_json(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn simulate_season(dataset: &Dataset, options: &RunOptions) -> Result<SeasonOutcome> {
    let config = &options.config;
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);

    let season = DomesticSeason::new(config);
    let mut domestic = Vec::new();
    let mut rankings: HashMap<LeagueId, Vec<TeamId>> = HashMap::new();
    for league in dataset.league_ids() {
        let teams = dataset.teams_in(&league);
        if teams.len() < 2 {
            tracing::debug!(league = %league, clubs = teams.len(), "not enough clubs for a season");
            continue;
        }
        let report = season
            .run(&league, &teams, &mut rng)
            .with_context(|| format!("Domestic season failed for {league}"))?;
        rankings.insert(league.clone(), report.ranked_ids());
        domestic.push(report);
    }

    let ucl_format = CompetitionFormat::champions_league();
    let ucl_field = QualificationRules::champions_league(&dataset.leagues, ucl_format.team_count)
        .qualify(&dataset.teams, &rankings, &HashSet::new());

    let mut tournaments = Vec::new();
    if options.competition.includes_ucl() {
        let tournament = Tournament::with_seed(
            config.clone(),
            ucl_format.clone(),
            ucl_field.clone(),
            dataset.players.clone(),
            dataset.managers.clone(),
            options.seed.wrapping_add(1),
        )?;
        tournaments.push(tournament.run().context("Champions League run failed")?);
    }

    if options.competition.includes_uel() {
        let uel_format = CompetitionFormat::europa_league();
        let excluded: HashSet<TeamId> = ucl_field.iter().map(|t| t.id.clone()).collect();
        let uel_field = QualificationRules::europa_league(&dataset.leagues, uel_format.team_count)
            .qualify(&dataset.teams, &rankings, &excluded);
        if uel_field.len() < 2 {
            tracing::warn!(qualifiers = uel_field.len(), "not enough clubs left for the Europa League");
        } else {
            let tournament = Tournament::with_seed(
                config.clone(),
                uel_format,
                uel_field,
                dataset.players.clone(),
                dataset.managers.clone(),
                options.seed.wrapping_add(2),
            )?;
            tournaments.push(tournament.run().context("Europa League run failed")?);
        }
    }

    Ok(SeasonOutcome { seed: options.seed, domestic, tournaments })
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn write_data_dir(dir: &Path) -> Result<()> {
        let leagues = json!([
            {"league_id": "epl", "league_name": "Premier", "country": "England", "ucl_spots": 3},
            {"league_id": "liga", "league_name": "Liga", "country": "Spain", "ucl_spots": 3}
        ]);
        let positions = ["GK", "CB", "CB", "LB", "RB", "CM", "CM", "CAM", "LW", "RW", "ST", "GK", "CB", "CM"];
        let mut clubs = Vec::new();
        let mut players = Vec::new();
        let mut managers = Vec::new();
        for (league, prefix) in [("epl", "E"), ("liga", "L")] {
            for c in 0..4 {
                let club_id = format!("{prefix}{c}");
                clubs.push(json!({
                    "club_id": club_id,
                    "club_name": format!("{prefix} Club {c}"),
                    "league": league,
                    "reputation": 90 - c * 5,
                }));
                for (n, pos) in positions.iter().enumerate() {
                    players.push(json!({
                        "player_id": format!("{club_id}-{n}"),
                        "full_name": format!("Player {club_id}-{n}"),
                        "current_club_id": club_id,
                        "primary_position": pos,
                        "current_ability": 60 + (n % 7) * 3,
                    }));
                }
                managers.push(json!({
                    "manager_id": format!("M-{club_id}"),
                    "manager_name": format!("Manager {club_id}"),
                    "club_id": club_id,
                    "formation": "4-4-2",
                }));
            }
        }
        fs::write(dir.join("leagues.json"), leagues.to_string())?;
        fs::write(dir.join("clubs.json"), json!(clubs).to_string())?;
        fs::write(dir.join("players.json"), json!({ "players": players }).to_string())?;
        fs::write(dir.join("managers.json"), json!(managers).to_string())?;
        Ok(())
    }

    #[test]
    fn directory_to_exports() -> Result<()> {
        let data = tempdir()?;
        write_data_dir(data.path())?;
        let config = EngineConfig::default();
        let dataset = load_dataset(data.path(), &config.strength)?;
        assert_eq!(dataset.teams.len(), 8);
        assert_eq!(dataset.managers.len(), 8);

        let outcome = simulate_season(
            &dataset,
            &RunOptions { competition: Competition::Ucl, seed: 3, config },
        )?;
        assert_eq!(outcome.domestic.len(), 2);
        assert_eq!(outcome.tournaments.len(), 1);
        let report = &outcome.tournaments[0];
        assert_eq!(report.teams.len(), 8);
        assert!(report.champion.is_some());

        let out = tempdir()?;
        let summary = export_season(out.path(), &outcome)?;
        for file in &summary.files {
            assert!(file.is_file(), "{}", file.display());
        }
        let mut reader = csv::Reader::from_path(out.path().join("champions_league_league_phase.csv"))?;
        assert_eq!(reader.records().count(), 8);
        let mut reader = csv::Reader::from_path(out.path().join("domestic_epl.csv"))?;
        assert_eq!(reader.records().count(), 4);

        let json = fs::read_to_string(out.path().join("champions_league_report.json"))?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["competition"], "Champions League");
        Ok(())
    }

    #[test]
    fn europa_league_skips_champions_league_clubs() -> Result<()> {
        let dataset = euro_core::demo::synthetic_dataset(80, 4)?;
        let outcome = simulate_season(
            &dataset,
            &RunOptions { competition: Competition::Both, seed: 8, config: EngineConfig::default() },
        )?;
        assert_eq!(outcome.tournaments.len(), 2);
        let ucl: HashSet<&TeamId> = outcome.tournaments[0].teams.iter().map(|t| &t.id).collect();
        let uel: HashSet<&TeamId> = outcome.tournaments[1].teams.iter().map(|t| &t.id).collect();
        assert_eq!(ucl.len(), 36);
        assert_eq!(uel.len(), 36);
        assert!(ucl.is_disjoint(&uel));
        Ok(())
    }

    #[test]
    fn same_seed_same_season() -> Result<()> {
        let dataset = euro_core::demo::synthetic_dataset(36, 2)?;
        let options = RunOptions { competition: Competition::Ucl, seed: 5, config: EngineConfig::default() };
        let a = simulate_season(&dataset, &options)?;
        let b = simulate_season(&dataset, &options)?;
        assert_eq!(a.tournaments[0].to_json()?, b.tournaments[0].to_json()?);
        assert_eq!(a.domestic[0].table, b.domestic[0].table);
        Ok(())
    }

    #[test]
    fn invalid_config_file_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"match": {"base_draw": 1.5}}"#)?;
        assert!(load_config(&path).is_err());

        fs::write(&path, serde_json::to_string(&EngineConfig::legacy())?)?;
        assert!(load_config(&path)?.use_away_goals_rule);
        Ok(())
    }
}
