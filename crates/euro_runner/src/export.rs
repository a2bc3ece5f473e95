//! CSV / JSON exports of a simulated season.

use crate::SeasonOutcome;
use anyhow::{Context, Result};
use euro_core::engine::standings::StandingsRow;
use euro_core::{SeasonReport, TournamentReport};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Files written by [`export_season`].
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct TableRow<'a> {
    #[serde(rename = "Position")]
    position: usize,
    #[serde(rename = "Club")]
    club: &'a str,
    #[serde(rename = "Played")]
    played: u32,
    #[serde(rename = "Won")]
    won: u32,
    #[serde(rename = "Drawn")]
    drawn: u32,
    #[serde(rename = "Lost")]
    lost: u32,
    #[serde(rename = "Goals_For")]
    goals_for: u32,
    #[serde(rename = "Goals_Against")]
    goals_against: u32,
    #[serde(rename = "Goal_Difference")]
    goal_difference: i32,
    #[serde(rename = "Points")]
    points: u32,
}

#[derive(Serialize)]
struct TieRow<'a> {
    #[serde(rename = "Stage")]
    stage: String,
    #[serde(rename = "Team_A")]
    team_a: &'a str,
    #[serde(rename = "Team_B")]
    team_b: &'a str,
    #[serde(rename = "Legs")]
    legs: usize,
    #[serde(rename = "Aggregate")]
    aggregate: String,
    #[serde(rename = "Penalties")]
    penalties: String,
    #[serde(rename = "Winner")]
    winner: &'a str,
    #[serde(rename = "Method")]
    method: String,
}

#[derive(Serialize)]
struct PlayerRow<'a> {
    #[serde(rename = "Player_ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Club")]
    club: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Matches")]
    matches: u32,
    #[serde(rename = "Goals")]
    goals: u32,
    #[serde(rename = "Assists")]
    assists: u32,
    #[serde(rename = "Clean_Sheets")]
    clean_sheets: u32,
    #[serde(rename = "Avg_Rating")]
    avg_rating: f64,
    #[serde(rename = "Form")]
    form: f64,
}

#[derive(Serialize)]
struct ManagerRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Manager")]
    manager: &'a str,
    #[serde(rename = "Club")]
    club: &'a str,
    #[serde(rename = "League_Position")]
    league_position: usize,
    #[serde(rename = "Score")]
    score: f64,
}

/// Write every table of `outcome` into `dir`, creating it when needed.
pub fn export_season(dir: &Path, outcome: &SeasonOutcome) -> Result<ExportSummary> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let mut summary = ExportSummary::default();

    for season in &outcome.domestic {
        let path = dir.join(format!("domestic_{}.csv", slug(season.league.as_str())));
        write_domestic(&path, season)?;
        summary.files.push(path);
    }

    for report in &outcome.tournaments {
        let prefix = slug(&report.competition);

        let path = dir.join(format!("{prefix}_league_phase.csv"));
        write_table(&path, &report.league_table)?;
        summary.files.push(path);

        let path = dir.join(format!("{prefix}_knockout.csv"));
        write_knockout(&path, report)?;
        summary.files.push(path);

        let path = dir.join(format!("{prefix}_players.csv"));
        write_players(&path, report)?;
        summary.files.push(path);

        let path = dir.join(format!("{prefix}_managers.csv"));
        write_managers(&path, report)?;
        summary.files.push(path);

        let path = dir.join(format!("{prefix}_report.json"));
        let json = report.to_json().context("Failed to serialize report")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        summary.files.push(path);
    }

    tracing::info!(files = summary.files.len(), dir = %dir.display(), "exports written");
    Ok(summary)
}

fn write_domestic(path: &Path, season: &SeasonReport) -> Result<()> {
    write_table(path, &season.table)
}

fn write_table(path: &Path, rows: &[StandingsRow]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    for (i, row) in rows.iter().enumerate() {
        writer.serialize(TableRow {
            position: i + 1,
            club: &row.name,
            played: row.played,
            won: row.won,
            drawn: row.drawn,
            lost: row.lost,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference(),
            points: row.points,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_knockout(path: &Path, report: &TournamentReport) -> Result<()> {
    let mut writer = csv_writer(path)?;
    for round in &report.knockout.rounds {
        for tie in &round.ties {
            writer.serialize(TieRow {
                stage: round.stage.to_string(),
                team_a: report.team_name(&tie.team_a),
                team_b: report.team_name(&tie.team_b),
                legs: tie.legs.len(),
                aggregate: format!("{}-{}", tie.aggregate.0, tie.aggregate.1),
                penalties: tie
                    .shootout
                    .map(|s| format!("{}-{}", s.home, s.away))
                    .unwrap_or_default(),
                winner: report.team_name(&tie.winner),
                method: format!("{:?}", tie.method),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_players(path: &Path, report: &TournamentReport) -> Result<()> {
    let mut writer = csv_writer(path)?;
    for player in report.players.iter().filter(|p| p.stats().matches_played() > 0) {
        let stats = player.stats();
        writer.serialize(PlayerRow {
            id: player.id.as_str(),
            name: &player.name,
            club: report.team_name(&player.team_id),
            position: player.position.as_str(),
            matches: stats.matches_played(),
            goals: stats.goals(),
            assists: stats.assists(),
            clean_sheets: stats.clean_sheets(),
            avg_rating: stats.avg_rating(),
            form: player.form(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_managers(path: &Path, report: &TournamentReport) -> Result<()> {
    let mut writer = csv_writer(path)?;
    for (i, award) in report.manager_shortlist.iter().enumerate() {
        writer.serialize(ManagerRow {
            rank: i + 1,
            manager: &award.name,
            club: report.team_name(&award.team),
            league_position: award.league_position,
            score: award.score,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Lowercase file-name stem: letters and digits kept, everything else `_`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
