//! JSON data directory provider
//!
//! Layout (every file optional except that some clubs must exist):
//! - `leagues.json`
//! - `clubs.json` and/or `<league>_clubs.json` (league taken from the file name
//!   when a club record does not name one)
//! - `players.json` and/or `players/*.json`
//! - `managers.json` and/or `managers/*.json`
//!
//! Each file holds either a JSON array of records or an object wrapping the
//! array under the collection name (`{"clubs": [...]}`).

use euro_core::data::{ClubRecord, DataProvider, LeagueRecord, ManagerRecord, PlayerRecord};
use euro_core::{EngineError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Records from `<root>/<name>.json` followed by `<root>/<name>/*.json`.
    fn collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let single = self.root.join(format!("{name}.json"));
        if single.is_file() {
            records.extend(read_records(&single, name)?);
        }
        let dir = self.root.join(name);
        if dir.is_dir() {
            for path in json_files(&dir)? {
                records.extend(read_records(&path, name)?);
            }
        }
        Ok(records)
    }
}

impl DataProvider for DirectoryProvider {
    fn leagues(&self) -> Result<Vec<LeagueRecord>> {
        self.collection("leagues")
    }

    fn clubs(&self) -> Result<Vec<ClubRecord>> {
        let mut clubs: Vec<ClubRecord> = self.collection("clubs")?;
        for path in json_files(&self.root)? {
            let Some(league) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix("_clubs.json"))
            else {
                continue;
            };
            let league = league.to_string();
            for mut club in read_records::<ClubRecord>(&path, "clubs")? {
                club.league_id.get_or_insert_with(|| league.clone());
                clubs.push(club);
            }
        }
        if clubs.is_empty() {
            return Err(EngineError::data(format!("no clubs found under {}", self.root.display())));
        }
        Ok(clubs)
    }

    fn players(&self) -> Result<Vec<PlayerRecord>> {
        self.collection("players")
    }

    fn managers(&self) -> Result<Vec<ManagerRecord>> {
        self.collection("managers")
    }
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| EngineError::data(format!("cannot list {}: {e}", dir.display())))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| EngineError::data(format!("cannot list {}: {e}", dir.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    // read_dir order is platform dependent
    files.sort();
    Ok(files)
}

fn read_records<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
    let text = fs::read_to_string(path)
        .map_err(|e| EngineError::data(format!("cannot read {}: {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map.remove(key).ok_or_else(|| {
            EngineError::data(format!("{} has no '{key}' array", path.display()))
        })?,
        _ => {
            return Err(EngineError::data(format!(
                "{} must hold an array of {key}",
                path.display()
            )))
        }
    };
    let records = serde_json::from_value(list)?;
    tracing::debug!(file = %path.display(), "loaded {key}");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_split_club_files_and_wrapped_arrays() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("leagues.json"),
            r#"[{"league_id": "epl", "league_name": "Premier", "ucl_spots": 4}]"#,
        )?;
        fs::write(
            dir.path().join("epl_clubs.json"),
            r#"{"clubs": [{"club_id": "ars", "club_name": "Arsenal"}]}"#,
        )?;
        fs::write(
            dir.path().join("clubs.json"),
            r#"[{"id": "rma", "name": "Real Madrid", "league": "laliga"}]"#,
        )?;
        fs::create_dir(dir.path().join("managers"))?;
        fs::write(
            dir.path().join("managers").join("1.json"),
            r#"[{"manager_id": "m1", "manager_name": "Boss", "club_id": "ars"}]"#,
        )?;

        let provider = DirectoryProvider::new(dir.path());
        let leagues = provider.leagues()?;
        assert_eq!(leagues[0].champions_league_spots, 4);

        let clubs = provider.clubs()?;
        assert_eq!(clubs.len(), 2);
        let ars = clubs.iter().find(|c| c.id == "ars").unwrap();
        assert_eq!(ars.league_id.as_deref(), Some("epl"));

        assert!(provider.players()?.is_empty());
        assert_eq!(provider.managers()?.len(), 1);
        Ok(())
    }

    #[test]
    fn empty_directory_has_no_clubs() {
        let dir = tempdir().unwrap();
        let provider = DirectoryProvider::new(dir.path());
        assert!(matches!(provider.clubs(), Err(EngineError::Data(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("clubs.json"), "{ not json").unwrap();
        let provider = DirectoryProvider::new(dir.path());
        assert!(matches!(provider.clubs(), Err(EngineError::Json(_))));
    }
}
