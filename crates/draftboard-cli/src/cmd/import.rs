//! `dboard import`: load a projection sheet into the `SQLite` board.
//!
//! The input is a JSON array of rows:
//!
//! ```json
//! [{"name": "Nikola Jokic", "team": "DEN", "center": true,
//!   "gamesPlayed": 70, "fantasyPointsPerGame": 61.2, "adp": 1.1}]
//! ```

use crate::output::{OutputMode, pretty_kv, render};
use anyhow::{Context as _, Result};
use clap::Args;
use draftboard_core::config::{Backend, load_project_config};
use draftboard_core::db::{self, seed::SeedPlayer, seed::import_players};
use draftboard_core::store::StoreError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file with an array of player rows.
    pub file: PathBuf,

    /// Delete every existing player before importing.
    #[arg(long)]
    pub replace: bool,
}

fn read_rows(path: &Path) -> Result<Vec<SeedPlayer>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    if config.store.backend != Backend::Sqlite {
        return Err(StoreError::Unsupported("importing into a remote store").into());
    }

    let db_path = config.db_path(project_root);
    if !db_path.exists() {
        return Err(StoreError::NotInitialized(db_path).into());
    }

    let rows = read_rows(&args.file)?;
    let mut conn = db::open_board_db(&db_path)?;
    let report = import_players(&mut conn, rows, args.replace)
        .with_context(|| format!("Failed to import into {}", db_path.display()))?;
    info!(
        imported = report.imported,
        replaced = report.replaced,
        "players imported"
    );

    render(output, &report, |r, w| {
        pretty_kv(w, "imported", r.imported.to_string())?;
        if args.replace {
            pretty_kv(w, "replaced", r.replaced.to_string())?;
        }
        for (column, count) in &r.by_column {
            pretty_kv(w, column, count.to_string())?;
        }
        w.flush()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_decode_from_camel_case_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("players.json");
        std::fs::write(
            &path,
            r#"[{"name":"Trae Young","team":"ATL","guard":true,"fantasyPointsPerGame":48.0,"threePointersMade":3.1},
                {"name":"Unknown"}]"#,
        )
        .expect("write rows");

        let rows = read_rows(&path).expect("decode");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].guard);
        assert_eq!(rows[0].three_pointers_made, Some(3.1));
        assert_eq!(rows[1].fantasy_points_per_game, None);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("write");
        let err = read_rows(&path).expect_err("parse fails");
        assert!(err.to_string().contains("broken.json"));
    }
}
