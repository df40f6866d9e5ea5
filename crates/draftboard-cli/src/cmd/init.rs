use crate::output::{OutputMode, pretty_kv, render};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use draftboard_core::config::{BOARD_DIR, Backend, ProjectConfig, write_project_config};
use draftboard_core::db;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Local `SQLite` file under `.draftboard/`.
    Sqlite,
    /// Remote board server speaking the JSON API.
    Http,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlite => Self::Sqlite,
            BackendArg::Http => Self::Http,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.draftboard/` already exists.
    #[arg(long)]
    pub force: bool,

    /// Which store holds the authoritative order.
    #[arg(long, value_enum, default_value_t = BackendArg::Sqlite)]
    pub backend: BackendArg,

    /// Base URL of the board server (http backend only).
    #[arg(long)]
    pub url: Option<String>,
}

const GITIGNORE: &str = "*.db\n*.db-wal\n*.db-shm\n";

#[derive(Debug, Serialize)]
struct InitReport {
    config: PathBuf,
    backend: Backend,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// Execute `dboard init`. Creates the project skeleton:
///
/// ```text
/// .draftboard/
///   config.toml   (store backend + sync policy)
///   board.db      (sqlite backend only, migrated and empty)
///   .gitignore
/// ```
///
/// # Errors
///
/// Returns an error if `.draftboard/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let board_dir = project_root.join(BOARD_DIR);
    if board_dir.exists() && !args.force {
        anyhow::bail!(
            "{BOARD_DIR}/ already exists. Use `dboard init --force` to reinitialize."
        );
    }

    let mut config = ProjectConfig::default();
    config.store.backend = args.backend.into();
    if let Some(url) = &args.url {
        config.store.url.clone_from(url);
    }
    let config_path = write_project_config(project_root, &config)?;

    let gitignore_path = board_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write .gitignore: {}", gitignore_path.display()))?;

    let database = match config.store.backend {
        Backend::Sqlite => {
            let path = config.db_path(project_root);
            db::open_board_db(&path)?;
            Some(path)
        }
        Backend::Http => None,
    };

    let report = InitReport {
        config: config_path,
        backend: config.store.backend,
        url: (config.store.backend == Backend::Http).then(|| config.store.url.clone()),
        database,
    };

    render(output, &report, |r, w| {
        writeln!(w, "✓ Initialized {BOARD_DIR}/")?;
        pretty_kv(w, "config", r.config.display().to_string())?;
        if let Some(db) = &r.database {
            pretty_kv(w, "database", db.display().to_string())?;
            writeln!(w)?;
            writeln!(w, "Next: load players with `dboard import players.json`")?;
        }
        if let Some(url) = &r.url {
            pretty_kv(w, "server", url)?;
        }
        Ok(())
    })
}
