use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::{BackingStore, HttpStore, SqliteStore, StoreError};
use crate::sync::StaleReloadPolicy;

/// Per-project state directory, relative to the project root.
pub const BOARD_DIR: &str = ".draftboard";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Which authoritative store the board talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Database file, relative to `.draftboard/` unless absolute.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_db_path(),
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub stale_reloads: StaleReloadPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

impl ProjectConfig {
    /// Absolute location of the `SQLite` board for a project rooted at `root`.
    #[must_use]
    pub fn db_path(&self, project_root: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            project_root.join(BOARD_DIR).join(&self.store.path)
        }
    }

    /// Open the configured backing store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInitialized`] when the `SQLite` board does not
    /// exist yet.
    pub fn open_store(&self, project_root: &Path) -> Result<Box<dyn BackingStore>, StoreError> {
        match self.store.backend {
            Backend::Sqlite => {
                let store = SqliteStore::open(&self.db_path(project_root))?;
                Ok(Box::new(store))
            }
            Backend::Http => {
                let timeout = Duration::from_secs(self.store.timeout_secs);
                Ok(Box::new(HttpStore::new(&self.store.url, timeout)))
            }
        }
    }
}

/// Load `.draftboard/config.toml`, falling back to defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(BOARD_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write `config` to `.draftboard/config.toml`, creating the directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_project_config(project_root: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let dir = project_root.join(BOARD_DIR);
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join("config.toml");
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// # Errors
///
/// Returns an error if the user config exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("draftboard/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// # Errors
///
/// Returns an error if either config file is malformed.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.clone(), env_format);

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn resolve_output(cli_json: bool, user_output: Option<String>, env_format: Option<String>) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some("pretty"),
            "text" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("board.db")
}

fn default_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.store.backend, Backend::Sqlite);
        assert_eq!(cfg.store.url, "http://127.0.0.1:5000");
        assert_eq!(cfg.store.timeout_secs, 10);
        assert_eq!(cfg.sync.stale_reloads, StaleReloadPolicy::Discard);
        assert_eq!(
            cfg.db_path(root.path()),
            root.path().join(".draftboard/board.db")
        );
    }

    #[test]
    fn partial_project_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let dir = root.path().join(BOARD_DIR);
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(
            dir.join("config.toml"),
            "[store]\nbackend = \"http\"\nurl = \"http://draft.local:8080\"\n\n[sync]\nstale_reloads = \"last-write-wins\"\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load");
        assert_eq!(cfg.store.backend, Backend::Http);
        assert_eq!(cfg.store.url, "http://draft.local:8080");
        assert_eq!(cfg.store.path, PathBuf::from("board.db"));
        assert_eq!(cfg.sync.stale_reloads, StaleReloadPolicy::LastWriteWins);
    }

    #[test]
    fn malformed_project_config_names_the_file() {
        let root = tempfile::tempdir().expect("temp dir");
        let dir = root.path().join(BOARD_DIR);
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(dir.join("config.toml"), "[store\nbackend=").expect("write config");

        let err = load_project_config(root.path()).expect_err("should fail");
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn written_config_reads_back() {
        let root = tempfile::tempdir().expect("temp dir");
        let mut cfg = ProjectConfig::default();
        cfg.store.timeout_secs = 3;
        let path = write_project_config(root.path(), &cfg).expect("write");
        assert!(path.ends_with(".draftboard/config.toml"));

        let back = load_project_config(root.path()).expect("load");
        assert_eq!(back.store.timeout_secs, 3);
    }

    #[test]
    fn absolute_db_path_is_used_as_is() {
        let mut cfg = ProjectConfig::default();
        cfg.store.path = PathBuf::from("/var/lib/draft/board.db");
        assert_eq!(
            cfg.db_path(Path::new("/home/me/league")),
            PathBuf::from("/var/lib/draft/board.db")
        );
    }

    #[test]
    fn opening_missing_sqlite_board_is_not_initialized() {
        let root = tempfile::tempdir().expect("temp dir");
        let err = ProjectConfig::default()
            .open_store(root.path())
            .err()
            .expect("should fail");
        assert!(matches!(err, StoreError::NotInitialized(_)));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        let output = resolve_output(true, Some("pretty".to_string()), Some("text".to_string()));
        assert_eq!(output, "json");
    }

    #[test]
    fn mode_names_are_case_insensitive_and_exact() {
        let pretty = resolve_output(false, None, Some(" Pretty ".to_string()));
        assert_eq!(pretty, "pretty");

        let text = resolve_output(false, Some("text".to_string()), Some("table".to_string()));
        assert_eq!(text, "text");
    }

    #[test]
    fn unknown_env_format_falls_through_to_user_config() {
        let output = resolve_output(false, Some("json".to_string()), Some("yaml".to_string()));
        assert_eq!(output, "json");
    }

    #[test]
    fn user_config_parses_output() {
        let cfg: UserConfig = toml::from_str("output = \"text\"\n").expect("parse");
        assert_eq!(cfg.output.as_deref(), Some("text"));
    }
}
