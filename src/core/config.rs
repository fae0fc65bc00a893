//! Store configuration loaded from `<root>/config.toml`.
//!
//! Every key is optional. A missing file means defaults.

use crate::core::db::DEFAULT_BUSY_TIMEOUT_SECS;
use crate::core::error::KanbanError;
use crate::core::schemas;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the store root when `--root` is not given.
pub const ROOT_ENV_VAR: &str = "KANBAN_HOME";
pub const DEFAULT_ROOT_DIR: &str = ".kanban";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KanbanConfig {
    /// Database file name, relative to the store root.
    pub database: String,
    /// Populate a sample board the first time the store is opened.
    pub seed_on_start: bool,
    /// Append one JSON line per storage operation to the audit log.
    pub audit_log: bool,
    /// Fallback filter for diagnostics when `RUST_LOG` is unset.
    pub log_level: String,
    pub busy_timeout_secs: u64,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            database: schemas::KANBAN_DB_NAME.to_string(),
            seed_on_start: true,
            audit_log: true,
            log_level: "warn".to_string(),
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

impl KanbanConfig {
    pub fn path(root: &Path) -> PathBuf {
        root.join(schemas::CONFIG_FILE_NAME)
    }

    pub fn load(root: &Path) -> Result<Self, KanbanError> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, KanbanError> {
        let config: Self =
            toml::from_str(content).map_err(|e| KanbanError::Config(e.to_string()))?;
        if config.database.trim().is_empty() {
            return Err(KanbanError::Config("database must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Writes the config file unless one already exists. Returns whether it wrote.
    pub fn write_default_if_missing(&self, root: &Path) -> Result<bool, KanbanError> {
        let path = Self::path(root);
        if path.exists() {
            return Ok(false);
        }
        let body = toml::to_string_pretty(self).map_err(|e| KanbanError::Config(e.to_string()))?;
        fs::write(&path, body)?;
        Ok(true)
    }
}

/// `--root` wins, then `KANBAN_HOME`, then `./.kanban`.
pub fn resolve_root(flag: Option<&Path>) -> PathBuf {
    if let Some(root) = flag {
        return root.to_path_buf();
    }
    match std::env::var(ROOT_ENV_VAR) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_ROOT_DIR),
    }
}
