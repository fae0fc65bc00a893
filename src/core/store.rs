//! Store handle for the kanban state workspace.
//!
//! A store is a directory holding the SQLite database, the audit log and an
//! optional `config.toml`. Opening a store creates the directory and applies
//! the schema.

use crate::core::broker::DbBroker;
use crate::core::config::KanbanConfig;
use crate::core::db;
use crate::core::error::KanbanError;
use crate::core::schemas;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute or caller-relative path to the store root directory
    pub root: PathBuf,
    pub config: KanbanConfig,
    broker: DbBroker,
}

impl Store {
    /// Opens the store at `root` using `<root>/config.toml` (or defaults).
    pub fn open(root: &Path) -> Result<Self, KanbanError> {
        fs::create_dir_all(root)?;
        let config = KanbanConfig::load(root)?;
        Self::open_with_config(root, config)
    }

    pub fn open_with_config(root: &Path, config: KanbanConfig) -> Result<Self, KanbanError> {
        fs::create_dir_all(root)?;
        let audit = config
            .audit_log
            .then(|| root.join(schemas::AUDIT_LOG_NAME));
        let broker = DbBroker::new(
            &root.join(&config.database),
            audit,
            config.busy_timeout_secs,
        );
        broker.with_conn("store.init", db::initialize_kanban_db)?;
        tracing::debug!(root = %root.display(), "store opened");

        Ok(Self {
            root: root.to_path_buf(),
            config,
            broker,
        })
    }

    pub fn broker(&self) -> &DbBroker {
        &self.broker
    }

    pub fn db_path(&self) -> &Path {
        self.broker.db_path()
    }
}
