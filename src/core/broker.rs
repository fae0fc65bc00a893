use crate::core::db;
use crate::core::error::{self, StorageContext};
use crate::core::time;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The DB Broker is the single path to the database.
/// Every operation is serialized in-process, runs on a fresh connection with
/// the store pragmas applied, and leaves one line in the audit log.
#[derive(Debug, Clone)]
pub struct DbBroker {
    db_path: PathBuf,
    audit_log_path: Option<PathBuf>,
    actor: String,
    busy_timeout_secs: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BrokerEvent {
    pub ts: String,
    pub event_id: String,
    pub actor: String,
    pub op: String,
    pub db_id: String,
    pub status: String,
}

static DB_LOCK: Mutex<()> = Mutex::new(());

impl DbBroker {
    pub fn new(db_path: &Path, audit_log_path: Option<PathBuf>, busy_timeout_secs: u64) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            audit_log_path,
            actor: "kanban".to_string(),
            busy_timeout_secs,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn audit_log_path(&self) -> Option<&Path> {
        self.audit_log_path.as_deref()
    }

    /// Execute a closure with a serialized connection to the database.
    pub fn with_conn<F, R>(&self, op_name: &str, f: F) -> Result<R, error::KanbanError>
    where
        F: FnOnce(&Connection) -> Result<R, error::KanbanError>,
    {
        let _lock = DB_LOCK.lock().map_err(|_| {
            error::KanbanError::DatabaseInitializationError("broker lock poisoned".to_string())
        })?;
        let conn = db::db_connect(&self.db_path, self.busy_timeout_secs)?;

        let result = f(&conn);
        self.record(op_name, result.is_ok());
        result
    }

    /// Like [`DbBroker::with_conn`], but the closure runs inside one transaction.
    /// An error from the closure rolls everything back.
    pub fn with_tx<F, R>(&self, op_name: &str, f: F) -> Result<R, error::KanbanError>
    where
        F: FnOnce(&Connection) -> Result<R, error::KanbanError>,
    {
        let _lock = DB_LOCK.lock().map_err(|_| {
            error::KanbanError::DatabaseInitializationError("broker lock poisoned".to_string())
        })?;
        let mut conn = db::db_connect(&self.db_path, self.busy_timeout_secs)?;

        let result: Result<R, error::KanbanError> = (|| {
            let tx = conn.transaction().context("begin tx")?;
            let value = f(&tx)?;
            tx.commit().context("commit tx")?;
            Ok(value)
        })();
        self.record(op_name, result.is_ok());
        result
    }

    fn record(&self, op: &str, ok: bool) {
        let status = if ok { "success" } else { "error" };
        tracing::debug!(op, status, "broker op");
        if let Err(err) = self.log_event(op, status) {
            tracing::warn!(op, error = %err, "failed to append audit event");
        }
    }

    fn log_event(&self, op: &str, status: &str) -> Result<(), error::KanbanError> {
        let Some(path) = &self.audit_log_path else {
            return Ok(());
        };

        let ev = BrokerEvent {
            ts: time::format_timestamp(&time::now_utc()),
            event_id: time::new_id(),
            actor: self.actor.clone(),
            op: op.to_string(),
            db_id: self
                .db_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            status: status.to_string(),
        };

        let mut f = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(f, "{}", serde_json::to_string(&ev)?)?;
        Ok(())
    }
}

/// Last `limit` audit events, oldest first. Malformed lines are skipped.
pub fn read_audit_tail(path: &Path, limit: usize) -> Result<Vec<BrokerEvent>, error::KanbanError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    let events: Vec<BrokerEvent> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    let skip = events.len().saturating_sub(limit);
    Ok(events.into_iter().skip(skip).collect())
}
