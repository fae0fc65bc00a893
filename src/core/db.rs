use crate::core::error::{self, StorageContext};
use crate::core::schemas;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

pub fn db_connect(db_path: &Path, busy_timeout_secs: u64) -> Result<Connection, error::KanbanError> {
    let conn = Connection::open(db_path).context("open database")?;
    conn.busy_timeout(Duration::from_secs(busy_timeout_secs))
        .context("set busy timeout")?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .context("enable foreign keys")?;
    Ok(conn)
}

pub fn schema_version(conn: &Connection) -> Result<u32, error::KanbanError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("read schema version")
}

/// Applies the schema. Safe to run on every open.
pub fn initialize_kanban_db(conn: &Connection) -> Result<(), error::KanbanError> {
    let current = schema_version(conn)?;
    if current > schemas::KANBAN_SCHEMA_VERSION {
        return Err(error::KanbanError::DatabaseInitializationError(format!(
            "database schema version {} is newer than supported version {}",
            current,
            schemas::KANBAN_SCHEMA_VERSION
        )));
    }

    for stmt in schemas::KANBAN_DB_SCHEMA {
        conn.execute(stmt, []).context("run migrations")?;
    }
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        schemas::KANBAN_SCHEMA_VERSION
    ))
    .context("write schema version")?;
    Ok(())
}
