//! SQLite implementations of the repository traits.
//!
//! Each repository is a thin handle over the store's [`DbBroker`](crate::core::broker::DbBroker); every call
//! opens its own connection through the broker, so repositories are cheap to
//! clone and share.

use crate::core::error::KanbanError;
use crate::core::time;
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

pub mod board_repo;
pub mod card_repo;
pub mod column_repo;

pub use board_repo::SqliteBoardRepo;
pub use card_repo::SqliteCardRepo;
pub use column_repo::SqliteColumnRepo;

fn conversion_failure(idx: usize, err: KanbanError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    time::parse_timestamp(&raw).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn optional_timestamp_at(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => time::parse_timestamp(&raw)
            .map(Some)
            .map_err(|e| conversion_failure(idx, e)),
        None => Ok(None),
    }
}

/// Maps "no row changed" to the not-found kind for `<kind> <id>`.
pub(crate) fn ensure_affected(affected: usize, kind: &str, id: &str) -> Result<(), KanbanError> {
    if affected == 0 {
        return Err(KanbanError::NotFound(format!("{} {}", kind, id)));
    }
    Ok(())
}

/// Re-labels a storage failure with the position of the row inside a batch.
pub(crate) fn with_index(err: KanbanError, what: &str, index: usize) -> KanbanError {
    match err {
        KanbanError::Storage { source, .. } => KanbanError::Storage {
            context: format!("{} {}", what, index),
            source,
        },
        other => other,
    }
}
