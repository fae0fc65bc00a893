use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to initialize database: {0}")]
    DatabaseInitializationError(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Timestamp error: {0}")]
    Timestamp(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("cannot delete the last column in a board")]
    LastColumn,
}

impl KanbanError {
    pub fn is_validation(&self) -> bool {
        matches!(self, KanbanError::ValidationError(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, KanbanError::NotFound(_))
    }

    pub fn is_last_column(&self) -> bool {
        matches!(self, KanbanError::LastColumn)
    }
}

/// Attaches the failing operation to a raw SQLite error.
pub trait StorageContext<T> {
    fn context(self, context: &str) -> Result<T, KanbanError>;
}

impl<T> StorageContext<T> for Result<T, rusqlite::Error> {
    fn context(self, context: &str) -> Result<T, KanbanError> {
        self.map_err(|source| KanbanError::Storage {
            context: context.to_string(),
            source,
        })
    }
}
