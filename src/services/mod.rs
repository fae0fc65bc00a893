//! Application services: validation and business rules on top of the
//! repository traits. Services never touch SQL directly.

use crate::core::error::KanbanError;

pub mod board;
pub mod card;
pub mod column;

pub use board::BoardService;
pub use card::CardService;
pub use column::ColumnService;

/// Rejects titles that are empty or whitespace only.
pub(crate) fn require_title(kind: &str, title: &str) -> Result<(), KanbanError> {
    if title.trim().is_empty() {
        return Err(KanbanError::ValidationError(format!(
            "{} title cannot be empty",
            kind
        )));
    }
    Ok(())
}
