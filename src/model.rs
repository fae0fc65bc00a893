//! Domain entities and the repository capabilities the services rely on.
//!
//! Boards own columns and columns own cards. Siblings are ordered by an
//! integer `position`; new siblings land at `max + POSITION_GAP`.

use crate::core::error::KanbanError;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance between consecutive sibling positions.
pub const POSITION_GAP: i64 = 1000;

/// Position for a new sibling given the current maximum (0 for an empty scope).
pub fn next_position(max_position: i64) -> Result<i64, KanbanError> {
    nth_position_after(max_position, 1)
}

/// Position of the `n`th sibling appended after `max_position`.
///
/// Moves accept any integer, so a scope can be pushed to the top of the `i64`
/// range; appending past it is rejected instead of wrapping around.
pub fn nth_position_after(max_position: i64, n: i64) -> Result<i64, KanbanError> {
    n.checked_mul(POSITION_GAP)
        .and_then(|offset| max_position.checked_add(offset))
        .ok_or_else(|| {
            KanbanError::ValidationError(format!(
                "no position left after {}; move items to lower positions first",
                max_position
            ))
        })
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(KanbanError::ValidationError(format!(
                "invalid priority '{}': expected low, medium or high",
                other
            ))),
        }
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            // Rows written without an explicit priority fall back to the column default.
            ValueRef::Null => Ok(Priority::default()),
            _ => value
                .as_str()?
                .parse()
                .map_err(|e: KanbanError| FromSqlError::Other(Box::new(e))),
        }
    }
}

/// Partial card update. `None` leaves a field alone.
///
/// `due_date` distinguishes absent from empty: `Some("")` clears the due date,
/// any other string must parse as a timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Normalized form of [`CardUpdate`] handed to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the stored due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// A board with every column and each column's cards, all in position order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BoardData {
    pub board: Board,
    pub columns: Vec<ColumnWithCards>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnWithCards {
    pub column: Column,
    pub cards: Vec<Card>,
}

pub trait BoardRepository: Send + Sync {
    /// All boards, oldest first.
    fn get_all(&self) -> Result<Vec<Board>, KanbanError>;
    fn get_by_id(&self, id: &str) -> Result<Board, KanbanError>;
    /// Persists the board, its initial columns and any cards placed in them as
    /// one atomic unit.
    fn create_with_columns(
        &self,
        board: &Board,
        columns: &[Column],
        cards: &[Card],
    ) -> Result<(), KanbanError>;
    fn update(&self, board: &Board) -> Result<(), KanbanError>;
    fn delete(&self, id: &str) -> Result<(), KanbanError>;
}

pub trait ColumnRepository: Send + Sync {
    /// Columns of a board in ascending position order.
    fn get_by_board_id(&self, board_id: &str) -> Result<Vec<Column>, KanbanError>;
    fn get_by_id(&self, id: &str) -> Result<Column, KanbanError>;
    fn create(&self, column: &Column) -> Result<(), KanbanError>;
    fn create_batch(&self, columns: &[Column]) -> Result<(), KanbanError>;
    fn update(&self, column: &Column) -> Result<(), KanbanError>;
    fn delete(&self, id: &str) -> Result<(), KanbanError>;
    /// Reassigns every card of `id` to `target_id` (positions kept) and deletes
    /// the column in the same transaction. Returns the number of cards moved.
    fn delete_moving_cards(&self, id: &str, target_id: &str) -> Result<usize, KanbanError>;
    fn count_by_board_id(&self, board_id: &str) -> Result<i64, KanbanError>;
    /// Highest position in the board, 0 when it has no columns.
    fn max_position(&self, board_id: &str) -> Result<i64, KanbanError>;
    fn update_position(&self, id: &str, position: i64) -> Result<(), KanbanError>;
}

pub trait CardRepository: Send + Sync {
    /// Cards of a column in ascending position order.
    fn get_by_column_id(&self, column_id: &str) -> Result<Vec<Card>, KanbanError>;
    fn get_by_id(&self, id: &str) -> Result<Card, KanbanError>;
    fn create(&self, card: &Card) -> Result<(), KanbanError>;
    /// Applies the patch, re-stamps `updated_at` and returns the stored card.
    fn update(
        &self,
        id: &str,
        patch: &CardPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Card, KanbanError>;
    fn delete(&self, id: &str) -> Result<(), KanbanError>;
    fn move_to(
        &self,
        id: &str,
        target_column_id: &str,
        position: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), KanbanError>;
    /// Highest position in the column, 0 when it has no cards.
    fn max_position(&self, column_id: &str) -> Result<i64, KanbanError>;
    /// Cards of the board whose title or description contains `query`, by position.
    fn search(&self, board_id: &str, query: &str) -> Result<Vec<Card>, KanbanError>;
}
