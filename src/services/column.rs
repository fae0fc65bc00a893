use crate::core::error::KanbanError;
use crate::core::time;
use crate::model::{
    BoardRepository, Column, ColumnRepository, next_position, nth_position_after,
};
use crate::services::require_title;
use std::sync::Arc;

pub struct ColumnService {
    boards: Arc<dyn BoardRepository>,
    columns: Arc<dyn ColumnRepository>,
}

impl ColumnService {
    pub fn new(boards: Arc<dyn BoardRepository>, columns: Arc<dyn ColumnRepository>) -> Self {
        Self { boards, columns }
    }

    pub fn list(&self, board_id: &str) -> Result<Vec<Column>, KanbanError> {
        self.boards.get_by_id(board_id)?;
        self.columns.get_by_board_id(board_id)
    }

    /// Appends a column after the board's current last column.
    pub fn create(&self, board_id: &str, title: &str) -> Result<Column, KanbanError> {
        require_title("column", title)?;
        self.boards.get_by_id(board_id)?;

        let col = Column {
            id: time::new_id(),
            board_id: board_id.to_string(),
            title: title.to_string(),
            position: next_position(self.columns.max_position(board_id)?)?,
            created_at: time::now_utc(),
        };
        self.columns.create(&col)?;
        tracing::info!(column_id = %col.id, board_id, "column created");
        Ok(col)
    }

    /// Appends several columns in one transaction; either all land or none do.
    pub fn create_batch(&self, board_id: &str, titles: &[&str]) -> Result<Vec<Column>, KanbanError> {
        for title in titles {
            require_title("column", title)?;
        }
        self.boards.get_by_id(board_id)?;

        let start = self.columns.max_position(board_id)?;
        let now = time::now_utc();
        let cols = titles
            .iter()
            .zip(1..)
            .map(|(title, n)| -> Result<Column, KanbanError> {
                Ok(Column {
                    id: time::new_id(),
                    board_id: board_id.to_string(),
                    title: title.to_string(),
                    position: nth_position_after(start, n)?,
                    created_at: now,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.columns.create_batch(&cols)?;
        tracing::info!(board_id, count = cols.len(), "columns created");
        Ok(cols)
    }

    pub fn update(&self, id: &str, title: &str) -> Result<Column, KanbanError> {
        require_title("column", title)?;

        let mut col = self.columns.get_by_id(id)?;
        col.title = title.to_string();
        self.columns.update(&col)?;
        tracing::info!(column_id = %id, "column renamed");
        Ok(col)
    }

    /// Deletes a column. With `move_cards_to`, its cards are reassigned to
    /// that column (positions unchanged); otherwise they are removed with it.
    /// A board's only column can never be deleted.
    pub fn delete(&self, id: &str, move_cards_to: Option<&str>) -> Result<(), KanbanError> {
        let col = self.columns.get_by_id(id)?;
        if self.columns.count_by_board_id(&col.board_id)? <= 1 {
            return Err(KanbanError::LastColumn);
        }

        if let Some(target_id) = move_cards_to.filter(|t| !t.is_empty()) {
            if target_id == id {
                return Err(KanbanError::ValidationError(
                    "cannot move cards into the column being deleted".to_string(),
                ));
            }
            let target = self.columns.get_by_id(target_id)?;
            if target.board_id != col.board_id {
                return Err(KanbanError::ValidationError(format!(
                    "column {} belongs to a different board",
                    target_id
                )));
            }
            let moved = self.columns.delete_moving_cards(id, target_id)?;
            tracing::info!(column_id = %id, to = %target_id, moved, "column deleted, cards moved");
            return Ok(());
        }

        self.columns.delete(id)?;
        tracing::info!(column_id = %id, "column deleted");
        Ok(())
    }

    /// Stores `new_position` as given; no collision checks or renumbering.
    pub fn move_to(&self, id: &str, new_position: i64) -> Result<(), KanbanError> {
        self.columns.update_position(id, new_position)?;
        tracing::info!(column_id = %id, position = new_position, "column moved");
        Ok(())
    }
}
