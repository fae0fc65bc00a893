use crate::core::error::KanbanError;
use crate::core::time;
use crate::model::{
    Board, BoardData, BoardRepository, Card, CardRepository, Column, ColumnRepository,
    ColumnWithCards, POSITION_GAP, Priority,
};
use crate::services::require_title;
use std::sync::Arc;

/// Titles of the columns every new board starts with, in position order.
pub const DEFAULT_COLUMN_TITLES: [&str; 3] = ["To Do", "In Progress", "Done"];

pub const SAMPLE_BOARD_TITLE: &str = "My Board";

pub struct BoardService {
    boards: Arc<dyn BoardRepository>,
    columns: Arc<dyn ColumnRepository>,
    cards: Arc<dyn CardRepository>,
}

impl BoardService {
    pub fn new(
        boards: Arc<dyn BoardRepository>,
        columns: Arc<dyn ColumnRepository>,
        cards: Arc<dyn CardRepository>,
    ) -> Self {
        Self {
            boards,
            columns,
            cards,
        }
    }

    pub fn get_all(&self) -> Result<Vec<Board>, KanbanError> {
        self.boards.get_all()
    }

    /// Creates a board together with its three default columns in one transaction.
    pub fn create(&self, title: &str) -> Result<Board, KanbanError> {
        require_title("board", title)?;

        let (board, defaults) = new_board(title);
        self.boards.create_with_columns(&board, &defaults, &[])?;
        tracing::info!(board_id = %board.id, "board created");
        Ok(board)
    }

    pub fn update(&self, id: &str, title: &str) -> Result<Board, KanbanError> {
        require_title("board", title)?;

        let mut board = self.boards.get_by_id(id)?;
        board.title = title.to_string();
        board.updated_at = time::now_utc();
        self.boards.update(&board)?;
        tracing::info!(board_id = %id, "board renamed");
        Ok(board)
    }

    /// Columns and cards go with the board through the foreign-key cascade.
    pub fn delete(&self, id: &str) -> Result<(), KanbanError> {
        self.boards.delete(id)?;
        tracing::info!(board_id = %id, "board deleted");
        Ok(())
    }

    pub fn get_with_data(&self, board_id: &str) -> Result<BoardData, KanbanError> {
        self.load(board_id, None)
    }

    /// Same shape as [`BoardService::get_with_data`], keeping only cards with
    /// `priority`. Columns without matches stay in the result with no cards.
    pub fn filter_cards(
        &self,
        board_id: &str,
        priority: Option<Priority>,
    ) -> Result<BoardData, KanbanError> {
        self.load(board_id, priority)
    }

    fn load(&self, board_id: &str, priority: Option<Priority>) -> Result<BoardData, KanbanError> {
        let board = self.boards.get_by_id(board_id)?;
        let cols = self.columns.get_by_board_id(board_id)?;

        let mut columns = Vec::with_capacity(cols.len());
        for column in cols {
            let mut cards = self.cards.get_by_column_id(&column.id)?;
            if let Some(p) = priority {
                cards.retain(|c| c.priority == p);
            }
            columns.push(ColumnWithCards { column, cards });
        }
        tracing::debug!(board_id, columns = columns.len(), "board loaded");
        Ok(BoardData { board, columns })
    }

    /// Creates the sample board when the store has no boards at all.
    /// Returns the new board, or `None` when nothing had to be done.
    ///
    /// The board, its columns and the sample cards are written together, so a
    /// failed seed leaves the store empty and the next call tries again.
    pub fn seed_if_empty(&self) -> Result<Option<Board>, KanbanError> {
        if !self.boards.get_all()?.is_empty() {
            return Ok(None);
        }

        let (board, columns) = new_board(SAMPLE_BOARD_TITLE);
        let (todo, doing) = (columns[0].id.as_str(), columns[1].id.as_str());
        let now = board.created_at;
        let sample = |column_id: &str,
                      title: &str,
                      description: Option<&str>,
                      priority: Priority,
                      position: i64| Card {
            id: time::new_id(),
            column_id: column_id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            priority,
            due_date: None,
            position,
            created_at: now,
            updated_at: now,
        };
        let cards = [
            sample(
                todo,
                "Welcome to your board!",
                Some("This is a sample card. Drag it to another column."),
                Priority::Medium,
                POSITION_GAP,
            ),
            sample(todo, "Try creating a new card", None, Priority::Low, 2 * POSITION_GAP),
            sample(doing, "Explore board features", None, Priority::High, POSITION_GAP),
        ];

        self.boards.create_with_columns(&board, &columns, &cards)?;
        tracing::info!(board_id = %board.id, cards = cards.len(), "seeded sample board");
        Ok(Some(board))
    }
}

/// A fresh board and its default columns at 1000, 2000 and 3000.
fn new_board(title: &str) -> (Board, [Column; 3]) {
    let now = time::now_utc();
    let board = Board {
        id: time::new_id(),
        title: title.to_string(),
        created_at: now,
        updated_at: now,
    };
    let column = |title: &str, slot: i64| Column {
        id: time::new_id(),
        board_id: board.id.clone(),
        title: title.to_string(),
        position: slot * POSITION_GAP,
        created_at: now,
    };
    let [todo, doing, done] = DEFAULT_COLUMN_TITLES;
    let columns = [column(todo, 1), column(doing, 2), column(done, 3)];
    (board, columns)
}
