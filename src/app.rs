//! The operation surface a frontend consumes: one method per exposed
//! operation, each returning the affected entity or collection, or a typed
//! [`KanbanError`].

use crate::core::error::KanbanError;
use crate::core::store::Store;
use crate::model::{Board, BoardData, Card, CardUpdate, Column, Priority};
use crate::services::{BoardService, CardService, ColumnService};
use crate::storage::{SqliteBoardRepo, SqliteCardRepo, SqliteColumnRepo};
use std::path::Path;
use std::sync::Arc;

pub struct KanbanApp {
    store: Store,
    boards: BoardService,
    columns: ColumnService,
    cards: CardService,
}

impl KanbanApp {
    /// Wires the SQLite repositories of `store` into the services.
    pub fn new(store: Store) -> Self {
        let board_repo = Arc::new(SqliteBoardRepo::new(&store));
        let column_repo = Arc::new(SqliteColumnRepo::new(&store));
        let card_repo = Arc::new(SqliteCardRepo::new(&store));

        Self {
            boards: BoardService::new(board_repo.clone(), column_repo.clone(), card_repo.clone()),
            columns: ColumnService::new(board_repo, column_repo.clone()),
            cards: CardService::new(card_repo, column_repo),
            store,
        }
    }

    /// Opens the store at `root` and seeds it when the config asks for it.
    /// A failed seed is logged and does not prevent startup.
    pub fn open(root: &Path) -> Result<Self, KanbanError> {
        let app = Self::new(Store::open(root)?);
        if app.store.config.seed_on_start {
            if let Err(err) = app.seed_if_empty() {
                tracing::warn!(error = %err, "seed failed");
            }
        }
        Ok(app)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn seed_if_empty(&self) -> Result<Option<Board>, KanbanError> {
        self.boards.seed_if_empty()
    }

    // Boards

    pub fn get_all_boards(&self) -> Result<Vec<Board>, KanbanError> {
        self.boards.get_all()
    }

    pub fn create_board(&self, title: &str) -> Result<Board, KanbanError> {
        self.boards.create(title)
    }

    pub fn update_board(&self, id: &str, title: &str) -> Result<Board, KanbanError> {
        self.boards.update(id, title)
    }

    pub fn delete_board(&self, id: &str) -> Result<(), KanbanError> {
        self.boards.delete(id)
    }

    pub fn get_board_with_data(&self, board_id: &str) -> Result<BoardData, KanbanError> {
        self.boards.get_with_data(board_id)
    }

    // Columns

    pub fn list_columns(&self, board_id: &str) -> Result<Vec<Column>, KanbanError> {
        self.columns.list(board_id)
    }

    pub fn create_column(&self, board_id: &str, title: &str) -> Result<Column, KanbanError> {
        self.columns.create(board_id, title)
    }

    pub fn create_columns(&self, board_id: &str, titles: &[&str]) -> Result<Vec<Column>, KanbanError> {
        self.columns.create_batch(board_id, titles)
    }

    pub fn update_column(&self, id: &str, title: &str) -> Result<Column, KanbanError> {
        self.columns.update(id, title)
    }

    pub fn delete_column(&self, id: &str, move_cards_to: Option<&str>) -> Result<(), KanbanError> {
        self.columns.delete(id, move_cards_to)
    }

    pub fn move_column(&self, id: &str, new_position: i64) -> Result<(), KanbanError> {
        self.columns.move_to(id, new_position)
    }

    // Cards

    pub fn get_card(&self, id: &str) -> Result<Card, KanbanError> {
        self.cards.get(id)
    }

    pub fn create_card(&self, column_id: &str, title: &str) -> Result<Card, KanbanError> {
        self.cards.create(column_id, title)
    }

    pub fn update_card(&self, id: &str, updates: CardUpdate) -> Result<Card, KanbanError> {
        self.cards.update(id, updates)
    }

    pub fn delete_card(&self, id: &str) -> Result<(), KanbanError> {
        self.cards.delete(id)
    }

    pub fn move_card(
        &self,
        id: &str,
        target_column_id: &str,
        new_position: i64,
    ) -> Result<(), KanbanError> {
        self.cards.move_to(id, target_column_id, new_position)
    }

    pub fn search_cards(&self, board_id: &str, query: &str) -> Result<Vec<Card>, KanbanError> {
        self.cards.search(board_id, query)
    }

    /// `priority` of `None` returns the board unfiltered.
    pub fn filter_cards(
        &self,
        board_id: &str,
        priority: Option<Priority>,
    ) -> Result<BoardData, KanbanError> {
        self.boards.filter_cards(board_id, priority)
    }
}
