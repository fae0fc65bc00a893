use crate::core::broker::DbBroker;
use crate::core::error::{KanbanError, StorageContext};
use crate::core::store::Store;
use crate::core::time::format_timestamp;
use crate::model::{Board, BoardRepository, Card, Column};
use crate::storage::{card_repo, column_repo, ensure_affected, timestamp_at, with_index};
use rusqlite::{Connection, OptionalExtension, Row, params};

const BOARD_COLUMNS: &str = "id, title, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqliteBoardRepo {
    broker: DbBroker,
}

impl SqliteBoardRepo {
    pub fn new(store: &Store) -> Self {
        Self {
            broker: store.broker().clone(),
        }
    }
}

fn scan_board(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: timestamp_at(row, 2)?,
        updated_at: timestamp_at(row, 3)?,
    })
}

fn insert_board(conn: &Connection, board: &Board) -> Result<(), KanbanError> {
    conn.execute(
        "INSERT INTO boards (id, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            board.id,
            board.title,
            format_timestamp(&board.created_at),
            format_timestamp(&board.updated_at)
        ],
    )
    .context("insert board")?;
    Ok(())
}

impl BoardRepository for SqliteBoardRepo {
    fn get_all(&self) -> Result<Vec<Board>, KanbanError> {
        self.broker.with_conn("board.list", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM boards ORDER BY created_at ASC, id ASC",
                    BOARD_COLUMNS
                ))
                .context("query boards")?;
            let rows = stmt.query_map([], scan_board).context("query boards")?;
            let mut out = Vec::new();
            for r in rows {
                out.push(r.context("scan board")?);
            }
            Ok(out)
        })
    }

    fn get_by_id(&self, id: &str) -> Result<Board, KanbanError> {
        self.broker.with_conn("board.get", |conn| {
            conn.query_row(
                &format!("SELECT {} FROM boards WHERE id = ?1", BOARD_COLUMNS),
                params![id],
                scan_board,
            )
            .optional()
            .context("query board")?
            .ok_or_else(|| KanbanError::NotFound(format!("board {}", id)))
        })
    }

    fn create_with_columns(
        &self,
        board: &Board,
        columns: &[Column],
        cards: &[Card],
    ) -> Result<(), KanbanError> {
        self.broker.with_tx("board.create", |conn| {
            insert_board(conn, board)?;
            for (i, col) in columns.iter().enumerate() {
                column_repo::insert_column(conn, col)
                    .map_err(|e| with_index(e, "insert default column", i))?;
            }
            for (i, card) in cards.iter().enumerate() {
                card_repo::insert_card(conn, card)
                    .map_err(|e| with_index(e, "insert initial card", i))?;
            }
            Ok(())
        })
    }

    fn update(&self, board: &Board) -> Result<(), KanbanError> {
        self.broker.with_conn("board.update", |conn| {
            let n = conn
                .execute(
                    "UPDATE boards SET title = ?1, updated_at = ?2 WHERE id = ?3",
                    params![board.title, format_timestamp(&board.updated_at), board.id],
                )
                .context("update board")?;
            ensure_affected(n, "board", &board.id)
        })
    }

    fn delete(&self, id: &str) -> Result<(), KanbanError> {
        self.broker.with_conn("board.delete", |conn| {
            let n = conn
                .execute("DELETE FROM boards WHERE id = ?1", params![id])
                .context("delete board")?;
            ensure_affected(n, "board", id)
        })
    }
}
