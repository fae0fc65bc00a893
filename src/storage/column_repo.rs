use crate::core::broker::DbBroker;
use crate::core::error::{KanbanError, StorageContext};
use crate::core::store::Store;
use crate::core::time::format_timestamp;
use crate::model::{Column, ColumnRepository};
use crate::storage::{ensure_affected, timestamp_at, with_index};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMN_COLUMNS: &str = "id, board_id, title, position, created_at";

#[derive(Debug, Clone)]
pub struct SqliteColumnRepo {
    broker: DbBroker,
}

impl SqliteColumnRepo {
    pub fn new(store: &Store) -> Self {
        Self {
            broker: store.broker().clone(),
        }
    }
}

fn scan_column(row: &Row<'_>) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        position: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    })
}

pub(crate) fn insert_column(conn: &Connection, col: &Column) -> Result<(), KanbanError> {
    conn.execute(
        "INSERT INTO columns (id, board_id, title, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            col.id,
            col.board_id,
            col.title,
            col.position,
            format_timestamp(&col.created_at)
        ],
    )
    .context("insert column")?;
    Ok(())
}

impl ColumnRepository for SqliteColumnRepo {
    fn get_by_board_id(&self, board_id: &str) -> Result<Vec<Column>, KanbanError> {
        self.broker.with_conn("column.list", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM columns WHERE board_id = ?1 ORDER BY position ASC, id ASC",
                    COLUMN_COLUMNS
                ))
                .context("query columns")?;
            let rows = stmt
                .query_map(params![board_id], scan_column)
                .context("query columns")?;
            let mut out = Vec::new();
            for r in rows {
                out.push(r.context("scan column")?);
            }
            Ok(out)
        })
    }

    fn get_by_id(&self, id: &str) -> Result<Column, KanbanError> {
        self.broker.with_conn("column.get", |conn| {
            conn.query_row(
                &format!("SELECT {} FROM columns WHERE id = ?1", COLUMN_COLUMNS),
                params![id],
                scan_column,
            )
            .optional()
            .context("query column")?
            .ok_or_else(|| KanbanError::NotFound(format!("column {}", id)))
        })
    }

    fn create(&self, column: &Column) -> Result<(), KanbanError> {
        self.broker
            .with_conn("column.create", |conn| insert_column(conn, column))
    }

    fn create_batch(&self, columns: &[Column]) -> Result<(), KanbanError> {
        self.broker.with_tx("column.create_batch", |conn| {
            for (i, col) in columns.iter().enumerate() {
                insert_column(conn, col).map_err(|e| with_index(e, "insert column", i))?;
            }
            Ok(())
        })
    }

    fn update(&self, column: &Column) -> Result<(), KanbanError> {
        self.broker.with_conn("column.update", |conn| {
            let n = conn
                .execute(
                    "UPDATE columns SET title = ?1 WHERE id = ?2",
                    params![column.title, column.id],
                )
                .context("update column")?;
            ensure_affected(n, "column", &column.id)
        })
    }

    fn delete(&self, id: &str) -> Result<(), KanbanError> {
        self.broker.with_conn("column.delete", |conn| {
            let n = conn
                .execute("DELETE FROM columns WHERE id = ?1", params![id])
                .context("delete column")?;
            ensure_affected(n, "column", id)
        })
    }

    fn delete_moving_cards(&self, id: &str, target_id: &str) -> Result<usize, KanbanError> {
        self.broker.with_tx("column.delete_moving_cards", |conn| {
            let moved = conn
                .execute(
                    "UPDATE cards SET column_id = ?1 WHERE column_id = ?2",
                    params![target_id, id],
                )
                .context("move cards between columns")?;
            let n = conn
                .execute("DELETE FROM columns WHERE id = ?1", params![id])
                .context("delete column")?;
            ensure_affected(n, "column", id)?;
            Ok(moved)
        })
    }

    fn count_by_board_id(&self, board_id: &str) -> Result<i64, KanbanError> {
        self.broker.with_conn("column.count", |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM columns WHERE board_id = ?1",
                params![board_id],
                |row| row.get(0),
            )
            .context("count columns")
        })
    }

    fn max_position(&self, board_id: &str) -> Result<i64, KanbanError> {
        self.broker.with_conn("column.max_position", |conn| {
            let max: Option<i64> = conn
                .query_row(
                    "SELECT MAX(position) FROM columns WHERE board_id = ?1",
                    params![board_id],
                    |row| row.get(0),
                )
                .context("max position")?;
            Ok(max.unwrap_or(0))
        })
    }

    fn update_position(&self, id: &str, position: i64) -> Result<(), KanbanError> {
        self.broker.with_conn("column.move", |conn| {
            let n = conn
                .execute(
                    "UPDATE columns SET position = ?1 WHERE id = ?2",
                    params![position, id],
                )
                .context("update position")?;
            ensure_affected(n, "column", id)
        })
    }
}
