use crate::core::broker::DbBroker;
use crate::core::error::{KanbanError, StorageContext};
use crate::core::store::Store;
use crate::core::time::format_timestamp;
use crate::model::{Card, CardPatch, CardRepository};
use crate::storage::{ensure_affected, optional_timestamp_at, timestamp_at};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

const CARD_COLUMNS: &str = "c.id, c.column_id, c.title, c.description, c.priority, \
                            c.due_date, c.position, c.created_at, c.updated_at";

#[derive(Debug, Clone)]
pub struct SqliteCardRepo {
    broker: DbBroker,
}

impl SqliteCardRepo {
    pub fn new(store: &Store) -> Self {
        Self {
            broker: store.broker().clone(),
        }
    }
}

fn scan_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        column_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: row.get(4)?,
        due_date: optional_timestamp_at(row, 5)?,
        position: row.get(6)?,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

fn select_card(conn: &Connection, id: &str) -> Result<Option<Card>, KanbanError> {
    conn.query_row(
        &format!("SELECT {} FROM cards c WHERE c.id = ?1", CARD_COLUMNS),
        params![id],
        scan_card,
    )
    .optional()
    .context("query card")
}

fn query_cards(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
    context: &str,
) -> Result<Vec<Card>, KanbanError> {
    let mut stmt = conn.prepare(sql).context(context)?;
    let rows = stmt.query_map(args, scan_card).context(context)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r.context("scan card")?);
    }
    Ok(out)
}

pub(crate) fn insert_card(conn: &Connection, card: &Card) -> Result<(), KanbanError> {
    conn.execute(
        "INSERT INTO cards (id, column_id, title, description, priority, due_date, position, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            card.id,
            card.column_id,
            card.title,
            card.description,
            card.priority,
            card.due_date.as_ref().map(format_timestamp),
            card.position,
            format_timestamp(&card.created_at),
            format_timestamp(&card.updated_at)
        ],
    )
    .context("insert card")?;
    Ok(())
}

impl CardRepository for SqliteCardRepo {
    fn get_by_column_id(&self, column_id: &str) -> Result<Vec<Card>, KanbanError> {
        self.broker.with_conn("card.list", |conn| {
            query_cards(
                conn,
                &format!(
                    "SELECT {} FROM cards c WHERE c.column_id = ?1 ORDER BY c.position ASC, c.id ASC",
                    CARD_COLUMNS
                ),
                &[&column_id],
                "query cards",
            )
        })
    }

    fn get_by_id(&self, id: &str) -> Result<Card, KanbanError> {
        self.broker.with_conn("card.get", |conn| {
            select_card(conn, id)?.ok_or_else(|| KanbanError::NotFound(format!("card {}", id)))
        })
    }

    fn create(&self, card: &Card) -> Result<(), KanbanError> {
        self.broker
            .with_conn("card.create", |conn| insert_card(conn, card))
    }

    fn update(
        &self,
        id: &str,
        patch: &CardPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Card, KanbanError> {
        let mut sets = vec!["updated_at = ?"];
        let mut args = vec![Value::Text(format_timestamp(&updated_at))];

        if let Some(title) = &patch.title {
            sets.push("title = ?");
            args.push(Value::Text(title.clone()));
        }
        if let Some(description) = &patch.description {
            sets.push("description = ?");
            args.push(Value::Text(description.clone()));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?");
            args.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(due) = &patch.due_date {
            sets.push("due_date = ?");
            args.push(match due {
                Some(ts) => Value::Text(format_timestamp(ts)),
                None => Value::Null,
            });
        }
        args.push(Value::Text(id.to_string()));
        let sql = format!("UPDATE cards SET {} WHERE id = ?", sets.join(", "));

        self.broker.with_conn("card.update", |conn| {
            let n = conn
                .execute(&sql, params_from_iter(args.iter()))
                .context("update card")?;
            ensure_affected(n, "card", id)?;
            select_card(conn, id)?.ok_or_else(|| KanbanError::NotFound(format!("card {}", id)))
        })
    }

    fn delete(&self, id: &str) -> Result<(), KanbanError> {
        self.broker.with_conn("card.delete", |conn| {
            let n = conn
                .execute("DELETE FROM cards WHERE id = ?1", params![id])
                .context("delete card")?;
            ensure_affected(n, "card", id)
        })
    }

    fn move_to(
        &self,
        id: &str,
        target_column_id: &str,
        position: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), KanbanError> {
        self.broker.with_conn("card.move", |conn| {
            let n = conn
                .execute(
                    "UPDATE cards SET column_id = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
                    params![target_column_id, position, format_timestamp(&updated_at), id],
                )
                .context("move card")?;
            ensure_affected(n, "card", id)
        })
    }

    fn max_position(&self, column_id: &str) -> Result<i64, KanbanError> {
        self.broker.with_conn("card.max_position", |conn| {
            let max: Option<i64> = conn
                .query_row(
                    "SELECT MAX(position) FROM cards WHERE column_id = ?1",
                    params![column_id],
                    |row| row.get(0),
                )
                .context("max position")?;
            Ok(max.unwrap_or(0))
        })
    }

    fn search(&self, board_id: &str, query: &str) -> Result<Vec<Card>, KanbanError> {
        // instr() is a literal, case-sensitive substring test; LIKE would fold ASCII case.
        self.broker.with_conn("card.search", |conn| {
            query_cards(
                conn,
                &format!(
                    "SELECT {} FROM cards c
                     JOIN columns col ON c.column_id = col.id
                     WHERE col.board_id = ?1
                       AND (instr(c.title, ?2) > 0 OR instr(COALESCE(c.description, ''), ?2) > 0)
                     ORDER BY c.position ASC, c.id ASC",
                    CARD_COLUMNS
                ),
                &[&board_id, &query],
                "search cards",
            )
        })
    }
}
