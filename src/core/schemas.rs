//! Centralized database schema definitions for the kanban store.
//!
//! A single SQLite database holds three tables. Children reference their
//! parent with `ON DELETE CASCADE`, so removing a board removes its columns,
//! and removing a column removes its cards.

pub const KANBAN_DB_NAME: &str = "kanban.db";
pub const AUDIT_LOG_NAME: &str = "broker.events.jsonl";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Bumped whenever a statement below changes shape. Stored in `PRAGMA user_version`.
pub const KANBAN_SCHEMA_VERSION: u32 = 1;

pub const KANBAN_DB_SCHEMA_BOARDS: &str = "
    CREATE TABLE IF NOT EXISTS boards (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
";

pub const KANBAN_DB_SCHEMA_COLUMNS: &str = "
    CREATE TABLE IF NOT EXISTS columns (
        id TEXT PRIMARY KEY,
        board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
";

pub const KANBAN_DB_SCHEMA_CARDS: &str = "
    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        column_id TEXT NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        priority TEXT CHECK(priority IN ('low', 'medium', 'high')) DEFAULT 'medium',
        due_date TEXT,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
";

pub const KANBAN_DB_SCHEMA_INDEX_COLUMNS: &str =
    "CREATE INDEX IF NOT EXISTS idx_columns_board_id ON columns(board_id)";
pub const KANBAN_DB_SCHEMA_INDEX_CARDS: &str =
    "CREATE INDEX IF NOT EXISTS idx_cards_column_id ON cards(column_id)";

/// Statements in the order they must be applied.
pub const KANBAN_DB_SCHEMA: &[&str] = &[
    KANBAN_DB_SCHEMA_BOARDS,
    KANBAN_DB_SCHEMA_COLUMNS,
    KANBAN_DB_SCHEMA_CARDS,
    KANBAN_DB_SCHEMA_INDEX_COLUMNS,
    KANBAN_DB_SCHEMA_INDEX_CARDS,
];
