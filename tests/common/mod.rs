#![allow(dead_code)]

use kanban::app::KanbanApp;
use kanban::core::config::KanbanConfig;
use kanban::core::store::Store;
use kanban::model::Column;
use rusqlite::Connection;
use tempfile::TempDir;

/// Fresh store in a temp dir, without the sample board.
pub fn open_app() -> (TempDir, KanbanApp) {
    let tmp = TempDir::new().expect("tempdir");
    let config = KanbanConfig {
        seed_on_start: false,
        ..KanbanConfig::default()
    };
    let store = Store::open_with_config(tmp.path(), config).expect("open store");
    (tmp, KanbanApp::new(store))
}

/// Direct connection for arranging rows or faults the API cannot produce.
pub fn raw_conn(app: &KanbanApp) -> Connection {
    let conn = Connection::open(app.store().db_path()).expect("open raw connection");
    conn.execute("PRAGMA foreign_keys=ON;", []).expect("fk on");
    conn
}

pub fn columns_of(app: &KanbanApp, board_id: &str) -> Vec<Column> {
    app.get_board_with_data(board_id)
        .expect("board data")
        .columns
        .into_iter()
        .map(|c| c.column)
        .collect()
}
