//! CLI struct definitions and dispatch for the `kanban` binary.
//!
//! Every subcommand maps onto one [`KanbanApp`] operation.

use crate::app::KanbanApp;
use crate::core::broker;
use crate::core::config::{self, KanbanConfig};
use crate::core::error::KanbanError;
use crate::core::output::{compact_line, counted};
use crate::core::schemas;
use crate::core::store::Store;
use crate::core::time::format_timestamp;
use crate::model::{Board, BoardData, Card, CardUpdate, Column, Priority};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

const TITLE_PREVIEW_CHARS: usize = 60;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "kanban",
    version = env!("CARGO_PKG_VERSION"),
    about = "Local-first kanban boards backed by SQLite"
)]
pub struct Cli {
    /// Store directory (defaults to $KANBAN_HOME, then ./.kanban).
    #[clap(long, global = true)]
    pub root: Option<PathBuf>,
    /// Output format.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the store directory, default config and schema.
    Init,
    /// Create the sample board if the store has no boards.
    Seed,
    /// Manage boards.
    #[clap(subcommand)]
    Board(BoardCommand),
    /// Manage columns.
    #[clap(subcommand)]
    Column(ColumnCommand),
    /// Manage cards.
    #[clap(subcommand)]
    Card(CardCommand),
    /// Show the most recent storage operations.
    Audit {
        #[clap(long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// List all boards.
    List,
    /// Create a board with the default columns.
    Create {
        #[clap(value_name = "TITLE")]
        title: String,
    },
    /// Rename a board.
    Rename { id: String, title: String },
    /// Delete a board with all its columns and cards.
    Delete { id: String },
    /// Show a board with its columns and cards.
    Show { id: String },
    /// Show a board keeping only cards of one priority.
    Filter {
        id: String,
        #[clap(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnCommand {
    /// List the columns of a board.
    List { board: String },
    /// Append one or more columns to a board.
    Add {
        board: String,
        #[clap(value_name = "TITLE", required = true)]
        titles: Vec<String>,
    },
    /// Rename a column.
    Rename { id: String, title: String },
    /// Delete a column; its cards are deleted unless moved.
    Delete {
        id: String,
        #[clap(long)]
        move_cards_to: Option<String>,
    },
    /// Set a column's position.
    Move {
        id: String,
        #[clap(allow_negative_numbers = true)]
        position: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    /// Show one card.
    Show { id: String },
    /// Append a card to a column.
    Add { column: String, title: String },
    /// Update selected fields of a card. `--due ""` clears the due date.
    Update {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[clap(long)]
        due: Option<String>,
    },
    /// Delete a card.
    Delete { id: String },
    /// Move a card to a column and position.
    Move {
        id: String,
        column: String,
        #[clap(allow_negative_numbers = true)]
        position: i64,
    },
    /// Find cards of a board by title or description substring.
    Search { board: String, query: String },
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse().map_err(|e: KanbanError| e.to_string())
}

pub fn run(cli: Cli) -> Result<(), KanbanError> {
    let root = config::resolve_root(cli.root.as_deref());
    let format = cli.format;

    match cli.command {
        Command::Init => init(&root, format),
        Command::Audit { limit } => {
            let events = broker::read_audit_tail(&root.join(schemas::AUDIT_LOG_NAME), limit)?;
            emit(format, &events, || {
                for ev in &events {
                    println!("{} {:<24} {} {}", ev.ts, ev.op, status_label(&ev.status), ev.event_id);
                }
            })
        }
        Command::Seed => {
            let app = KanbanApp::new(Store::open(&root)?);
            let seeded = app.seed_if_empty()?;
            emit(format, &seeded, || match &seeded {
                Some(board) => println!("Seeded sample board {}", board_line(board)),
                None => println!("Store already has boards; nothing seeded."),
            })
        }
        Command::Board(cmd) => run_board(&KanbanApp::open(&root)?, cmd, format),
        Command::Column(cmd) => run_column(&KanbanApp::open(&root)?, cmd, format),
        Command::Card(cmd) => run_card(&KanbanApp::open(&root)?, cmd, format),
    }
}

fn init(root: &Path, format: OutputFormat) -> Result<(), KanbanError> {
    std::fs::create_dir_all(root)?;
    let config = KanbanConfig::load(root)?;
    let wrote = config.write_default_if_missing(root)?;
    let store = Store::open_with_config(root, config)?;
    let out = serde_json::json!({
        "root": store.root.to_string_lossy(),
        "database": store.db_path().to_string_lossy(),
        "config_written": wrote,
    });
    emit(format, &out, || {
        println!("Initialized kanban store at {}", store.root.display());
    })
}

fn run_board(app: &KanbanApp, cmd: BoardCommand, format: OutputFormat) -> Result<(), KanbanError> {
    match cmd {
        BoardCommand::List => {
            let boards = app.get_all_boards()?;
            emit(format, &boards, || {
                if boards.is_empty() {
                    println!("No boards found.");
                }
                for b in &boards {
                    println!("- {}", board_line(b));
                }
            })
        }
        BoardCommand::Create { title } => {
            let board = app.create_board(&title)?;
            emit(format, &board, || println!("Created board {}", board_line(&board)))
        }
        BoardCommand::Rename { id, title } => {
            let board = app.update_board(&id, &title)?;
            emit(format, &board, || println!("Renamed board {}", board_line(&board)))
        }
        BoardCommand::Delete { id } => {
            app.delete_board(&id)?;
            emit_deleted(format, "board", &id)
        }
        BoardCommand::Show { id } => {
            let data = app.get_board_with_data(&id)?;
            emit(format, &data, || print_board(&data))
        }
        BoardCommand::Filter { id, priority } => {
            let data = app.filter_cards(&id, priority)?;
            emit(format, &data, || print_board(&data))
        }
    }
}

fn run_column(app: &KanbanApp, cmd: ColumnCommand, format: OutputFormat) -> Result<(), KanbanError> {
    match cmd {
        ColumnCommand::List { board } => {
            let cols = app.list_columns(&board)?;
            emit(format, &cols, || {
                for c in &cols {
                    println!("- {}", column_line(c));
                }
            })
        }
        ColumnCommand::Add { board, titles } => {
            let cols = match titles.as_slice() {
                [title] => vec![app.create_column(&board, title)?],
                _ => {
                    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                    app.create_columns(&board, &refs)?
                }
            };
            emit(format, &cols, || {
                for c in &cols {
                    println!("Created column {}", column_line(c));
                }
            })
        }
        ColumnCommand::Rename { id, title } => {
            let col = app.update_column(&id, &title)?;
            emit(format, &col, || println!("Renamed column {}", column_line(&col)))
        }
        ColumnCommand::Delete { id, move_cards_to } => {
            app.delete_column(&id, move_cards_to.as_deref())?;
            emit_deleted(format, "column", &id)
        }
        ColumnCommand::Move { id, position } => {
            app.move_column(&id, position)?;
            let out = serde_json::json!({ "id": id, "position": position });
            emit(format, &out, || println!("Moved column {} to position {}", id, position))
        }
    }
}

fn run_card(app: &KanbanApp, cmd: CardCommand, format: OutputFormat) -> Result<(), KanbanError> {
    match cmd {
        CardCommand::Show { id } => {
            let card = app.get_card(&id)?;
            emit(format, &card, || print_card_detail(&card))
        }
        CardCommand::Add { column, title } => {
            let card = app.create_card(&column, &title)?;
            emit(format, &card, || println!("Created card {}", card_line(&card)))
        }
        CardCommand::Update {
            id,
            title,
            description,
            priority,
            due,
        } => {
            let updates = CardUpdate {
                title,
                description,
                priority,
                due_date: due,
            };
            let card = app.update_card(&id, updates)?;
            emit(format, &card, || println!("Updated card {}", card_line(&card)))
        }
        CardCommand::Delete { id } => {
            app.delete_card(&id)?;
            emit_deleted(format, "card", &id)
        }
        CardCommand::Move {
            id,
            column,
            position,
        } => {
            app.move_card(&id, &column, position)?;
            let out = serde_json::json!({ "id": id, "column_id": column, "position": position });
            emit(format, &out, || {
                println!("Moved card {} to column {} at position {}", id, column, position)
            })
        }
        CardCommand::Search { board, query } => {
            let cards = app.search_cards(&board, &query)?;
            emit(format, &cards, || {
                println!("{} matching '{}'", counted(cards.len(), "card"), query);
                for c in &cards {
                    println!("- {}", card_line(c));
                }
            })
        }
    }
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce()) -> Result<(), KanbanError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn emit_deleted(format: OutputFormat, kind: &str, id: &str) -> Result<(), KanbanError> {
    let out = serde_json::json!({ "deleted": kind, "id": id });
    emit(format, &out, || println!("Deleted {} {}", kind, id))
}

fn status_label(status: &str) -> String {
    match status {
        "success" => status.green().to_string(),
        _ => status.red().to_string(),
    }
}

fn priority_label(priority: Priority) -> String {
    let label = format!("{:<6}", priority.as_str());
    match priority {
        Priority::High => label.red().bold().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.dimmed().to_string(),
    }
}

fn board_line(board: &Board) -> String {
    format!(
        "{} {}",
        board.id.dimmed(),
        compact_line(&board.title, TITLE_PREVIEW_CHARS).bold()
    )
}

fn column_line(col: &Column) -> String {
    format!(
        "{} [{}] {}",
        col.id.dimmed(),
        col.position,
        compact_line(&col.title, TITLE_PREVIEW_CHARS)
    )
}

fn card_line(card: &Card) -> String {
    let due = card
        .due_date
        .as_ref()
        .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!(
        "{} [{}|{}] {}{}",
        card.id.dimmed(),
        priority_label(card.priority),
        card.position,
        compact_line(&card.title, TITLE_PREVIEW_CHARS),
        due
    )
}

fn print_board(data: &BoardData) {
    println!("{}", board_line(&data.board));
    for cwc in &data.columns {
        println!(
            "  {} ({})",
            column_line(&cwc.column),
            counted(cwc.cards.len(), "card")
        );
        for card in &cwc.cards {
            println!("    - {}", card_line(card));
        }
    }
}

fn print_card_detail(card: &Card) {
    println!("{}", card_line(card));
    println!("  column:  {}", card.column_id);
    if let Some(desc) = &card.description {
        println!("  details: {}", compact_line(desc, 200));
    }
    println!("  created: {}", format_timestamp(&card.created_at));
    println!("  updated: {}", format_timestamp(&card.updated_at));
}
