//! Kanban: local-first boards, columns and cards in a single SQLite file.
//!
//! # Architecture
//!
//! - **Model** ([`model`]): entities, partial-update types and the
//!   repository traits.
//! - **Storage** ([`storage`]): SQLite repositories. Every statement runs
//!   through the store's `DbBroker`, which applies the connection pragmas and
//!   appends an audit event per operation.
//! - **Services** ([`services`]): validation and business rules (default
//!   columns, last-column protection, `max + 1000` position assignment).
//! - **App** ([`app`]): the operation contract consumed by frontends.
//! - **CLI** ([`cli`]): a clap front end over [`app::KanbanApp`].
//!
//! # Ordering
//!
//! Columns within a board and cards within a column are ordered by an integer
//! `position`. New entries are appended at the scope's maximum plus 1000, so
//! the first entry of an empty scope lands at 1000. Moves store the caller's
//! position verbatim.
//!
//! # Examples
//!
//! ```bash
//! kanban init
//! kanban board create "Release 1.0"
//! kanban card add <column-id> "Write changelog"
//! kanban board show <board-id> --format json
//! ```

pub mod app;
pub mod cli;
pub mod core;
pub mod model;
pub mod services;
pub mod storage;
