//! Core modules shared by every part of the kanban store.
//!
//! Storage access, configuration, timestamps and errors live here; nothing in
//! this module knows about boards, columns or cards.

pub mod broker;
pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod schemas;
pub mod store;
pub mod time;
