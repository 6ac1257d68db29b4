//! Intake Storage crate - SQLite persistence for chats and form submissions.
//!
//! Provides a WAL-mode SQLite database with migrations and repository
//! implementations for conversations and the interest forms captured
//! during them.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::{ChatRepository, FormRepository};
