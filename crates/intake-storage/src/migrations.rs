//! Database schema migrations.
//!
//! Applies the initial schema including the chats, form_submissions, and
//! schema_migrations tables.

use rusqlite::Connection;
use tracing::info;

use intake_core::error::IntakeError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental changes.
pub fn run_migrations(conn: &Connection) -> Result<(), IntakeError> {
    // Create the migrations tracking table first.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| IntakeError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| IntakeError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<(), IntakeError> {
    conn.execute_batch(
        "
        -- Conversations. The full message log is stored as a JSON array so
        -- a chat is always read and written as one unit.
        CREATE TABLE IF NOT EXISTS chats (
            id          TEXT PRIMARY KEY NOT NULL,
            messages    TEXT NOT NULL DEFAULT '[]',
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chats_created_at
            ON chats (created_at DESC);

        -- Interest forms captured during conversations. status is NULL until
        -- the model assigns one of the three workflow states. chat_id is an
        -- informational reference; the owning chat is not required to exist.
        CREATE TABLE IF NOT EXISTS form_submissions (
            id            TEXT PRIMARY KEY NOT NULL,
            chat_id       TEXT NOT NULL,
            name          TEXT NOT NULL DEFAULT '',
            email         TEXT NOT NULL DEFAULT '',
            phone_number  TEXT NOT NULL DEFAULT '',
            status        INTEGER
                          CHECK (status IN (1, 2, 3)),
            created_at    INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_form_submissions_chat
            ON form_submissions (chat_id, created_at ASC);

        CREATE INDEX IF NOT EXISTS idx_form_submissions_status
            ON form_submissions (status)
            WHERE status IS NOT NULL;

        -- Record migration.
        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| IntakeError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
