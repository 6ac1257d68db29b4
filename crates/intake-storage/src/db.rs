//! SQLite connection handling.
//!
//! One process-wide connection guarded by a mutex. The store is small and
//! write-light (a chat update rewrites one message-log row, a tool call
//! touches one form row), so a single serialized connection is simpler
//! than a pool and more than fast enough.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use intake_core::error::IntakeError;

use crate::migrations;

/// Shared handle to the SQLite database.
///
/// `rusqlite::Connection` is `Send` but not `Sync`; behind the `Mutex` the
/// handle is automatically both, so an `Arc<Database>` can be cloned into
/// every repository and request handler.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database file, tune it, and apply migrations.
    ///
    /// Missing parent directories are created.
    pub fn new(path: &Path) -> Result<Self, IntakeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            IntakeError::Storage(format!(
                "Failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;

        // WAL with synchronous=NORMAL: one fsync per checkpoint rather
        // than per chat update, and a crash mid-write leaves the prior
        // message log intact. busy_timeout covers another process
        // briefly holding the file lock. The schema declares no foreign
        // keys, so enforcement stays at its default.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| IntakeError::Storage(format!("Failed to configure database: {}", e)))?;

        let db = Self::migrate(conn)?;
        info!("Database ready at {}", path.display());
        Ok(db)
    }

    /// Open a fresh in-memory database with the schema applied.
    ///
    /// Journal pragmas are skipped: there is no file to protect and no
    /// other process to wait on. Used throughout the test suites.
    pub fn in_memory() -> Result<Self, IntakeError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            IntakeError::Storage(format!("Failed to open in-memory database: {}", e))
        })?;
        Self::migrate(conn)
    }

    /// Run a closure against the connection.
    ///
    /// The mutex is held for the whole closure, so a multi-statement
    /// read-modify-write sequence executes atomically with respect to
    /// every other caller.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, IntakeError>
    where
        F: FnOnce(&Connection) -> Result<T, IntakeError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| IntakeError::Storage("database mutex poisoned".to_string()))?;
        f(&conn)
    }

    fn migrate(conn: Connection) -> Result<Self, IntakeError> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }
}
