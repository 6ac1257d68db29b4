//! Repository implementations for SQLite-backed persistence.
//!
//! Provides ChatRepository and FormRepository that operate on the Database
//! struct using raw SQL. Chat message logs are stored as JSON text; form
//! submissions are stored as one row per form.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use intake_core::error::IntakeError;
use intake_core::types::{Chat, ChatMessage, FormStatus, FormSubmission, FormUpdate};

use crate::db::Database;

/// Repository for conversations.
pub struct ChatRepository {
    db: Arc<Database>,
}

impl ChatRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new chat with its initial message log.
    pub fn create(&self, chat: &Chat) -> Result<(), IntakeError> {
        let messages = encode_messages(&chat.messages)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chats (id, messages, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![
                    chat.id.to_string(),
                    messages,
                    chat.created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| IntakeError::Storage(format!("Failed to save chat: {}", e)))?;
            Ok(())
        })
    }

    /// Find a chat by ID.
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, IntakeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, messages, created_at FROM chats WHERE id = ?1")
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![id.to_string()], |row| Ok(row_to_chat(row)))
                .optional()
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            match result {
                Some(chat) => Ok(Some(chat?)),
                None => Ok(None),
            }
        })
    }

    /// List the most recently created chats, newest first.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Chat>, IntakeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, messages, created_at FROM chats
                     ORDER BY created_at DESC, id
                     LIMIT ?1",
                )
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![limit as i64], |row| Ok(row_to_chat(row)))
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            let mut chats = Vec::new();
            for row in rows {
                let chat = row.map_err(|e| IntakeError::Storage(e.to_string()))??;
                chats.push(chat);
            }
            Ok(chats)
        })
    }

    /// Overwrite the stored message log of an existing chat.
    ///
    /// Returns NotFound if no chat with the given ID exists.
    pub fn replace_messages(&self, id: Uuid, messages: &[ChatMessage]) -> Result<(), IntakeError> {
        let encoded = encode_messages(messages)?;
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE chats SET messages = ?1 WHERE id = ?2",
                    rusqlite::params![encoded, id.to_string()],
                )
                .map_err(|e| IntakeError::Storage(format!("Failed to update chat: {}", e)))?;
            if changed == 0 {
                return Err(IntakeError::NotFound(format!("chat {}", id)));
            }
            Ok(())
        })
    }

    /// Count total chats.
    pub fn count(&self) -> Result<u64, IntakeError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))
                .map_err(|e| IntakeError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// Repository for interest form submissions.
pub struct FormRepository {
    db: Arc<Database>,
}

impl FormRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new form submission.
    pub fn create(&self, form: &FormSubmission) -> Result<(), IntakeError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO form_submissions (id, chat_id, name, email, phone_number, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    form.id.to_string(),
                    form.chat_id.to_string(),
                    form.name,
                    form.email,
                    form.phone_number,
                    form.status.map(|s| s.code()),
                ],
            )
            .map_err(|e| IntakeError::Storage(format!("Failed to save form: {}", e)))?;
            Ok(())
        })
    }

    /// Find a form submission by ID.
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<FormSubmission>, IntakeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, chat_id, name, email, phone_number, status
                     FROM form_submissions WHERE id = ?1",
                )
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![id.to_string()], |row| Ok(row_to_form(row)))
                .optional()
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            match result {
                Some(form) => Ok(Some(form?)),
                None => Ok(None),
            }
        })
    }

    /// List the forms belonging to a chat in insertion order, optionally
    /// narrowed to a single status.
    pub fn list_by_chat(
        &self,
        chat_id: Uuid,
        status: Option<FormStatus>,
    ) -> Result<Vec<FormSubmission>, IntakeError> {
        self.db.with_conn(|conn| {
            let mut forms = Vec::new();

            match status {
                Some(status) => {
                    let mut stmt = conn
                        .prepare(
                            "SELECT id, chat_id, name, email, phone_number, status
                             FROM form_submissions
                             WHERE chat_id = ?1 AND status = ?2
                             ORDER BY created_at ASC, rowid ASC",
                        )
                        .map_err(|e| IntakeError::Storage(e.to_string()))?;

                    let rows = stmt
                        .query_map(
                            rusqlite::params![chat_id.to_string(), status.code()],
                            |row| Ok(row_to_form(row)),
                        )
                        .map_err(|e| IntakeError::Storage(e.to_string()))?;

                    for row in rows {
                        let form = row.map_err(|e| IntakeError::Storage(e.to_string()))??;
                        forms.push(form);
                    }
                }
                None => {
                    let mut stmt = conn
                        .prepare(
                            "SELECT id, chat_id, name, email, phone_number, status
                             FROM form_submissions
                             WHERE chat_id = ?1
                             ORDER BY created_at ASC, rowid ASC",
                        )
                        .map_err(|e| IntakeError::Storage(e.to_string()))?;

                    let rows = stmt
                        .query_map(rusqlite::params![chat_id.to_string()], |row| {
                            Ok(row_to_form(row))
                        })
                        .map_err(|e| IntakeError::Storage(e.to_string()))?;

                    for row in rows {
                        let form = row.map_err(|e| IntakeError::Storage(e.to_string()))??;
                        forms.push(form);
                    }
                }
            }

            Ok(forms)
        })
    }

    /// Apply a partial update to a form submission.
    ///
    /// Returns the updated form, or None if no form with the given ID
    /// exists. The read-modify-write runs under one connection lock.
    pub fn update(
        &self,
        id: Uuid,
        update: &FormUpdate,
    ) -> Result<Option<FormSubmission>, IntakeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, chat_id, name, email, phone_number, status
                     FROM form_submissions WHERE id = ?1",
                )
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            let existing = stmt
                .query_row(rusqlite::params![id.to_string()], |row| Ok(row_to_form(row)))
                .optional()
                .map_err(|e| IntakeError::Storage(e.to_string()))?;

            let mut form = match existing {
                Some(form) => form?,
                None => return Ok(None),
            };

            form.apply(update);

            conn.execute(
                "UPDATE form_submissions
                 SET name = ?1, email = ?2, phone_number = ?3, status = ?4
                 WHERE id = ?5",
                rusqlite::params![
                    form.name,
                    form.email,
                    form.phone_number,
                    form.status.map(|s| s.code()),
                    id.to_string(),
                ],
            )
            .map_err(|e| IntakeError::Storage(format!("Failed to update form: {}", e)))?;

            Ok(Some(form))
        })
    }

    /// Delete a form submission by ID.
    ///
    /// Returns true if a row was deleted, false if the form did not exist.
    pub fn delete(&self, id: Uuid) -> Result<bool, IntakeError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "DELETE FROM form_submissions WHERE id = ?1",
                    rusqlite::params![id.to_string()],
                )
                .map_err(|e| IntakeError::Storage(format!("Failed to delete form: {}", e)))?;
            Ok(changed > 0)
        })
    }

    /// Count total form submissions.
    pub fn count(&self) -> Result<u64, IntakeError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM form_submissions", [], |row| {
                    row.get(0)
                })
                .map_err(|e| IntakeError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

// ============================================================================
// Helper functions for row-to-entity conversion.
// ============================================================================

fn encode_messages(messages: &[ChatMessage]) -> Result<String, IntakeError> {
    serde_json::to_string(messages)
        .map_err(|e| IntakeError::Storage(format!("Failed to encode message log: {}", e)))
}

fn row_to_chat(row: &rusqlite::Row<'_>) -> Result<Chat, IntakeError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let messages_json: String = row
        .get(1)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let created_ms: i64 = row
        .get(2)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;

    Ok(Chat {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| IntakeError::Storage(format!("Invalid UUID: {}", e)))?,
        messages: serde_json::from_str(&messages_json)
            .map_err(|e| IntakeError::Storage(format!("Invalid message log: {}", e)))?,
        created_at: Utc
            .timestamp_millis_opt(created_ms)
            .single()
            .unwrap_or_default(),
    })
}

fn row_to_form(row: &rusqlite::Row<'_>) -> Result<FormSubmission, IntakeError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let chat_id_str: String = row
        .get(1)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let name: String = row
        .get(2)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let email: String = row
        .get(3)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let phone_number: String = row
        .get(4)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;
    let status_code: Option<i64> = row
        .get(5)
        .map_err(|e| IntakeError::Storage(e.to_string()))?;

    let status = match status_code {
        Some(code) => Some(
            FormStatus::try_from(code).map_err(|e| IntakeError::Storage(e.to_string()))?,
        ),
        None => None,
    };

    Ok(FormSubmission {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| IntakeError::Storage(format!("Invalid UUID: {}", e)))?,
        chat_id: Uuid::parse_str(&chat_id_str)
            .map_err(|e| IntakeError::Storage(format!("Invalid UUID: {}", e)))?,
        name,
        email,
        phone_number,
        status,
    })
}
