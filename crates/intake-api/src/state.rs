//! Application state shared across all route handlers.
//!
//! AppState holds the orchestrator and repositories. Everything is
//! constructed once at startup and passed to handlers via axum's State
//! extractor.

use std::sync::Arc;
use std::time::Instant;

use intake_chat::ChatOrchestrator;
use intake_storage::{ChatRepository, FormRepository};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator driving chat updates and model calls.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Repository for conversations.
    pub chats: Arc<ChatRepository>,
    /// Repository for interest form submissions.
    pub forms: Arc<FormRepository>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        chats: Arc<ChatRepository>,
        forms: Arc<FormRepository>,
    ) -> Self {
        Self {
            orchestrator,
            chats,
            forms,
            start_time: Instant::now(),
        }
    }
}
