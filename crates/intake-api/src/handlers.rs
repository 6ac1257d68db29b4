//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/path parameters via axum extractors, calls
//! into the orchestrator or repositories, and returns JSON responses.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use intake_core::types::{Chat, ChatMessage, FormStatus, FormSubmission, FormUpdate};

use crate::error::ApiError;
use crate::state::AppState;

const INVALID_STATUS_FILTER: &str =
    "Invalid status filter. Use 1 (TO DO), 2 (IN PROGRESS), or 3 (COMPLETED)";
const INVALID_STATUS: &str = "Invalid status. Must be 1 (TO DO), 2 (IN PROGRESS), or 3 (COMPLETED)";
const FORM_NOT_FOUND: &str = "Form submission not found";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListChatsParams {
    pub limit: Option<usize>,
}

/// Body of both chat creation and chat update requests. On creation these
/// are the initial log; on update they are appended to the stored log.
#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ListFormsParams {
    pub status: Option<i64>,
}

/// Partial form update. Absent fields are left unchanged; `status` is
/// validated against the three workflow states before touching the store.
#[derive(Debug, Default, Deserialize)]
pub struct FormUpdatePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<i64>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub total_chats: u64,
    pub total_forms: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - service liveness and store counters.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let total_chats = state.chats.count()?;
    let total_forms = state.forms.count()?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_chats,
        total_forms,
    }))
}

/// GET /chat - list recent chats, newest first.
pub async fn list_chats(
    State(state): State<AppState>,
    Query(params): Query<ListChatsParams>,
) -> Result<Json<Vec<Chat>>, ApiError> {
    let chats = state.orchestrator.list_chats(params.limit)?;
    Ok(Json(chats))
}

/// POST /chat - create a chat with an optional initial message log.
pub async fn create_chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<Chat>, ApiError> {
    let chat = state.orchestrator.create_chat(payload.messages)?;
    Ok(Json(chat))
}

/// GET /chat/:chat_id - fetch one chat with its full message log.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Chat>, ApiError> {
    let chat = state.orchestrator.get_chat(chat_id)?;
    Ok(Json(chat))
}

/// PUT /chat/:chat_id - append messages and run one orchestration cycle.
pub async fn update_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<Chat>, ApiError> {
    let chat = state
        .orchestrator
        .handle_update(chat_id, payload.messages)
        .await?;
    Ok(Json(chat))
}

/// GET /chat/:chat_id/forms - list a chat's form submissions, optionally
/// narrowed to one status.
pub async fn list_forms(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
    Query(params): Query<ListFormsParams>,
) -> Result<Json<Vec<FormSubmission>>, ApiError> {
    let status = match params.status {
        Some(code) => Some(
            FormStatus::try_from(code)
                .map_err(|_| ApiError::BadRequest(INVALID_STATUS_FILTER.to_string()))?,
        ),
        None => None,
    };

    let forms = state.forms.list_by_chat(chat_id, status)?;
    Ok(Json(forms))
}

/// PUT /form-submission/:form_id - apply a partial update to a form.
pub async fn update_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    Json(payload): Json<FormUpdatePayload>,
) -> Result<Json<FormSubmission>, ApiError> {
    // Missing form wins over a bad status value.
    if state.forms.find_by_id(form_id)?.is_none() {
        return Err(ApiError::NotFound(FORM_NOT_FOUND.to_string()));
    }

    let status = match payload.status {
        Some(code) => Some(
            FormStatus::try_from(code)
                .map_err(|_| ApiError::BadRequest(INVALID_STATUS.to_string()))?,
        ),
        None => None,
    };

    let update = FormUpdate {
        name: payload.name,
        email: payload.email,
        phone_number: payload.phone_number,
        status,
    };

    let form = state
        .forms
        .update(form_id, &update)?
        .ok_or_else(|| ApiError::NotFound(FORM_NOT_FOUND.to_string()))?;
    Ok(Json(form))
}

/// DELETE /form-submission/:form_id - delete a form submission.
pub async fn delete_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.forms.delete(form_id)? {
        return Err(ApiError::NotFound(FORM_NOT_FOUND.to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Form submission deleted successfully".to_string(),
    }))
}
