use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IntakeError;

// =============================================================================
// Enums
// =============================================================================

/// The author of a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Instruction message prepended before every model call.
    System,
    /// End-user input.
    User,
    /// Model output, with or without tool calls.
    Assistant,
    /// Result of a single tool invocation.
    Tool,
}

/// Workflow state of an interest form submission.
///
/// Serialized as the integer codes 1, 2 and 3 on the wire and in storage.
/// Any other integer is rejected at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum FormStatus {
    ToDo,
    InProgress,
    Completed,
}

impl FormStatus {
    /// Returns the integer code used in JSON payloads and database rows.
    pub fn code(&self) -> i64 {
        match self {
            FormStatus::ToDo => 1,
            FormStatus::InProgress => 2,
            FormStatus::Completed => 3,
        }
    }

    /// Returns the human-readable label for this status.
    pub fn label(&self) -> &str {
        match self {
            FormStatus::ToDo => "TO DO",
            FormStatus::InProgress => "IN PROGRESS",
            FormStatus::Completed => "COMPLETED",
        }
    }
}

impl TryFrom<i64> for FormStatus {
    type Error = IntakeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FormStatus::ToDo),
            2 => Ok(FormStatus::InProgress),
            3 => Ok(FormStatus::Completed),
            other => Err(IntakeError::Validation(format!(
                "invalid status code: {other}"
            ))),
        }
    }
}

impl From<FormStatus> for i64 {
    fn from(status: FormStatus) -> Self {
        status.code()
    }
}

// =============================================================================
// Entity Structs (defined in intake-core for shared use)
// =============================================================================

/// A single function invocation requested by the model.
///
/// `arguments` is the raw JSON-encoded argument object exactly as the model
/// produced it. It is decoded only at execution time so that malformed
/// arguments surface as a tool result rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// One entry in a chat's ordered message log.
///
/// The field population depends on the role: user and system messages carry
/// only `content`; assistant messages may carry `tool_calls`; tool messages
/// carry `tool_call_id`, `name` and the result text in `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Builds a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Builds a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Builds a plain assistant message without tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Builds an assistant message carrying tool calls.
    pub fn assistant_with_tools(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
            name: None,
        }
    }

    /// Builds the tool result message answering one tool call.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A conversation with its full ordered message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Creates a new chat with a fresh id and the given initial log.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages,
            created_at: Utc::now(),
        }
    }
}

/// An interest form captured during a conversation.
///
/// `status` starts unset and only ever holds one of the three workflow
/// states once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub status: Option<FormStatus>,
}

impl FormSubmission {
    /// Creates a new submission bound to a chat, with status unset.
    pub fn new(
        chat_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            status: None,
        }
    }

    /// Applies a partial update in place. Absent fields are left unchanged.
    pub fn apply(&mut self, update: &FormUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(phone_number) = &update.phone_number {
            self.phone_number = phone_number.clone();
        }
        if let Some(status) = update.status {
            self.status = Some(status);
        }
    }
}

/// A validated partial update to a form submission.
///
/// Every field is optional. A `None` field means "leave unchanged"; an
/// update with no fields set is a no-op that still succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<FormStatus>,
}

// =============================================================================
// Tests
// =============================================================================
