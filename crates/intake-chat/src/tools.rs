//! The fixed catalog of form tools offered to the model.
//!
//! Tool names arrive from the model as strings; this module resolves them
//! into a closed set of invocations with typed argument records. Unknown
//! names and malformed payloads are rejected here, before any store access.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use intake_core::error::IntakeError;
use intake_core::types::ToolCall;
use intake_model::ToolSpec;

// =============================================================================
// Tool identities
// =============================================================================

/// The three recognized form tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormTool {
    Submit,
    Update,
    Delete,
}

impl FormTool {
    /// Wire name of the tool as offered to the model.
    pub fn name(&self) -> &'static str {
        match self {
            FormTool::Submit => "submit_interest_form",
            FormTool::Update => "update_interest_form",
            FormTool::Delete => "delete_interest_form",
        }
    }

    /// Resolves a wire name back to a tool. Unknown names yield None.
    pub fn parse(name: &str) -> Option<FormTool> {
        match name {
            "submit_interest_form" => Some(FormTool::Submit),
            "update_interest_form" => Some(FormTool::Update),
            "delete_interest_form" => Some(FormTool::Delete),
            _ => None,
        }
    }
}

// =============================================================================
// Argument records
// =============================================================================

/// Arguments for `submit_interest_form`. All fields are required; the
/// owning chat is injected by the executor, never taken from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitArgs {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Arguments for `update_interest_form`. Only `form_id` is required.
///
/// `status` stays a raw integer here so that an out-of-range value fails
/// status validation at execution time instead of payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateArgs {
    pub form_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
}

/// Arguments for `delete_interest_form`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteArgs {
    pub form_id: Uuid,
}

/// A fully decoded tool call, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    Submit(SubmitArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
}

impl ToolInvocation {
    /// Decodes a raw tool call into a typed invocation.
    ///
    /// The `arguments` payload is a JSON-encoded string produced by the
    /// model; it is parsed against the record matching the tool name.
    pub fn decode(call: &ToolCall) -> Result<Self, IntakeError> {
        let tool = FormTool::parse(&call.name)
            .ok_or_else(|| IntakeError::Validation(format!("unknown tool: {}", call.name)))?;

        let invocation = match tool {
            FormTool::Submit => ToolInvocation::Submit(serde_json::from_str(&call.arguments)?),
            FormTool::Update => ToolInvocation::Update(serde_json::from_str(&call.arguments)?),
            FormTool::Delete => ToolInvocation::Delete(serde_json::from_str(&call.arguments)?),
        };
        Ok(invocation)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Builds the tool catalog passed to the model on every completion call.
pub fn catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec::function(
            FormTool::Submit.name(),
            "Submit an interest form for the user",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "the user's name"},
                    "email": {"type": "string", "description": "the user's email"},
                    "phone_number": {"type": "string", "description": "the user's phone"},
                },
                "required": ["name", "email", "phone_number"],
            }),
        ),
        ToolSpec::function(
            FormTool::Update.name(),
            "Update an existing interest form",
            json!({
                "type": "object",
                "properties": {
                    "form_id": {"type": "string"},
                    "name": {"type": "string"},
                    "email": {"type": "string"},
                    "phone_number": {"type": "string"},
                    "status": {"type": "integer", "enum": [1, 2, 3]},
                },
                "required": ["form_id"],
            }),
        ),
        ToolSpec::function(
            FormTool::Delete.name(),
            "Delete an interest form",
            json!({
                "type": "object",
                "properties": {
                    "form_id": {"type": "string"},
                },
                "required": ["form_id"],
            }),
        ),
    ]
}

// =============================================================================
// Tests
// =============================================================================
