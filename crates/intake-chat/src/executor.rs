//! Executes decoded tool invocations against the form store.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use intake_core::error::IntakeError;
use intake_core::types::{FormStatus, FormSubmission, FormUpdate, ToolCall};
use intake_storage::FormRepository;

use crate::tools::{ToolInvocation, UpdateArgs};

/// Result string reported to the model when a mutation succeeds.
const RESULT_SUCCESS: &str = "Success";
/// Result string reported to the model when the target form does not exist.
const RESULT_NOT_FOUND: &str = "Form not found";

/// Runs tool calls requested by the model against the form store.
///
/// Every failure, from decode to store access, is converted into the
/// result string handed back to the model. Execution never aborts the
/// surrounding orchestration cycle.
pub struct ToolExecutor {
    forms: Arc<FormRepository>,
}

impl ToolExecutor {
    pub fn new(forms: Arc<FormRepository>) -> Self {
        Self { forms }
    }

    /// Executes one tool call on behalf of a chat.
    ///
    /// The returned string is used verbatim as the tool message content.
    pub fn execute(&self, chat_id: Uuid, call: &ToolCall) -> String {
        match self.run(chat_id, call) {
            Ok(result) => result,
            Err(err) => {
                warn!("Tool call {} ({}) failed: {}", call.id, call.name, err);
                format!("Error: {}", err)
            }
        }
    }

    fn run(&self, chat_id: Uuid, call: &ToolCall) -> Result<String, IntakeError> {
        match ToolInvocation::decode(call)? {
            ToolInvocation::Submit(args) => {
                let form =
                    FormSubmission::new(chat_id, args.name, args.email, args.phone_number);
                self.forms.create(&form)?;
                debug!("Submitted interest form {} for chat {}", form.id, chat_id);
                Ok(RESULT_SUCCESS.to_string())
            }
            ToolInvocation::Update(args) => self.update_form(args),
            ToolInvocation::Delete(args) => {
                if self.forms.delete(args.form_id)? {
                    debug!("Deleted interest form {}", args.form_id);
                    Ok(RESULT_SUCCESS.to_string())
                } else {
                    Ok(RESULT_NOT_FOUND.to_string())
                }
            }
        }
    }

    fn update_form(&self, args: UpdateArgs) -> Result<String, IntakeError> {
        // Validate before touching the store so a bad status leaves the
        // stored form untouched.
        let status = match args.status {
            Some(code) => Some(FormStatus::try_from(code)?),
            None => None,
        };

        let update = FormUpdate {
            name: args.name,
            email: args.email,
            phone_number: args.phone_number,
            status,
        };

        match self.forms.update(args.form_id, &update)? {
            Some(form) => {
                debug!("Updated interest form {}", form.id);
                Ok(RESULT_SUCCESS.to_string())
            }
            None => Ok(RESULT_NOT_FOUND.to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
