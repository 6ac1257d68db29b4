//! Chat orchestrator: drives the model-call / tool-execution cycle.
//!
//! Owns all mutation of a chat's persisted message log. One update request
//! runs at most two model calls and at most one round of tool execution.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use intake_core::config::ChatConfig;
use intake_core::types::{Chat, ChatMessage};
use intake_model::{DynChatModel, ToolSpec};
use intake_storage::{ChatRepository, FormRepository};

use crate::error::ChatError;
use crate::executor::ToolExecutor;
use crate::tools;

/// Central coordinator for conversations.
///
/// Holds the chat store, the tool executor, and the model client, all
/// constructed once at startup and shared across requests.
pub struct ChatOrchestrator {
    chats: Arc<ChatRepository>,
    executor: ToolExecutor,
    model: Arc<dyn DynChatModel>,
    system_prompt: String,
    catalog: Vec<ToolSpec>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    /// Creates an orchestrator over the given stores and model client.
    pub fn new(
        chats: Arc<ChatRepository>,
        forms: Arc<FormRepository>,
        model: Arc<dyn DynChatModel>,
        system_prompt: impl Into<String>,
        config: ChatConfig,
    ) -> Self {
        Self {
            chats,
            executor: ToolExecutor::new(forms),
            model,
            system_prompt: system_prompt.into(),
            catalog: tools::catalog(),
            config,
        }
    }

    /// Creates a new chat with the given initial message log.
    ///
    /// An empty log is allowed; no model call is made here.
    pub fn create_chat(&self, messages: Vec<ChatMessage>) -> Result<Chat, ChatError> {
        self.validate_lengths(&messages)?;

        let chat = Chat::new(messages);
        self.chats.create(&chat)?;
        info!("Created chat {}", chat.id);
        Ok(chat)
    }

    /// Fetches a chat by ID.
    pub fn get_chat(&self, id: Uuid) -> Result<Chat, ChatError> {
        self.chats
            .find_by_id(id)?
            .ok_or(ChatError::ChatNotFound(id))
    }

    /// Lists the most recently created chats, newest first.
    ///
    /// `limit` falls back to the configured default and is capped at the
    /// configured maximum.
    pub fn list_chats(&self, limit: Option<usize>) -> Result<Vec<Chat>, ChatError> {
        let limit = limit
            .unwrap_or(self.config.default_list_limit)
            .min(self.config.max_list_limit);
        Ok(self.chats.list_recent(limit)?)
    }

    /// Appends new messages to a chat and runs one orchestration cycle.
    ///
    /// The cycle: append the caller's messages to the stored log, ask the
    /// model for a completion, execute any requested tool calls in order,
    /// ask the model once more, then persist the extended log. A model-call
    /// failure aborts the request with nothing persisted to the chat; form
    /// mutations already performed by the tool phase are permanent.
    pub async fn handle_update(
        &self,
        chat_id: Uuid,
        new_messages: Vec<ChatMessage>,
    ) -> Result<Chat, ChatError> {
        if new_messages.is_empty() {
            return Err(ChatError::EmptyUpdate);
        }
        self.validate_lengths(&new_messages)?;

        let mut chat = self.get_chat(chat_id)?;

        // Append the caller's messages in memory only.
        chat.messages.extend(new_messages);

        // First model call over the full log.
        let response = self.complete(&chat.messages).await?;
        let tool_calls = response.tool_calls.clone();
        chat.messages.push(response);

        if !tool_calls.is_empty() {
            debug!(
                "Model requested {} tool call(s) for chat {}",
                tool_calls.len(),
                chat_id
            );

            // Run the calls in the order received. Later calls may depend
            // on state mutated by earlier ones, so this stays strictly
            // sequential.
            for call in &tool_calls {
                let result = self.executor.execute(chat_id, call);
                chat.messages.push(ChatMessage::tool_result(
                    call.id.clone(),
                    call.name.clone(),
                    result,
                ));
            }

            // Second model call with the tool results appended. A tool call
            // requested here is kept in the log but never executed; one
            // round of tool handling per update.
            let follow_up = self.complete(&chat.messages).await?;
            chat.messages.push(follow_up);
        }

        // Persist the full accumulated log.
        self.chats.replace_messages(chat_id, &chat.messages)?;
        info!(
            "Chat {} updated, log now {} message(s)",
            chat_id,
            chat.messages.len()
        );

        Ok(chat)
    }

    // -- Private helpers --

    /// One completion round trip with the system prompt prepended.
    async fn complete(&self, log: &[ChatMessage]) -> Result<ChatMessage, ChatError> {
        let mut messages = Vec::with_capacity(log.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend_from_slice(log);

        match self.model.complete_boxed(&messages, &self.catalog).await {
            Ok(message) => Ok(message),
            Err(err) => {
                error!("Model call failed: {}", err);
                Err(err.into())
            }
        }
    }

    fn validate_lengths(&self, messages: &[ChatMessage]) -> Result<(), ChatError> {
        for message in messages {
            if let Some(content) = &message.content {
                if content.len() > self.config.max_message_len {
                    return Err(ChatError::MessageTooLong(self.config.max_message_len));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
