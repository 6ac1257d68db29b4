//! Chat completion backends.
//!
//! - `OpenAiClient` talks to an OpenAI-compatible chat completions endpoint
//!   over HTTP. This is the production backend.
//! - `ScriptedModel` replays queued responses and records every call, for
//!   testing the orchestration loop without a network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, warn};

use intake_core::config::ModelConfig;
use intake_core::types::ChatMessage;

use crate::error::ModelError;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ToolSpec, WireMessage};

/// Service for requesting chat completions.
///
/// Implementations take the full conversation so far plus the tool catalog
/// and return the model's next message, tool calls included.
pub trait ChatModel: Send + Sync {
    /// Request one completion.
    fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> impl std::future::Future<Output = Result<ChatMessage, ModelError>> + Send;
}

/// Object-safe version of [`ChatModel`] for dynamic dispatch.
///
/// Because `ChatModel::complete` returns `impl Future` it is not
/// object-safe. This trait uses a boxed future instead, allowing
/// `Arc<dyn DynChatModel>` to be stored in structs without generics.
///
/// A blanket implementation is provided so that every `ChatModel`
/// automatically implements `DynChatModel`.
pub trait DynChatModel: Send + Sync {
    /// Request one completion (boxed future).
    fn complete_boxed<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &'a [ToolSpec],
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ChatMessage, ModelError>> + Send + 'a>,
    >;
}

/// Blanket impl: any `ChatModel` automatically implements `DynChatModel`.
impl<T: ChatModel> DynChatModel for T {
    fn complete_boxed<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &'a [ToolSpec],
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ChatMessage, ModelError>> + Send + 'a>,
    > {
        Box::pin(self.complete(messages, tools))
    }
}

// ---------------------------------------------------------------------------
// OpenAiClient - real HTTP backend
// ---------------------------------------------------------------------------

/// HTTP client for an OpenAI-compatible chat completions endpoint.
///
/// Authenticates with a bearer token read from the environment variable
/// named in the configuration. When the variable is unset, requests are
/// sent without authentication, which local compatible servers accept.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiClient {
    /// Build a client from model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Config(e.to_string()))?;

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            warn!(
                "{} is not set; model requests will be unauthenticated",
                config.api_key_env
            );
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatMessage, ModelError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from_domain).collect(),
            tools: tools.to_vec(),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Requesting chat completion"
        );

        let mut req = self.http.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))?;

        let choice = decoded
            .choices
            .into_iter()
            .next()
            .ok_or(ModelError::Empty)?;
        choice.message.into_domain()
    }
}

// ---------------------------------------------------------------------------
// ScriptedModel - queued responses for testing
// ---------------------------------------------------------------------------

/// A recorded model call, kept for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
}

/// Scripted chat model that replays queued responses.
///
/// Responses come back in FIFO order, and every call records the exact
/// messages and tool catalog it received. Calls past the end of the queue
/// fail, so a test that makes more model calls than it scripted fails
/// loudly instead of silently looping.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ChatMessage, ModelError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn enqueue(&self, message: ChatMessage) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(message));
        }
    }

    /// Queue a failure.
    pub fn enqueue_error(&self, error: ModelError) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(error));
        }
    }

    /// Number of calls completed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Copies of every recorded call, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatMessage, ModelError> {
        {
            let mut calls = self
                .calls
                .lock()
                .map_err(|e| ModelError::Request(format!("call log lock poisoned: {}", e)))?;
            calls.push(RecordedCall {
                messages: messages.to_vec(),
                tools: tools.to_vec(),
            });
        }

        let mut queue = self
            .responses
            .lock()
            .map_err(|e| ModelError::Request(format!("response queue lock poisoned: {}", e)))?;
        queue
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Request("scripted responses exhausted".to_string())))
    }
}
