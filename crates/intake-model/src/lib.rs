//! Intake Model crate - chat completion client and protocol types.
//!
//! Provides a chat model trait with an HTTP implementation for
//! OpenAI-compatible endpoints and a scripted implementation for testing,
//! plus the wire types for the completions protocol.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ChatModel, DynChatModel, OpenAiClient, RecordedCall, ScriptedModel};
pub use error::ModelError;
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, FunctionSpec, ToolSpec, WireFunctionCall,
    WireMessage, WireToolCall,
};
