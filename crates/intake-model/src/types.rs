//! Wire types for the chat completions protocol.
//!
//! The domain message log uses a flat tool call shape; the protocol nests
//! each call under a `function` object and tags it with a type. Conversions
//! between the two live here so the rest of the system never sees the
//! protocol encoding.

use serde::{Deserialize, Serialize};

use intake_core::types::{ChatMessage, Role, ToolCall};

use crate::error::ModelError;

// =============================================================================
// Request
// =============================================================================

/// Body of a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
}

/// One callable function advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

impl ToolSpec {
    /// Builds a function tool from its name, description, and JSON Schema
    /// parameter object.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// The function half of a [`ToolSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

// =============================================================================
// Messages
// =============================================================================

/// A message in the protocol encoding.
///
/// `content` is always serialized, as null when absent, since some servers
/// reject assistant messages without a content key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl WireMessage {
    /// Encodes a domain message into the protocol shape.
    pub fn from_domain(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    kind: "function".to_string(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id: msg.tool_call_id.clone(),
            name: msg.name.clone(),
        }
    }

    /// Decodes a protocol message into the domain shape.
    ///
    /// Rejects tool call entries that are not function calls rather than
    /// silently dropping them.
    pub fn into_domain(self) -> Result<ChatMessage, ModelError> {
        let mut tool_calls = Vec::with_capacity(self.tool_calls.len());
        for call in self.tool_calls {
            if call.kind != "function" {
                return Err(ModelError::Decode(format!(
                    "unsupported tool call type: {}",
                    call.kind
                )));
            }
            tool_calls.push(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            });
        }

        Ok(ChatMessage {
            role: self.role,
            content: self.content,
            tool_calls,
            tool_call_id: self.tool_call_id,
            name: self.name,
        })
    }
}

/// A tool call in the protocol encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: WireFunctionCall,
}

/// The function invocation half of a [`WireToolCall`]. `arguments` is a
/// JSON-encoded string, not an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    pub arguments: String,
}

// =============================================================================
// Response
// =============================================================================

/// Body of a chat completion response. Fields the system never reads
/// (usage, ids) are ignored at decode time.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

/// One completion choice. Only the first is ever used.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_domain_plain_message() {
        let wire = WireMessage::from_domain(&ChatMessage::user("hello"));
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json, json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_from_domain_nests_tool_calls() {
        let msg = ChatMessage::assistant_with_tools(
            None,
            vec![ToolCall {
                id: "call_1".to_string(),
                name: "submit_interest_form".to_string(),
                arguments: "{\"name\":\"Ada\"}".to_string(),
            }],
        );

        let json = serde_json::to_value(WireMessage::from_domain(&msg)).unwrap();
        assert_eq!(
            json,
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "submit_interest_form",
                        "arguments": "{\"name\":\"Ada\"}"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_into_domain_flattens_tool_calls() {
        let wire: WireMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_7",
                "type": "function",
                "function": {"name": "delete_interest_form", "arguments": "{\"form_id\":\"x\"}"}
            }]
        }))
        .unwrap();

        let msg = wire.into_domain().unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_none());
        assert_eq!(msg.tool_calls.len(), 1);
        assert_eq!(msg.tool_calls[0].id, "call_7");
        assert_eq!(msg.tool_calls[0].name, "delete_interest_form");
        assert_eq!(msg.tool_calls[0].arguments, "{\"form_id\":\"x\"}");
    }

    #[test]
    fn test_into_domain_rejects_non_function_calls() {
        let wire: WireMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "retrieval",
                "function": {"name": "x", "arguments": "{}"}
            }]
        }))
        .unwrap();

        let err = wire.into_domain().unwrap_err();
        assert!(err.to_string().contains("unsupported tool call type"));
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![WireMessage::from_domain(&ChatMessage::user("hi"))],
            tools: Vec::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert_eq!(json["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_request_serializes_tool_catalog() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: Vec::new(),
            tools: vec![ToolSpec::function(
                "submit_interest_form",
                "Submit a new interest form",
                json!({"type": "object", "properties": {}}),
            )],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "submit_interest_form");
        assert_eq!(
            json["tools"][0]["function"]["description"],
            "Submit a new interest form"
        );
    }

    #[test]
    fn test_response_decode() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Thanks, noted."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4}
        }))
        .unwrap();

        assert_eq!(response.choices.len(), 1);
        let msg = response.choices[0].message.clone().into_domain().unwrap();
        assert_eq!(msg.content.as_deref(), Some("Thanks, noted."));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_response_decode_missing_content() {
        // Some servers omit the content key entirely for tool call turns.
        let wire: WireMessage = serde_json::from_value(json!({
            "role": "assistant",
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "update_interest_form", "arguments": "{}"}
            }]
        }))
        .unwrap();

        let msg = wire.into_domain().unwrap();
        assert!(msg.content.is_none());
        assert!(msg.has_tool_calls());
    }
}
