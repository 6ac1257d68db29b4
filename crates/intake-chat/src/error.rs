//! Error types for the orchestration layer.

use intake_core::error::IntakeError;
use intake_model::ModelError;

/// Errors from the chat orchestration engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat not found: {0}")]
    ChatNotFound(uuid::Uuid),
    #[error("update contains no messages")]
    EmptyUpdate,
    #[error("message exceeds maximum length of {0} bytes")]
    MessageTooLong(usize),
    #[error("model error: {0}")]
    ModelError(String),
    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<IntakeError> for ChatError {
    fn from(err: IntakeError) -> Self {
        ChatError::StorageError(err.to_string())
    }
}

impl From<ModelError> for ChatError {
    fn from(err: ModelError) -> Self {
        ChatError::ModelError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_chat_error_display() {
        let id = Uuid::new_v4();
        let err = ChatError::ChatNotFound(id);
        assert_eq!(err.to_string(), format!("chat not found: {}", id));

        let err = ChatError::EmptyUpdate;
        assert_eq!(err.to_string(), "update contains no messages");

        let err = ChatError::MessageTooLong(8192);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 8192 bytes"
        );

        let err = ChatError::ModelError("connection refused".to_string());
        assert_eq!(err.to_string(), "model error: connection refused");

        let err = ChatError::StorageError("disk full".to_string());
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn test_chat_error_from_intake_error() {
        let storage_err = IntakeError::Storage("connection lost".to_string());
        let chat_err: ChatError = storage_err.into();
        assert!(matches!(chat_err, ChatError::StorageError(_)));
        assert!(chat_err.to_string().contains("connection lost"));
    }

    #[test]
    fn test_chat_error_from_intake_not_found() {
        let err = IntakeError::NotFound("chat abc".to_string());
        let chat_err: ChatError = err.into();
        assert!(matches!(chat_err, ChatError::StorageError(_)));
        assert!(chat_err.to_string().contains("chat abc"));
    }

    #[test]
    fn test_chat_error_from_model_error() {
        let model_err = ModelError::Timeout;
        let chat_err: ChatError = model_err.into();
        assert!(matches!(chat_err, ChatError::ModelError(_)));
    }

    #[test]
    fn test_chat_error_not_found_preserves_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let err = ChatError::ChatNotFound(id);
        assert_eq!(
            err.to_string(),
            "chat not found: 550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_chat_error_not_found_nil_uuid() {
        let err = ChatError::ChatNotFound(Uuid::nil());
        assert_eq!(
            err.to_string(),
            "chat not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_chat_error_message_too_long_boundary_zero() {
        let err = ChatError::MessageTooLong(0);
        assert_eq!(err.to_string(), "message exceeds maximum length of 0 bytes");
    }

    #[test]
    fn test_chat_error_empty_inner_messages() {
        let err = ChatError::ModelError(String::new());
        assert_eq!(err.to_string(), "model error: ");

        let err = ChatError::StorageError(String::new());
        assert_eq!(err.to_string(), "storage error: ");
    }

    #[test]
    fn test_chat_error_unicode_inner_messages() {
        let err = ChatError::ModelError("upstream said: \u{00e9}chec".to_string());
        assert!(err.to_string().contains("\u{00e9}chec"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = ChatError::EmptyUpdate;
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("EmptyUpdate"));

        let err = ChatError::MessageTooLong(100);
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("MessageTooLong"));

        let err = ChatError::ChatNotFound(Uuid::new_v4());
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("ChatNotFound"));
    }
}
