use thiserror::Error;

/// Errors from chat completion backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("Invalid model configuration: {0}")]
    Config(String),

    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model request timed out")]
    Timeout,

    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode model response: {0}")]
    Decode(String),

    #[error("Model returned no choices")]
    Empty,
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout
        } else {
            ModelError::Request(err.to_string())
        }
    }
}
