// src/error.rs
// Error types for the chatbot library

use thiserror::Error;

/// Main error type for the Cla! library
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The model picked an output index the label decoder does not know.
    #[error("predicted category index {0} has no known label")]
    UnknownCategory(usize),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("inference error: {0}")]
    Inference(#[from] candle_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fallback error: {0}")]
    Fallback(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Result using ChatError
pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    /// Whether this failure is an expected, recoverable condition rather than a defect.
    ///
    /// Used to pick the log level at the service boundary.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ChatError::InvalidRequest(_) | ChatError::Http(_) | ChatError::Fallback(_)
        )
    }
}

impl From<tokio::task::JoinError> for ChatError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            ChatError::Internal("inference task panicked".to_string())
        } else {
            ChatError::Internal(err.to_string())
        }
    }
}
