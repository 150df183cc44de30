//! Error types for completion backends.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors from completion backends.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Backend configuration problem (missing API key, bad URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure reaching the completion service.
    #[error("Network error: {0}")]
    Network(String),

    /// The completion service rejected the request.
    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered, but the body was not a usable completion.
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    /// Backend-internal failure.
    #[error("Backend error: {0}")]
    Backend(String),
}
