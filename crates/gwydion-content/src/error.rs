//! Error types for content services.

use thiserror::Error;

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors from Wikipedia lookup and upload extraction.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Transport failure reaching the upstream service.
    #[error("Network error: {0}")]
    Network(String),

    /// Wikipedia has no page with the requested title.
    #[error("Subtopic not found on Wikipedia")]
    PageNotFound,

    /// The upstream service answered with an unexpected status or body.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The uploaded media type has no extractor.
    #[error("Unsupported file type")]
    UnsupportedMediaType,

    /// The upload claimed to be text but was not valid UTF-8.
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),
}
