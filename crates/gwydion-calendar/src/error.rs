//! Calendar error types.

use thiserror::Error;

use gwydion_oauth::OAuthError;

/// Errors from calendar write operations.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// The provider rejected the request (insufficient scope, malformed
    /// time range, rate limit, refresh rejected).
    #[error("calendar write failed: {0}")]
    WriteFailed(String),

    /// Network/transport failure or timeout before a provider verdict.
    #[error("calendar service unreachable: {0}")]
    Unreachable(String),
}

impl From<OAuthError> for CalendarError {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::Network(msg) => CalendarError::Unreachable(msg),
            other => CalendarError::WriteFailed(other.to_string()),
        }
    }
}

/// Result type for calendar operations.
pub type Result<T> = std::result::Result<T, CalendarError>;
