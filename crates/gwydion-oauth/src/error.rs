//! OAuth error types.

use thiserror::Error;

/// Errors from the authorization flow and token endpoints.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A callback arrived for a session that never started the flow.
    #[error("authorization flow has not been started for this session")]
    FlowStateMissing,

    /// The callback's anti-forgery state does not match the stored one.
    #[error("State mismatch")]
    StateMismatch,

    /// The provider rejected the authorization-code exchange, or the
    /// exchange could not be completed at all.
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The provider rejected a refresh-token grant.
    #[error("token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Transport-level failure talking to the provider.
    #[error("network error: {0}")]
    Network(String),

    /// Client-secrets file could not be read or understood.
    #[error("invalid client secrets: {0}")]
    Config(String),
}

/// Result type for OAuth operations.
pub type Result<T> = std::result::Result<T, OAuthError>;
