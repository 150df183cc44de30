//! API error taxonomy and response mapping.
//!
//! Every failure surfaces to the caller as a JSON body of the form
//! `{"error": <message>}` with a status code chosen by the variant. Server
//! errors are logged at `error`, client errors at `warn`, at the moment the
//! response is built.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use gwydion_calendar::CalendarError;
use gwydion_content::ContentError;
use gwydion_llm::LlmError;
use gwydion_oauth::OAuthError;

/// Errors that can surface from any API handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload is absent, malformed, or missing a field.
    #[error("{0}")]
    InvalidRequest(String),

    /// A callback arrived for a session that never started the flow.
    #[error("Authorization flow has not been started for this session")]
    FlowStateMissing,

    /// The anti-forgery state echoed by the provider does not match the
    /// one stored for this session.
    #[error("State mismatch")]
    StateMismatch,

    /// The provider refused or failed the authorization-code exchange.
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The calendar service rejected the event write.
    #[error("Calendar write failed: {0}")]
    CalendarWriteFailed(String),

    /// The calendar service could not be reached at all.
    #[error("Calendar service unreachable: {0}")]
    CalendarUnreachable(String),

    /// The completion backend failed to produce text.
    #[error("{0}")]
    CompletionFailed(String),

    /// An upstream content source failed mid-request.
    #[error("{0}")]
    ContentUnavailable(String),

    /// The requested subtopic has no Wikipedia page.
    #[error("Subtopic not found on Wikipedia")]
    SubtopicNotFound,

    /// A failure whose detail must not reach the caller.
    #[error("Internal server error")]
    Internal,
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

/// JSON body attached to every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

impl ApiError {
    /// Status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SubtopicNotFound => StatusCode::NOT_FOUND,
            ApiError::FlowStateMissing | ApiError::StateMismatch | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::TokenExchangeFailed(_)
            | ApiError::CalendarWriteFailed(_)
            | ApiError::CalendarUnreachable(_)
            | ApiError::CompletionFailed(_)
            | ApiError::ContentUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::FlowStateMissing => ApiError::FlowStateMissing,
            OAuthError::StateMismatch => ApiError::StateMismatch,
            OAuthError::TokenExchangeFailed(detail) => ApiError::TokenExchangeFailed(detail),
            // Refresh and config errors never originate from the callback
            // path; if one shows up here something is wired wrong.
            other => {
                tracing::error!(error = %other, "Unexpected authorization error");
                ApiError::Internal
            }
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::WriteFailed(detail) => ApiError::CalendarWriteFailed(detail),
            CalendarError::Unreachable(detail) => ApiError::CalendarUnreachable(detail),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        ApiError::CompletionFailed(err.to_string())
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::PageNotFound => ApiError::SubtopicNotFound,
            ContentError::UnsupportedMediaType | ContentError::InvalidEncoding(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
            ContentError::Network(_) | ContentError::Upstream(_) => {
                ApiError::ContentUnavailable(err.to_string())
            }
        }
    }
}
