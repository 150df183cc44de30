//! Authorization flow endpoints.
//!
//! `GET /api/authorize` starts the provider consent flow for the calling
//! session. `GET /api/callback` receives the provider redirect, verifies
//! the anti-forgery state, and exchanges the code for credentials.

use axum::Extension;
use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use utoipa::IntoParams;

use gwydion_oauth::{AuthorizationRequest, begin_authorization, complete_authorization};

use crate::error::{ApiError, ErrorBody, Result};
use crate::session::SessionId;
use crate::state::AppState;

/// Query parameters the provider attaches to the callback redirect.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Anti-forgery state echoed back by the provider.
    pub state: Option<String>,
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// Set when the user declined consent.
    pub error: Option<String>,
}

/// Start the authorization flow.
///
/// Mints fresh anti-forgery state, stores it for the session, and sends the
/// browser to the provider's consent page. Starting a new flow replaces any
/// earlier unfinished one; credentials the session already holds are kept.
#[utoipa::path(
    get,
    path = "/api/authorize",
    responses(
        (status = 303, description = "Redirect to the provider consent page"),
    ),
    tag = "auth"
)]
pub async fn authorize_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Redirect {
    let AuthorizationRequest { url, state: nonce } = begin_authorization(&state.oauth);
    state.sessions.set_auth_state(&session, nonce).await;

    tracing::info!(session_id = %session, "Authorization flow started");
    Redirect::to(&url)
}

/// Complete the authorization flow.
///
/// Verifies the echoed state against the stored one before any exchange is
/// attempted, trades the code for tokens, and stores the credentials. The
/// stored state is consumed whether or not verification succeeds, so a
/// replayed callback cannot match twice.
#[utoipa::path(
    get,
    path = "/api/callback",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Authorization complete, redirect to the landing page"),
        (status = 400, description = "Provider reported an error or the callback is incomplete", body = ErrorBody),
        (status = 500, description = "State verification failed", body = ErrorBody),
        (status = 502, description = "Token exchange failed", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn callback_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    if let Some(denial) = query.error {
        return Err(ApiError::InvalidRequest(format!(
            "Authorization declined by provider: {}",
            denial
        )));
    }

    let (Some(returned_state), Some(code)) = (query.state, query.code) else {
        return Err(ApiError::InvalidRequest(
            "Callback is missing state or code".to_string(),
        ));
    };

    let stored = state.sessions.take_auth_state(&session).await;

    let bundle =
        complete_authorization(&state.oauth, stored.as_deref(), &returned_state, &code).await?;

    state.sessions.save_credentials(&session, bundle).await;
    tracing::info!(session_id = %session, "Authorization complete, credentials stored");

    Ok(Redirect::to("/"))
}
