//! Request middleware: session identity and request logging.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};

use crate::session::SessionId;
use crate::state::AppState;

/// Cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "gwydion_session";

// ─────────────────────────────────────────────────────────────────────────────
// Session identity
// ─────────────────────────────────────────────────────────────────────────────

/// Attach a session id to every request.
///
/// An incoming `gwydion_session` cookie is honored as-is; otherwise a fresh
/// id is minted and set on the response. Handlers read the id from request
/// extensions.
pub async fn session_middleware(mut request: Request<Body>, next: Next) -> Response {
    let presented = extract_session_cookie(request.headers());
    let is_new = presented.is_none();
    let session = presented
        .map(SessionId::from_cookie)
        .unwrap_or_else(SessionId::generate);

    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            session.as_str()
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Pull the session cookie value out of the request headers.
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookies) = cookie_header.to_str() else {
            continue;
        };
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Request logging
// ─────────────────────────────────────────────────────────────────────────────

/// Structured request logging middleware.
///
/// Logs method, path, status, and duration for every request, split by
/// status class so failures stand out in aggregated logs.
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}
