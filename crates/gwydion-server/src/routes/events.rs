//! Calendar scheduling endpoints.
//!
//! `POST /api/create-event` and `POST /api/schedule-workflow` accept the
//! same body and behave identically: both write a "Skill Daily Workflow"
//! event to the session's primary calendar. Sessions without stored
//! credentials are redirected into the authorization flow before the body
//! is even validated.

use axum::extract::{Json, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Extension;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use gwydion_calendar::{Event, EventRequest};

use crate::error::{ApiError, ErrorBody, Result};
use crate::gateway::{self, ClientAccess};
use crate::session::SessionId;
use crate::state::AppState;

/// Summary attached to every scheduled event.
pub const EVENT_SUMMARY: &str = "Skill Daily Workflow";

/// Request body for the scheduling endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    /// Workflow text; becomes the event description.
    #[serde(default)]
    pub workflow: Option<String>,
    /// Event start, RFC 3339.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Event end, RFC 3339.
    #[serde(default)]
    pub end_time: Option<String>,
}

/// The created event as the provider returned it.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    #[schema(value_type = Object)]
    pub event: Event,
}

/// Schedule a workflow as a calendar event.
#[utoipa::path(
    post,
    path = "/api/create-event",
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Event created", body = EventResponse),
        (status = 303, description = "No stored credentials, redirect to /api/authorize"),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 502, description = "Calendar write failed", body = ErrorBody),
    ),
    tag = "calendar"
)]
pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Option<Json<ScheduleRequest>>,
) -> Result<Response> {
    schedule(state, session, body).await
}

/// Alias of [`create_event_handler`] kept for the workflow-centric client.
#[utoipa::path(
    post,
    path = "/api/schedule-workflow",
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Event created", body = EventResponse),
        (status = 303, description = "No stored credentials, redirect to /api/authorize"),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 502, description = "Calendar write failed", body = ErrorBody),
    ),
    tag = "calendar"
)]
pub async fn schedule_workflow_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Option<Json<ScheduleRequest>>,
) -> Result<Response> {
    schedule(state, session, body).await
}

async fn schedule(
    state: AppState,
    session: SessionId,
    body: Option<Json<ScheduleRequest>>,
) -> Result<Response> {
    // Credentials are checked before the payload; an unauthorized caller
    // learns nothing about body validation.
    let client = match gateway::acquire(&state, &session).await? {
        ClientAccess::Ready(client) => client,
        ClientAccess::NeedsAuthorization => {
            tracing::debug!(session_id = %session, "No stored credentials, starting authorization");
            return Ok(Redirect::to("/api/authorize").into_response());
        }
    };

    let event = validate(body)?;
    let created = gateway::create_event(&state, &session, client, &event).await?;

    Ok(Json(EventResponse { event: created }).into_response())
}

fn validate(body: Option<Json<ScheduleRequest>>) -> Result<EventRequest> {
    let missing = || ApiError::InvalidRequest("Missing required fields".to_string());

    let Json(request) = body.ok_or_else(missing)?;
    let (workflow, start_time, end_time) =
        match (request.workflow, request.start_time, request.end_time) {
            (Some(workflow), Some(start), Some(end)) => (workflow, start, end),
            _ => return Err(missing()),
        };

    let start = DateTime::parse_from_rfc3339(&start_time).map_err(|_| {
        ApiError::InvalidRequest("start_time must be an RFC 3339 timestamp".to_string())
    })?;
    let end = DateTime::parse_from_rfc3339(&end_time).map_err(|_| {
        ApiError::InvalidRequest("end_time must be an RFC 3339 timestamp".to_string())
    })?;
    if start >= end {
        return Err(ApiError::InvalidRequest(
            "start_time must be earlier than end_time".to_string(),
        ));
    }

    Ok(EventRequest::timed(
        EVENT_SUMMARY,
        &workflow,
        &start_time,
        &end_time,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use gwydion_content::WikiClient;
    use gwydion_llm::{MockBackend, SharedBackend};
    use gwydion_oauth::{CredentialBundle, OAuthConfig};

    use crate::Server;
    use crate::config::ServerConfig;

    fn test_state(calendar_url: &str, token_url: &str) -> AppState {
        let oauth = OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            auth_url: "https://accounts.example.com/auth".to_string(),
            token_url: token_url.to_string(),
            redirect_uri: "http://localhost:5000/api/callback".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            timeout: Duration::from_secs(5),
        };
        let backend: SharedBackend = Arc::new(MockBackend::with_text("unused"));
        let wiki = WikiClient::new().unwrap();
        let config = ServerConfig::new().with_calendar_url(calendar_url);

        AppState::new(oauth, backend, wiki, config)
    }

    fn test_bundle(token: &str, token_uri: &str, refresh: Option<&str>) -> CredentialBundle {
        CredentialBundle {
            token: token.to_string(),
            refresh_token: refresh.map(str::to_string),
            token_uri: token_uri.to_string(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
        }
    }

    /// Seed credentials for a fresh session and return its cookie header.
    async fn authorized_session(state: &AppState, bundle: CredentialBundle) -> (SessionId, String) {
        let session = SessionId::generate();
        state.sessions.save_credentials(&session, bundle).await;
        let cookie = format!("gwydion_session={}", session.as_str());
        (session, cookie)
    }

    fn schedule_request(cookie: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/create-event")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_body() -> serde_json::Value {
        serde_json::json!({
            "workflow": "Write the weekly report",
            "start_time": "2025-03-01T09:00:00Z",
            "end_time": "2025-03-01T10:00:00Z"
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_session_is_redirected_to_authorize() {
        let state = test_state("http://127.0.0.1:1", "http://127.0.0.1:1/token");
        let app = Server::from_state(state).router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/create-event")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(valid_body().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/authorize"
        );
    }

    #[tokio::test]
    async fn event_is_written_to_the_primary_calendar() {
        let calendar = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header_matcher("authorization", "Bearer access-1"))
            .and(body_string_contains("Skill Daily Workflow"))
            .and(body_string_contains("Write the weekly report"))
            .and(body_string_contains("2025-03-01T09:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt_1",
                "status": "confirmed",
                "htmlLink": "https://calendar.example.com/evt_1"
            })))
            .mount(&calendar)
            .await;

        let state = test_state(&calendar.uri(), "http://127.0.0.1:1/token");
        let (_, cookie) = authorized_session(
            &state,
            test_bundle("access-1", "http://127.0.0.1:1/token", Some("refresh-1")),
        )
        .await;
        let app = Server::from_state(state).router();

        let response = app
            .oneshot(schedule_request(&cookie, &valid_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["event"]["id"], "evt_1");
        assert_eq!(body["event"]["status"], "confirmed");
    }

    #[tokio::test]
    async fn schedule_workflow_behaves_like_create_event() {
        let calendar = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt_2"
            })))
            .mount(&calendar)
            .await;

        let state = test_state(&calendar.uri(), "http://127.0.0.1:1/token");
        let (_, cookie) = authorized_session(
            &state,
            test_bundle("access-1", "http://127.0.0.1:1/token", None),
        )
        .await;
        let app = Server::from_state(state).router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/schedule-workflow")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from(valid_body().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["event"]["id"], "evt_2");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let state = test_state("http://127.0.0.1:1", "http://127.0.0.1:1/token");
        let (_, cookie) = authorized_session(
            &state,
            test_bundle("access-1", "http://127.0.0.1:1/token", None),
        )
        .await;
        let app = Server::from_state(state).router();

        for body in [
            serde_json::json!({}),
            serde_json::json!({"workflow": "Report"}),
            serde_json::json!({"workflow": "Report", "start_time": "2025-03-01T09:00:00Z"}),
        ] {
            let response = app
                .clone()
                .oneshot(schedule_request(&cookie, &body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "Missing required fields");
        }
    }

    #[tokio::test]
    async fn malformed_timestamps_are_rejected() {
        let state = test_state("http://127.0.0.1:1", "http://127.0.0.1:1/token");
        let (_, cookie) = authorized_session(
            &state,
            test_bundle("access-1", "http://127.0.0.1:1/token", None),
        )
        .await;
        let app = Server::from_state(state).router();

        let bad_start = serde_json::json!({
            "workflow": "Report",
            "start_time": "tomorrow at nine",
            "end_time": "2025-03-01T10:00:00Z"
        });
        let response = app
            .clone()
            .oneshot(schedule_request(&cookie, &bad_start))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "start_time must be an RFC 3339 timestamp");

        let inverted = serde_json::json!({
            "workflow": "Report",
            "start_time": "2025-03-01T11:00:00Z",
            "end_time": "2025-03-01T10:00:00Z"
        });
        let response = app
            .oneshot(schedule_request(&cookie, &inverted))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "start_time must be earlier than end_time");
    }

    #[tokio::test]
    async fn failed_write_keeps_stored_credentials() {
        let state = test_state("http://127.0.0.1:1", "http://127.0.0.1:1/token");
        let bundle = test_bundle("access-1", "http://127.0.0.1:1/token", Some("refresh-1"));
        let (session, cookie) = authorized_session(&state, bundle.clone()).await;
        let app = Server::from_state(state.clone()).router();

        let response = app
            .oneshot(schedule_request(&cookie, &valid_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let stored = state.sessions.load_credentials(&session).await.unwrap();
        assert_eq!(stored, bundle);
    }

    #[tokio::test]
    async fn rotated_access_token_is_persisted() {
        let calendar = MockServer::start().await;
        // First attempt with the stale token is rejected.
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header_matcher("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&calendar)
            .await;
        // Retry with the refreshed token succeeds.
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header_matcher("authorization", "Bearer access-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt_3"
            })))
            .mount(&calendar)
            .await;

        let token_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-2",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(&token_server)
            .await;

        let token_url = format!("{}/token", token_server.uri());
        let state = test_state(&calendar.uri(), &token_url);
        let (session, cookie) =
            authorized_session(&state, test_bundle("stale", &token_url, Some("refresh-1"))).await;
        let app = Server::from_state(state.clone()).router();

        let response = app
            .oneshot(schedule_request(&cookie, &valid_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["event"]["id"], "evt_3");

        // The rotated token survives for the next request.
        let stored = state.sessions.load_credentials(&session).await.unwrap();
        assert_eq!(stored.token, "access-2");
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
    }
}
