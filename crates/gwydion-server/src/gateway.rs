//! Calendar access on behalf of a session.
//!
//! Resolves the session's stored credentials into a ready [`CalendarClient`]
//! and persists the bundle back after a successful write, so an access token
//! rotated by a silent refresh survives for the next request.

use gwydion_calendar::{CalendarClient, Event, EventRequest};

use crate::error::Result;
use crate::session::SessionId;
use crate::state::AppState;

/// Calendar that receives every scheduled event.
pub const TARGET_CALENDAR: &str = "primary";

/// Outcome of resolving a session's calendar access.
pub enum ClientAccess {
    /// Credentials found; the client is ready for writes.
    Ready(Box<CalendarClient>),

    /// No credentials stored; the caller must run the authorization flow.
    NeedsAuthorization,
}

/// Build a calendar client from the credentials stored for `session`.
pub async fn acquire(state: &AppState, session: &SessionId) -> Result<ClientAccess> {
    let Some(bundle) = state.sessions.load_credentials(session).await else {
        return Ok(ClientAccess::NeedsAuthorization);
    };

    let mut client = CalendarClient::new(bundle)?;
    if let Some(url) = &state.config.calendar_url {
        client = client.with_base_url(url);
    }

    Ok(ClientAccess::Ready(Box::new(client)))
}

/// Insert `event` into the target calendar and persist the credentials the
/// client ends up holding.
///
/// A failed insert leaves the stored bundle untouched.
pub async fn create_event(
    state: &AppState,
    session: &SessionId,
    mut client: Box<CalendarClient>,
    event: &EventRequest,
) -> Result<Event> {
    let created = client.insert_event(TARGET_CALENDAR, event).await?;

    // The insert may have rotated the access token mid-flight.
    state
        .sessions
        .save_credentials(session, client.credentials().clone())
        .await;

    tracing::info!(
        session_id = %session,
        event_id = %created.id,
        "Calendar event created"
    );

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use gwydion_content::WikiClient;
    use gwydion_llm::{MockBackend, SharedBackend};
    use gwydion_oauth::{CredentialBundle, OAuthConfig};

    use crate::config::ServerConfig;
    use crate::error::ApiError;

    fn test_state(calendar_url: Option<&str>) -> AppState {
        let oauth = OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            auth_url: "https://accounts.example.com/auth".to_string(),
            token_url: "https://oauth2.example.com/token".to_string(),
            redirect_uri: "http://localhost:5000/api/callback".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            timeout: Duration::from_secs(5),
        };
        let backend: SharedBackend = Arc::new(MockBackend::with_text("unused"));
        let wiki = WikiClient::new().unwrap();

        let mut config = ServerConfig::new();
        if let Some(url) = calendar_url {
            config = config.with_calendar_url(url);
        }

        AppState::new(oauth, backend, wiki, config)
    }

    fn test_bundle(token: &str) -> CredentialBundle {
        CredentialBundle {
            token: token.to_string(),
            refresh_token: Some("refresh-1".to_string()),
            token_uri: "https://oauth2.example.com/token".to_string(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
        }
    }

    fn workflow_event() -> EventRequest {
        EventRequest::timed(
            "Skill Daily Workflow",
            "Write the weekly report",
            "2025-03-01T09:00:00Z",
            "2025-03-01T10:00:00Z",
        )
    }

    #[tokio::test]
    async fn acquire_without_credentials_needs_authorization() {
        let state = test_state(None);
        let session = SessionId::generate();

        let access = acquire(&state, &session).await.unwrap();

        assert!(matches!(access, ClientAccess::NeedsAuthorization));
    }

    #[tokio::test]
    async fn acquire_is_idempotent_between_saves() {
        let state = test_state(None);
        let session = SessionId::generate();
        state
            .sessions
            .save_credentials(&session, test_bundle("access-1"))
            .await;

        let ClientAccess::Ready(first) = acquire(&state, &session).await.unwrap() else {
            panic!("expected stored credentials to yield a client");
        };
        let ClientAccess::Ready(second) = acquire(&state, &session).await.unwrap() else {
            panic!("expected stored credentials to yield a client");
        };

        assert_eq!(first.credentials(), second.credentials());
    }

    #[tokio::test]
    async fn create_event_persists_credentials_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt_1",
                "status": "confirmed"
            })))
            .mount(&server)
            .await;

        let state = test_state(Some(&server.uri()));
        let session = SessionId::generate();
        state
            .sessions
            .save_credentials(&session, test_bundle("access-1"))
            .await;

        let ClientAccess::Ready(client) = acquire(&state, &session).await.unwrap() else {
            panic!("expected stored credentials to yield a client");
        };

        let created = create_event(&state, &session, client, &workflow_event())
            .await
            .unwrap();

        assert_eq!(created.id, "evt_1");
        let stored = state.sessions.load_credentials(&session).await.unwrap();
        assert_eq!(stored.token, "access-1");
    }

    #[tokio::test]
    async fn failed_insert_leaves_stored_credentials_untouched() {
        let state = test_state(Some("http://127.0.0.1:1"));
        let session = SessionId::generate();
        let bundle = test_bundle("access-1");
        state.sessions.save_credentials(&session, bundle.clone()).await;

        let ClientAccess::Ready(client) = acquire(&state, &session).await.unwrap() else {
            panic!("expected stored credentials to yield a client");
        };

        let err = create_event(&state, &session, client, &workflow_event())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::CalendarUnreachable(_)));
        let stored = state.sessions.load_credentials(&session).await.unwrap();
        assert_eq!(stored, bundle);
    }
}
