//! Per-browser session state.
//!
//! Sessions are keyed by an opaque cookie value. Each one holds at most an
//! in-flight authorization state and a credential bundle. The store is
//! process-local; restarting the server forgets every session.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use gwydion_oauth::CredentialBundle;

/// Opaque identifier tying a browser to its server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an incoming cookie value.
    pub fn from_cookie(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw cookie value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State attached to one session.
#[derive(Debug, Default)]
struct Session {
    /// Anti-forgery state for an authorization attempt in flight.
    auth_state: Option<String>,

    /// Credentials from a completed authorization.
    credentials: Option<CredentialBundle>,
}

/// Concurrent map from session id to session state.
///
/// Cloning the store shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stash the anti-forgery state for an authorization attempt, replacing
    /// any earlier one for the same session.
    pub async fn set_auth_state(&self, session: &SessionId, state: String) {
        let mut sessions = self.inner.write().await;
        sessions.entry(session.clone()).or_default().auth_state = Some(state);
    }

    /// Remove and return the stored anti-forgery state.
    ///
    /// The state is single-use: a second call returns `None`, so a replayed
    /// callback cannot match twice.
    pub async fn take_auth_state(&self, session: &SessionId) -> Option<String> {
        let mut sessions = self.inner.write().await;
        sessions
            .get_mut(session)
            .and_then(|entry| entry.auth_state.take())
    }

    /// Store credentials for a session, replacing any earlier bundle.
    pub async fn save_credentials(&self, session: &SessionId, bundle: CredentialBundle) {
        let mut sessions = self.inner.write().await;
        sessions.entry(session.clone()).or_default().credentials = Some(bundle);
    }

    /// Clone out the credentials stored for a session, if any.
    pub async fn load_credentials(&self, session: &SessionId) -> Option<CredentialBundle> {
        let sessions = self.inner.read().await;
        sessions
            .get(session)
            .and_then(|entry| entry.credentials.clone())
    }

    /// Drop the credentials stored for a session.
    ///
    /// Logout support. Any in-flight authorization state survives, so a
    /// consent dance already underway can still complete.
    pub async fn clear_credentials(&self, session: &SessionId) {
        let mut sessions = self.inner.write().await;
        if let Some(entry) = sessions.get_mut(session) {
            entry.credentials = None;
        }
    }
}
