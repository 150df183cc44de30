//! Google Calendar v3 client with transparent token refresh.

use std::time::Duration;

use reqwest::StatusCode;

use gwydion_oauth::{CredentialBundle, refresh_access_token};

use crate::error::{CalendarError, Result};
use crate::types::{Event, EventRequest};

/// Google Calendar API base URL.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default network timeout for calendar calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A calendar client bound to one credential bundle.
///
/// The bundle is owned, not borrowed: a rejected access token triggers one
/// refresh-and-retry, and the refreshed token is installed in place. Callers
/// that persist credentials read [`CalendarClient::credentials`] after a
/// successful write.
#[derive(Debug)]
pub struct CalendarClient {
    http_client: reqwest::Client,
    base_url: String,
    bundle: CredentialBundle,
}

impl CalendarClient {
    /// Build a client with the default timeout.
    pub fn new(bundle: CredentialBundle) -> Result<Self> {
        Self::with_timeout(bundle, DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit network timeout.
    pub fn with_timeout(bundle: CredentialBundle, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CalendarError::Unreachable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url: CALENDAR_API_BASE.to_string(),
            bundle,
        })
    }

    /// Override the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Current credential snapshot, including any token installed by a
    /// silent refresh.
    pub fn credentials(&self) -> &CredentialBundle {
        &self.bundle
    }

    /// Insert an event into the named calendar.
    ///
    /// A 401 on the first attempt refreshes the access token and retries
    /// exactly once; a second rejection is reported, never retried again.
    /// A failed refresh leaves the bundle untouched.
    pub async fn insert_event(&mut self, calendar_id: &str, event: &EventRequest) -> Result<Event> {
        let mut response = self.send_insert(calendar_id, event).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.bundle.refresh_token.is_some() {
            tracing::debug!(calendar_id = %calendar_id, "Access token rejected, refreshing");
            let tokens = refresh_access_token(&self.bundle).await?;
            self.bundle.apply_refresh(tokens);
            tracing::info!("Access token refreshed");
            response = self.send_insert(calendar_id, event).await?;
        }

        Self::read_event(response).await
    }

    async fn send_insert(
        &self,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<reqwest::Response> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        self.http_client
            .post(&url)
            .bearer_auth(&self.bundle.token)
            .json(event)
            .send()
            .await
            .map_err(transport_error)
    }

    async fn read_event(response: reqwest::Response) -> Result<Event> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| CalendarError::WriteFailed(format!("invalid API response: {}", e)));
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(CalendarError::WriteFailed(
                "authentication failed (401): access token rejected".to_string(),
            )),
            StatusCode::FORBIDDEN => {
                let body = read_body(response).await;
                Err(CalendarError::WriteFailed(format!(
                    "access denied (403): {}",
                    body
                )))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                Err(CalendarError::WriteFailed(format!(
                    "rate limited (429), retry after: {}",
                    retry_after
                )))
            }
            _ => {
                let body = read_body(response).await;
                Err(CalendarError::WriteFailed(format!(
                    "API error ({}): {}",
                    status, body
                )))
            }
        }
    }
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}

fn transport_error(e: reqwest::Error) -> CalendarError {
    if e.is_timeout() {
        CalendarError::Unreachable("request timeout".to_string())
    } else if e.is_connect() {
        CalendarError::Unreachable(format!("connection failed: {}", e))
    } else {
        CalendarError::Unreachable(format!("request failed: {}", e))
    }
}
