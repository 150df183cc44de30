//! Wikipedia page-summary client.
//!
//! Talks to the REST `page/summary` endpoint, which returns the lead-section
//! extract for a title or 404 when no such page exists.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{ContentError, Result};

/// English Wikipedia REST API base URL.
pub const WIKIPEDIA_API_BASE: &str = "https://en.wikipedia.org/api/rest_v1";

/// Wikipedia requires a descriptive User-Agent from API consumers.
const USER_AGENT: &str = "Gwydion/0.1 (https://github.com/dstorey/gwydion)";

/// Default network timeout for lookups.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for Wikipedia page-summary lookups.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

impl WikiClient {
    /// Client against English Wikipedia.
    pub fn new() -> Result<Self> {
        Self::for_language("en")
    }

    /// Client against the given language edition.
    pub fn for_language(language: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ContentError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("https://{}.wikipedia.org/api/rest_v1", language),
        })
    }

    /// Override the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch the summary extract for a page title.
    ///
    /// Returns [`ContentError::PageNotFound`] when the title resolves to no
    /// page, which callers surface as a 404 rather than a server fault.
    pub async fn page_summary(&self, title: &str) -> Result<String> {
        // The REST API addresses pages with underscores for spaces.
        let normalized = title.trim().replace(' ', "_");
        let url = format!(
            "{}/page/summary/{}",
            self.base_url,
            urlencoding::encode(&normalized)
        );

        tracing::debug!(title = %title, "Looking up Wikipedia summary");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ContentError::PageNotFound),
            status if status.is_success() => {
                let page: PageSummary = response.json().await.map_err(|e| {
                    ContentError::Upstream(format!("invalid summary body: {}", e))
                })?;
                Ok(page.extract)
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(ContentError::Upstream(format!(
                    "API error ({}): {}",
                    status, body
                )))
            }
        }
    }
}

fn transport_error(e: reqwest::Error) -> ContentError {
    if e.is_timeout() {
        ContentError::Network("request timeout".to_string())
    } else if e.is_connect() {
        ContentError::Network(format!("connection failed: {}", e))
    } else {
        ContentError::Network(format!("request failed: {}", e))
    }
}
