//! Server configuration.

use std::net::SocketAddr;

/// Default browser origin allowed by CORS (the local frontend dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Browser origin allowed to call the `/api` routes.
    pub cors_origin: String,

    /// Enable per-request logging.
    pub request_logging: bool,

    /// Override for the calendar API base URL. `None` uses the live
    /// Google endpoint.
    pub calendar_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            request_logging: true,
            calendar_url: None,
        }
    }
}

impl ServerConfig {
    /// Create a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the browser origin allowed by CORS.
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Point calendar writes at a different API base URL.
    pub fn with_calendar_url(mut self, url: impl Into<String>) -> Self {
        self.calendar_url = Some(url.into());
        self
    }
}
