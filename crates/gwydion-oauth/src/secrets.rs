//! Client-secrets file parsing.
//!
//! Google's console hands out a JSON descriptor with the OAuth client
//! material nested under a `web` (or, for desktop apps, `installed`) key:
//!
//! ```json
//! {"web": {"client_id": "...", "client_secret": "...",
//!          "auth_uri": "...", "token_uri": "...",
//!          "redirect_uris": ["http://localhost:5000/api/callback"]}}
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{OAuthError, Result};
use crate::oauth::{GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL};

/// OAuth client material loaded from a client-secrets file.
#[derive(Debug, Clone)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    /// Redirect URIs registered with the provider, in file order.
    pub redirect_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    web: Option<SecretsEntry>,
    installed: Option<SecretsEntry>,
}

#[derive(Debug, Deserialize)]
struct SecretsEntry {
    client_id: String,
    client_secret: String,
    #[serde(default = "default_auth_uri")]
    auth_uri: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl ClientSecrets {
    /// Parse a client-secrets JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(json)
            .map_err(|e| OAuthError::Config(format!("failed to parse client secrets: {}", e)))?;

        let entry = file.web.or(file.installed).ok_or_else(|| {
            OAuthError::Config("expected a 'web' or 'installed' key".to_string())
        })?;

        if entry.client_id.is_empty() {
            return Err(OAuthError::Config("client_id is empty".to_string()));
        }

        Ok(Self {
            client_id: entry.client_id,
            client_secret: entry.client_secret,
            auth_uri: entry.auth_uri,
            token_uri: entry.token_uri,
            redirect_uris: entry.redirect_uris,
        })
    }

    /// Load and parse a client-secrets file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            OAuthError::Config(format!(
                "failed to read client secrets '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&contents)
    }
}
