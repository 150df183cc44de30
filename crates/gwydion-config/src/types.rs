//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [server]                 # bind address, redirect URI, CORS origin
//! [google]                 # client secrets path, scopes, endpoint overrides
//! [openai]                 # completion backend settings
//! [wikipedia]              # summary lookup settings
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Env var consulted when `google.client_secrets_file` is unset.
pub const GOOGLE_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Env var consulted when `openai.api_key` is unset.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Maps to the full TOML config file. All sections are optional so that
/// partial configs (e.g., project-local overrides) can be loaded and merged;
/// the section accessors fill in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GwydionConfig {
    /// HTTP server configuration.
    pub server: Option<ServerSection>,

    /// Google OAuth and Calendar configuration.
    pub google: Option<GoogleSection>,

    /// Completion backend configuration.
    pub openai: Option<OpenAiSection>,

    /// Wikipedia lookup configuration.
    pub wikipedia: Option<WikipediaSection>,
}

impl GwydionConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: GwydionConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }

        if other.google.is_some() {
            self.google = other.google;
        }

        if other.openai.is_some() {
            self.openai = other.openai;
        }

        if other.wikipedia.is_some() {
            self.wikipedia = other.wikipedia;
        }
    }

    /// Server section with defaults filled in.
    pub fn server(&self) -> ServerSection {
        self.server.clone().unwrap_or_default()
    }

    /// Google section with defaults filled in.
    pub fn google(&self) -> GoogleSection {
        self.google.clone().unwrap_or_default()
    }

    /// OpenAI section with defaults filled in.
    pub fn openai(&self) -> OpenAiSection {
        self.openai.clone().unwrap_or_default()
    }

    /// Wikipedia section with defaults filled in.
    pub fn wikipedia(&self) -> WikipediaSection {
        self.wikipedia.clone().unwrap_or_default()
    }

    /// Resolve the Google client-secrets file path.
    ///
    /// Resolution order: config file → `GOOGLE_APPLICATION_CREDENTIALS` env var.
    pub fn client_secrets_path(&self) -> crate::Result<PathBuf> {
        if let Some(ref google) = self.google
            && let Some(ref path) = google.client_secrets_file
        {
            return Ok(path.clone());
        }

        if let Ok(path) = std::env::var(GOOGLE_CREDENTIALS_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        Err(crate::ConfigError::MissingField {
            field: "client_secrets_file".to_string(),
            context: format!("[google] (or {} env var)", GOOGLE_CREDENTIALS_ENV),
        })
    }

    /// Resolve the completion backend API key.
    ///
    /// Resolution order: config file → `OPENAI_API_KEY` env var.
    pub fn openai_api_key(&self) -> crate::Result<String> {
        if let Some(ref openai) = self.openai
            && let Some(ref key) = openai.api_key
            && !key.is_empty()
        {
            return Ok(key.clone());
        }

        if let Ok(key) = std::env::var(OPENAI_API_KEY_ENV)
            && !key.is_empty()
        {
            return Ok(key);
        }

        Err(crate::ConfigError::ApiKeyNotFound {
            env_var: OPENAI_API_KEY_ENV.to_string(),
        })
    }

    /// Whether the openai section carries a plaintext API key.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.openai
            .as_ref()
            .and_then(|o| o.api_key.as_ref())
            .is_some_and(|k| !k.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// `[server]`: bind address and web-facing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// OAuth redirect URI registered with the provider.
    pub redirect_uri: String,

    /// Origin allowed by the CORS layer on `/api` routes.
    pub cors_origin: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            redirect_uri: "http://localhost:5000/api/callback".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerSection {
    /// Bind address as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[google]`: OAuth client material and API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSection {
    /// Path to the client-secrets JSON downloaded from the Google console.
    /// Falls back to the `GOOGLE_APPLICATION_CREDENTIALS` env var.
    pub client_secrets_file: Option<PathBuf>,

    /// OAuth scopes requested at authorization time.
    pub scopes: Vec<String>,

    /// Authorization endpoint override (tests point this at a local server).
    pub auth_url: Option<String>,

    /// Token endpoint override.
    pub token_url: Option<String>,

    /// Calendar API base URL override.
    pub calendar_url: Option<String>,
}

impl Default for GoogleSection {
    fn default() -> Self {
        Self {
            client_secrets_file: None,
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            auth_url: None,
            token_url: None,
            calendar_url: None,
        }
    }
}

/// `[openai]`: completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSection {
    /// API key. Falls back to the `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,

    /// API base URL override.
    pub base_url: Option<String>,

    /// Model used for all completion endpoints.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

/// `[wikipedia]`: summary lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaSection {
    /// REST API base URL override.
    pub base_url: Option<String>,

    /// Wikipedia language edition.
    pub language: String,
}

impl Default for WikipediaSection {
    fn default() -> Self {
        Self {
            base_url: None,
            language: "en".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_defaults() {
        let config = GwydionConfig::from_toml("").unwrap();
        assert_eq!(config.server().port, 5000);
        assert_eq!(config.server().bind_address(), "127.0.0.1:5000");
        assert_eq!(
            config.google().scopes,
            vec!["https://www.googleapis.com/auth/calendar".to_string()]
        );
        assert_eq!(config.openai().model, "gpt-4o-mini");
        assert_eq!(config.wikipedia().language, "en");
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config = GwydionConfig::from_toml(
            r#"
[server]
port = 8080
"#,
        )
        .unwrap();
        let server = config.server();
        assert_eq!(server.port, 8080);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn test_merge_section_override() {
        let mut base = GwydionConfig::from_toml(
            r#"
[server]
port = 5000

[openai]
model = "base-model"
"#,
        )
        .unwrap();

        let overlay = GwydionConfig::from_toml(
            r#"
[openai]
model = "overlay-model"
"#,
        )
        .unwrap();

        base.merge(overlay);
        assert_eq!(base.openai().model, "overlay-model");
        // Overlay did not carry a [server] section, so base survives.
        assert_eq!(base.server().port, 5000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GwydionConfig::from_toml(
            r#"
[google]
client_secrets_file = "/etc/gwydion/secrets.json"
scopes = ["https://www.googleapis.com/auth/calendar"]
"#,
        )
        .unwrap();

        let serialized = config.to_toml().unwrap();
        let reparsed = GwydionConfig::from_toml(&serialized).unwrap();
        assert_eq!(
            reparsed.google().client_secrets_file,
            Some(PathBuf::from("/etc/gwydion/secrets.json"))
        );
    }

    #[test]
    fn test_client_secrets_path_from_config() {
        let config = GwydionConfig::from_toml(
            r#"
[google]
client_secrets_file = "/tmp/secrets.json"
"#,
        )
        .unwrap();
        assert_eq!(
            config.client_secrets_path().unwrap(),
            PathBuf::from("/tmp/secrets.json")
        );
    }

    #[test]
    fn test_client_secrets_path_missing() {
        // Only meaningful when the env var is not set in the environment.
        if std::env::var(GOOGLE_CREDENTIALS_ENV).is_ok() {
            return;
        }
        let config = GwydionConfig::new();
        let err = config.client_secrets_path().unwrap_err();
        assert!(matches!(err, crate::ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_api_key_from_config() {
        let config = GwydionConfig::from_toml(
            r#"
[openai]
api_key = "sk-test"
"#,
        )
        .unwrap();
        assert_eq!(config.openai_api_key().unwrap(), "sk-test");
        assert!(config.has_plaintext_api_key());
    }
}
