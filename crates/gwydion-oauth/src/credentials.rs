//! The credential bundle persisted per session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::oauth::{OAuthConfig, TokenResponse};

/// Everything needed to reconstruct an authenticated calendar client.
///
/// Field names are part of the session wire format and must not change:
/// the bundle serializes as `{token, refresh_token, token_uri, client_id,
/// client_secret, scopes}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    /// Short-lived access token.
    pub token: String,

    /// Long-lived refresh token. Absent when the provider withheld one
    /// (e.g., a repeat consent without `prompt=consent`).
    pub refresh_token: Option<String>,

    /// Token endpoint used for refresh grants.
    pub token_uri: String,

    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,

    /// Scopes granted with this bundle, in provider order.
    pub scopes: Vec<String>,
}

impl CredentialBundle {
    /// Build a bundle from a token-exchange response.
    ///
    /// The granted scope set comes from the provider when it echoes one
    /// back, otherwise from the scopes we asked for.
    pub fn from_token_response(config: &OAuthConfig, tokens: TokenResponse) -> Self {
        let scopes = match tokens.scope {
            Some(ref granted) if !granted.is_empty() => {
                granted.split_whitespace().map(str::to_string).collect()
            }
            _ => config.scopes.clone(),
        };

        Self {
            token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_uri: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes,
        }
    }

    /// Install a refresh response.
    ///
    /// Refresh responses routinely omit the refresh token; the stored one
    /// must survive verbatim in that case.
    pub fn apply_refresh(&mut self, tokens: TokenResponse) {
        self.token = tokens.access_token;
        if let Some(refresh) = tokens.refresh_token {
            self.refresh_token = Some(refresh);
        }
    }
}

// Token material and the client secret stay out of logs.
impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            auth_url: "https://accounts.example.com/auth".to_string(),
            token_url: "https://oauth.example.com/token".to_string(),
            redirect_uri: "http://localhost:5000/api/callback".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            timeout: std::time::Duration::from_secs(5),
        }
    }

    fn token_response(access: &str, refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in: Some(3599),
            token_type: Some("Bearer".to_string()),
            scope: None,
        }
    }

    #[test]
    fn test_bundle_from_token_response() {
        let bundle = CredentialBundle::from_token_response(
            &test_config(),
            token_response("access-1", Some("refresh-1")),
        );
        assert_eq!(bundle.token, "access-1");
        assert_eq!(bundle.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(bundle.token_uri, "https://oauth.example.com/token");
        assert_eq!(bundle.client_id, "client-id");
        assert_eq!(
            bundle.scopes,
            vec!["https://www.googleapis.com/auth/calendar".to_string()]
        );
    }

    #[test]
    fn test_bundle_uses_granted_scopes_when_echoed() {
        let mut tokens = token_response("access-1", None);
        tokens.scope = Some("scope-a scope-b".to_string());
        let bundle = CredentialBundle::from_token_response(&test_config(), tokens);
        assert_eq!(bundle.scopes, vec!["scope-a", "scope-b"]);
    }

    #[test]
    fn test_apply_refresh_replaces_access_token() {
        let mut bundle = CredentialBundle::from_token_response(
            &test_config(),
            token_response("old-access", Some("refresh-1")),
        );
        bundle.apply_refresh(token_response("new-access", Some("refresh-2")));
        assert_eq!(bundle.token, "new-access");
        assert_eq!(bundle.refresh_token.as_deref(), Some("refresh-2"));
    }

    #[test]
    fn test_apply_refresh_preserves_missing_refresh_token() {
        let mut bundle = CredentialBundle::from_token_response(
            &test_config(),
            token_response("old-access", Some("refresh-1")),
        );
        bundle.apply_refresh(token_response("new-access", None));
        assert_eq!(bundle.token, "new-access");
        // The refresh response omitted a refresh token; the stored one stays.
        assert_eq!(bundle.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_serde_field_names_are_stable() {
        let bundle = CredentialBundle::from_token_response(
            &test_config(),
            token_response("access-1", Some("refresh-1")),
        );
        let value = serde_json::to_value(&bundle).unwrap();
        for key in [
            "token",
            "refresh_token",
            "token_uri",
            "client_id",
            "client_secret",
            "scopes",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_round_trip_preserves_absent_refresh_token() {
        let bundle =
            CredentialBundle::from_token_response(&test_config(), token_response("access", None));
        let json = serde_json::to_string(&bundle).unwrap();
        let back: CredentialBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bundle);
        assert!(back.refresh_token.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let bundle = CredentialBundle::from_token_response(
            &test_config(),
            token_response("very-secret-access", Some("very-secret-refresh")),
        );
        let rendered = format!("{:?}", bundle);
        assert!(!rendered.contains("very-secret-access"));
        assert!(!rendered.contains("very-secret-refresh"));
        assert!(!rendered.contains("client-secret"));
        assert!(rendered.contains("client-id"));
    }
}
