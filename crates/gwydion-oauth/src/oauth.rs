//! OAuth 2.0 authorization-code flow against Google.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::credentials::CredentialBundle;
use crate::error::{OAuthError, Result};
use crate::secrets::ClientSecrets;

/// Google's OAuth consent endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default network timeout for provider calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth configuration for the authorization-code flow.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Build a config from parsed client secrets.
    pub fn from_secrets(secrets: ClientSecrets, redirect_uri: &str, scopes: Vec<String>) -> Self {
        Self {
            client_id: secrets.client_id,
            client_secret: secrets.client_secret,
            auth_url: secrets.auth_uri,
            token_url: secrets.token_uri,
            redirect_uri: redirect_uri.to_string(),
            scopes,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the consent endpoint (tests point this at a local server).
    pub fn with_auth_url(mut self, url: &str) -> Self {
        self.auth_url = url.to_string();
        self
    }

    /// Override the token endpoint.
    pub fn with_token_url(mut self, url: &str) -> Self {
        self.token_url = url.to_string();
        self
    }

    /// Override the network timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scopes as the space-delimited `scope` parameter value.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| OAuthError::Network(format!("failed to build HTTP client: {}", e)))
    }
}

/// An authorization attempt: the consent URL to redirect to, plus the
/// anti-forgery state that must round-trip through the callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Generate a random state string for CSRF protection.
pub fn generate_state() -> String {
    let mut state_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut state_bytes);
    URL_SAFE_NO_PAD.encode(state_bytes)
}

/// Build the consent-page URL for one authorization attempt.
///
/// Requests offline access so the provider issues a refresh token, and
/// incremental consent so previously granted scopes carry over.
pub fn build_authorization_url(config: &OAuthConfig, state: &str) -> String {
    let scope = config.scope_param();
    let params = [
        ("response_type", "code"),
        ("client_id", &config.client_id),
        ("redirect_uri", &config.redirect_uri),
        ("scope", &scope),
        ("access_type", "offline"),
        ("include_granted_scopes", "true"),
        ("state", state),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", config.auth_url, query)
}

/// Start an authorization attempt: fresh state plus the consent URL.
///
/// Any credentials the session already holds are none of this function's
/// business; re-authorization never clears an existing grant.
pub fn begin_authorization(config: &OAuthConfig) -> AuthorizationRequest {
    let state = generate_state();
    let url = build_authorization_url(config, &state);
    tracing::debug!(redirect_uri = %config.redirect_uri, "Authorization attempt started");
    AuthorizationRequest { url, state }
}

/// Token endpoint response for both exchange and refresh grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Finish an authorization attempt from the provider callback.
///
/// The state comparison happens before any token exchange: a forged
/// callback must never cause an exchange attempt.
pub async fn complete_authorization(
    config: &OAuthConfig,
    stored_state: Option<&str>,
    returned_state: &str,
    code: &str,
) -> Result<CredentialBundle> {
    let stored = stored_state.ok_or(OAuthError::FlowStateMissing)?;

    // Constant-time comparison; the state value is secret-adjacent.
    let state_matches: bool = stored.as_bytes().ct_eq(returned_state.as_bytes()).into();
    if !state_matches {
        tracing::warn!("Callback state does not match the stored authorization state");
        return Err(OAuthError::StateMismatch);
    }

    let tokens = exchange_code_for_tokens(config, code).await?;
    tracing::info!(
        has_refresh_token = tokens.refresh_token.is_some(),
        "Authorization code exchanged"
    );

    Ok(CredentialBundle::from_token_response(config, tokens))
}

/// Exchange an authorization code for tokens.
///
/// Every failure mode of the exchange (transport, provider rejection,
/// unparseable body) surfaces as [`OAuthError::TokenExchangeFailed`].
pub async fn exchange_code_for_tokens(config: &OAuthConfig, code: &str) -> Result<TokenResponse> {
    let params = [
        ("code", code),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let response = config
        .http_client()
        .map_err(|e| OAuthError::TokenExchangeFailed(e.to_string()))?
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed(format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(OAuthError::TokenExchangeFailed(format!(
            "{}: {}",
            status, error_text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed(format!("invalid token response: {}", e)))
}

/// Obtain a new access token with the bundle's refresh token.
///
/// Transport failures map to [`OAuthError::Network`]; a provider rejection
/// maps to [`OAuthError::TokenRefreshFailed`] so callers can tell a dead
/// network from a revoked grant.
pub async fn refresh_access_token(bundle: &CredentialBundle) -> Result<TokenResponse> {
    let refresh_token = bundle
        .refresh_token
        .as_deref()
        .ok_or_else(|| OAuthError::TokenRefreshFailed("no refresh token available".to_string()))?;

    let params = [
        ("client_id", bundle.client_id.as_str()),
        ("client_secret", bundle.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];

    let client = reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| OAuthError::Network(format!("failed to build HTTP client: {}", e)))?;

    let response = client
        .post(&bundle.token_uri)
        .form(&params)
        .send()
        .await
        .map_err(|e| OAuthError::Network(format!("refresh request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(OAuthError::TokenRefreshFailed(format!(
            "{}: {}",
            status, error_text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| OAuthError::TokenRefreshFailed(format!("invalid refresh response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            auth_url: "https://accounts.example.com/auth".to_string(),
            token_url: "https://oauth.example.com/token".to_string(),
            redirect_uri: "http://localhost:5000/api/callback".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_state_generation_is_unique() {
        let state1 = generate_state();
        let state2 = generate_state();
        assert!(!state1.is_empty());
        assert_ne!(state1, state2);
    }

    #[test]
    fn test_state_is_url_safe() {
        let state = generate_state();
        assert!(URL_SAFE_NO_PAD.decode(&state).is_ok());
        assert!(!state.contains('='));
    }

    #[test]
    fn test_authorization_url() {
        let config = test_config();
        let url = build_authorization_url(&config, "test_state");

        assert!(url.starts_with("https://accounts.example.com/auth?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("include_granted_scopes=true"));
        assert!(url.contains("state=test_state"));
        // Scope is percent-encoded.
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar"));
    }

    #[test]
    fn test_begin_authorization_embeds_fresh_state() {
        let config = test_config();
        let attempt = begin_authorization(&config);
        assert!(attempt.url.contains(&format!("state={}", attempt.state)));

        let second = begin_authorization(&config);
        assert_ne!(attempt.state, second.state);
    }

    #[tokio::test]
    async fn test_complete_authorization_without_stored_state() {
        let config = test_config();
        let err = complete_authorization(&config, None, "returned", "code")
            .await
            .unwrap_err();
        assert!(matches!(err, OAuthError::FlowStateMissing));
    }

    #[tokio::test]
    async fn test_complete_authorization_state_mismatch_skips_exchange() {
        let server = MockServer::start().await;
        let config = test_config().with_token_url(&format!("{}/token", server.uri()));

        let err = complete_authorization(&config, Some("xyz"), "abc", "code")
            .await
            .unwrap_err();
        assert!(matches!(err, OAuthError::StateMismatch));

        // The forged callback must not have reached the token endpoint.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_authorization_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let config = test_config().with_token_url(&format!("{}/token", server.uri()));
        let bundle = complete_authorization(&config, Some("abc"), "abc", "auth-code-1")
            .await
            .unwrap();

        assert_eq!(bundle.token, "access-1");
        assert_eq!(bundle.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(bundle.token_uri, format!("{}/token", server.uri()));
    }

    #[tokio::test]
    async fn test_exchange_rejection_carries_provider_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let config = test_config().with_token_url(&format!("{}/token", server.uri()));
        let err = exchange_code_for_tokens(&config, "expired-code")
            .await
            .unwrap_err();

        match err {
            OAuthError::TokenExchangeFailed(detail) => {
                assert!(detail.contains("invalid_grant"));
            }
            other => panic!("expected TokenExchangeFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exchange_network_failure() {
        // Nothing listens here.
        let config = test_config().with_token_url("http://127.0.0.1:1/token");
        let err = exchange_code_for_tokens(&config, "code").await.unwrap_err();
        assert!(matches!(err, OAuthError::TokenExchangeFailed(_)));
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-2",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;

        let config = test_config().with_token_url(&format!("{}/token", server.uri()));
        let mut bundle = CredentialBundle::from_token_response(
            &config,
            TokenResponse {
                access_token: "access-1".to_string(),
                refresh_token: Some("refresh-1".to_string()),
                expires_in: Some(3599),
                token_type: None,
                scope: None,
            },
        );

        let tokens = refresh_access_token(&bundle).await.unwrap();
        bundle.apply_refresh(tokens);

        assert_eq!(bundle.token, "access-2");
        assert_eq!(bundle.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let config = test_config();
        let bundle = CredentialBundle::from_token_response(
            &config,
            TokenResponse {
                access_token: "access-1".to_string(),
                refresh_token: None,
                expires_in: None,
                token_type: None,
                scope: None,
            },
        );

        let err = refresh_access_token(&bundle).await.unwrap_err();
        assert!(matches!(err, OAuthError::TokenRefreshFailed(_)));
    }

    #[tokio::test]
    async fn test_refresh_rejection_vs_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let config = test_config().with_token_url(&format!("{}/token", server.uri()));
        let make_bundle = |token_uri: String| CredentialBundle {
            token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            token_uri,
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            scopes: vec![],
        };

        let rejected = refresh_access_token(&make_bundle(config.token_url.clone()))
            .await
            .unwrap_err();
        assert!(matches!(rejected, OAuthError::TokenRefreshFailed(_)));

        let unreachable = refresh_access_token(&make_bundle("http://127.0.0.1:1/token".into()))
            .await
            .unwrap_err();
        assert!(matches!(unreachable, OAuthError::Network(_)));
    }
}
