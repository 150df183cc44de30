//! Google OAuth 2.0 authorization-code flow for Gwydion.
//!
//! Covers the full three-legged dance: building the consent URL (with
//! offline access and incremental consent), anti-forgery state handling,
//! exchanging the callback code for tokens, and refresh grants. The
//! [`CredentialBundle`] produced here is what sessions persist and what the
//! calendar client is reconstructed from.

pub mod credentials;
pub mod error;
pub mod oauth;
pub mod secrets;

pub use credentials::CredentialBundle;
pub use error::{OAuthError, Result};
pub use oauth::{
    AuthorizationRequest, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, OAuthConfig, TokenResponse,
    begin_authorization, build_authorization_url, complete_authorization,
    exchange_code_for_tokens, generate_state, refresh_access_token,
};
pub use secrets::ClientSecrets;
