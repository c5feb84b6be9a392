//! Spotify token endpoint client.
//!
//! Exchanges the authorization code for tokens over a server-to-server call.
//! The exchange sits behind a trait so the server can run against a stub
//! endpoint in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{RelayError, Result};

/// Spotify's production token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Upper bound on a single token exchange round-trip.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Granted scopes arrive as either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scope {
    Single(String),
    List(Vec<String>),
}

/// Tokens returned from the authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub scope: Scope,
    pub token_type: String,
}

/// Boundary for exchanging an authorization code for tokens.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange an authorization code for tokens via the PKCE grant.
    async fn exchange_code_for_token(
        &self,
        redirect_uri: &str,
        code: &str,
        verifier: &str,
        client_id: &str,
    ) -> Result<OAuthToken>;
}

/// Shared exchange client for use across handlers.
pub type SharedTokenExchange = Arc<dyn TokenExchange>;

/// HTTP client for Spotify's token endpoint.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    token_url: String,
}

impl SpotifyClient {
    /// Create a client against the production token endpoint.
    pub fn new() -> Self {
        Self::with_token_url(DEFAULT_TOKEN_URL)
    }

    /// Create a client against a custom token endpoint.
    pub fn with_token_url(token_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
        }
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenExchange for SpotifyClient {
    async fn exchange_code_for_token(
        &self,
        redirect_uri: &str,
        code: &str,
        verifier: &str,
        client_id: &str,
    ) -> Result<OAuthToken> {
        let form = [
            ("client_id", client_id),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
            ("code_verifier", verifier),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .timeout(EXCHANGE_TIMEOUT)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RelayError::ExchangeFailed {
                status: status.as_u16(),
                detail,
            });
        }

        let token: OAuthToken =
            response
                .json()
                .await
                .map_err(|e| RelayError::ExchangeFailed {
                    status: status.as_u16(),
                    detail: format!("Failed to parse token response: {}", e),
                })?;

        Ok(token)
    }
}
