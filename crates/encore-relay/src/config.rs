//! Relay configuration.

use std::net::SocketAddr;

use crate::spotify::DEFAULT_TOKEN_URL;

/// Default client id registered for the extension.
pub const DEFAULT_CLIENT_ID: &str = "c47877614f4e4632b293a40fe7a260e2";

/// Default public host the provider redirects back to.
pub const DEFAULT_REDIRECT_HOST: &str = "http://localhost:3000";

/// Spotify's authorization endpoint.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Path the provider redirects back to after the consent prompt.
pub const CALLBACK_PATH: &str = "/oauth/spotify/extension/callback";

/// How the client id for an authorization is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIdSource {
    /// Always the configured id; a `client_id` query parameter is ignored.
    Fixed,
    /// The caller's `client_id` query parameter, falling back to the
    /// configured id when absent. The id is forwarded verbatim.
    CallerSupplied,
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Public host the provider redirects back to, scheme included.
    pub redirect_host: String,

    /// Client id used when the caller does not supply one.
    pub client_id: String,

    /// How the per-authorization client id is resolved.
    pub client_id_source: ClientIdSource,

    /// Scopes requested from the provider.
    pub scopes: Vec<String>,

    /// Provider authorization endpoint.
    pub authorize_url: String,

    /// Provider token endpoint.
    pub token_url: String,

    /// Enable request logging.
    pub request_logging: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".parse().unwrap(),
            redirect_host: DEFAULT_REDIRECT_HOST.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_id_source: ClientIdSource::Fixed,
            scopes: vec![
                "user-modify-playback-state".to_string(),
                "user-read-playback-state".to_string(),
            ],
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_logging: true,
        }
    }
}

impl RelayConfig {
    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the public redirect host.
    pub fn with_redirect_host(mut self, host: impl Into<String>) -> Self {
        self.redirect_host = host.into();
        self
    }

    /// Set the fallback client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set how the per-authorization client id is resolved.
    pub fn with_client_id_source(mut self, source: ClientIdSource) -> Self {
        self.client_id_source = source;
        self
    }

    /// Set the requested scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Set the provider authorization endpoint.
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// Set the provider token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// The callback URL the provider redirects back to.
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.redirect_host, CALLBACK_PATH)
    }

    /// Scopes joined for the authorization request.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}
