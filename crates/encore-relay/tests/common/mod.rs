//! Common test utilities for relay integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::{
    Form, Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use reqwest::Client;
use tokio::sync::oneshot;
use tokio::time::timeout;

use encore_relay::{RelayConfig, RelayServer};

/// A stub Spotify token endpoint running in the background.
///
/// Records every urlencoded exchange body it receives so tests can assert
/// on the forwarded code, verifier, and client id.
pub struct StubSpotify {
    /// Token URL to point the relay at.
    pub token_url: String,
    exchanges: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

struct StubState {
    exchanges: Arc<Mutex<Vec<HashMap<String, String>>>>,
    response: StubResponse,
}

enum StubResponse {
    Token { refresh_token: &'static str },
    Failure { status: u16, body: &'static str },
}

impl StubSpotify {
    /// Start a stub that exchanges every code for the given refresh token.
    pub async fn start(refresh_token: &'static str) -> Result<Self> {
        Self::start_with(StubResponse::Token { refresh_token }).await
    }

    /// Start a stub that rejects every exchange with the given status.
    pub async fn start_failing(status: u16, body: &'static str) -> Result<Self> {
        Self::start_with(StubResponse::Failure { status, body }).await
    }

    async fn start_with(response: StubResponse) -> Result<Self> {
        let exchanges = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            exchanges: exchanges.clone(),
            response,
        });

        let router = Router::new()
            .route("/api/token", post(handle_token))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            token_url: format!("http://{}/api/token", addr),
            exchanges,
        })
    }

    /// Exchange bodies received so far.
    pub fn exchanges(&self) -> Vec<HashMap<String, String>> {
        self.exchanges.lock().unwrap().clone()
    }
}

async fn handle_token(
    State(state): State<Arc<StubState>>,
    Form(body): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    state.exchanges.lock().unwrap().push(body);

    match &state.response {
        StubResponse::Token { refresh_token } => (
            StatusCode::OK,
            Json(serde_json::json!({
                "access_token": "stub-access-token",
                "expires_in": 3600,
                "refresh_token": refresh_token,
                "scope": "user-modify-playback-state user-read-playback-state",
                "token_type": "Bearer",
            })),
        )
            .into_response(),
        StubResponse::Failure { status, body } => {
            (StatusCode::from_u16(*status).unwrap(), body.to_string()).into_response()
        }
    }
}

/// A relay server running in the background for tests.
pub struct TestRelay {
    /// The relay's bound address.
    pub addr: SocketAddr,
    /// HTTP client that does not follow redirects, so tests can inspect
    /// the provider redirect itself.
    pub client: Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestRelay {
    /// Start a relay pointed at the given token endpoint.
    pub async fn start(token_url: &str) -> Result<Self> {
        Self::start_with_config(RelayConfig::default().with_token_url(token_url)).await
    }

    /// Start a relay with a custom configuration.
    pub async fn start_with_config(config: RelayConfig) -> Result<Self> {
        let config = config
            .with_bind_address("127.0.0.1:0".parse()?)
            .with_request_logging(false);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let addr = RelayServer::new(config)
            .run_with_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await?;

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            _shutdown: shutdown_tx,
        })
    }

    /// Get the base URL for the relay.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a request builder for a relay path.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url(), path))
    }
}

/// Wait for the relay to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(_) => anyhow::bail!("Timeout waiting for relay to start"),
    }
}

/// Collect `Set-Cookie` values for the named cookie.
pub fn set_cookies(response: &reqwest::Response, name: &str) -> Vec<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// The value part of a `Set-Cookie` header.
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

/// The raw value of a query parameter in a URL.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
