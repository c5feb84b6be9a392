//! HTTP server for the OAuth relay.
//!
//! Issues the authorization redirect, receives the provider's callback, and
//! renders the exchanged refresh token. The pending authorization context
//! lives entirely in short-lived cookies, so the server holds no per-flow
//! state between the two requests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ClientIdSource, RelayConfig};
use crate::cookie;
use crate::error::RelayError;
use crate::flow::{self, CallbackOutcome, CallbackParams};
use crate::pages;
use crate::pkce::PkcePair;
use crate::spotify::{SharedTokenExchange, SpotifyClient};

/// Shared state for the relay server.
pub struct RelayState {
    config: RelayConfig,
    exchange: SharedTokenExchange,
}

/// The OAuth relay server.
pub struct RelayServer {
    state: Arc<RelayState>,
}

impl RelayServer {
    /// Create a server backed by the real Spotify token endpoint.
    pub fn new(config: RelayConfig) -> Self {
        let exchange = Arc::new(SpotifyClient::with_token_url(config.token_url.clone()));
        Self::with_exchange(config, exchange)
    }

    /// Create a server with a custom token exchange implementation.
    pub fn with_exchange(config: RelayConfig, exchange: SharedTokenExchange) -> Self {
        Self {
            state: Arc::new(RelayState { config, exchange }),
        }
    }

    /// Build the axum router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            .route("/oauth/spotify/extension/redirect", get(handle_redirect))
            .route("/oauth/spotify/extension/callback", get(handle_callback))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                request_logging_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the relay server.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.state.config.bind_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Starting OAuth relay server");
        axum::serve(listener, self.router()).await
    }

    /// Run with graceful shutdown, returning the bound address.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.state.config.bind_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Starting OAuth relay server");
        tokio::spawn(async move {
            axum::serve(listener, self.router())
                .with_graceful_shutdown(shutdown)
                .await
                .ok();
        });
        Ok(local_addr)
    }
}

/// Handle GET /health
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Query parameters for the redirect-out endpoint.
#[derive(Debug, Deserialize)]
struct RedirectParams {
    client_id: Option<String>,
}

/// Handle GET /oauth/spotify/extension/redirect
///
/// Starts an authorization: generates a fresh PKCE pair, stashes the
/// verifier (and, in caller-supplied mode, the client id) in cookies, and
/// sends the browser to the provider's consent page with a 302.
async fn handle_redirect(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<RedirectParams>,
) -> Response {
    let config = &state.config;
    let pkce = PkcePair::generate();

    let (client_id, stash_client_id) = match config.client_id_source {
        ClientIdSource::Fixed => (config.client_id.clone(), false),
        ClientIdSource::CallerSupplied => (
            params
                .client_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| config.client_id.clone()),
            true,
        ),
    };

    let authorize_url = flow::build_authorization_url(
        &config.authorize_url,
        &client_id,
        &config.callback_url(),
        &pkce.challenge,
        &config.scope(),
    );

    tracing::debug!(client_id = %client_id, "Issued authorization redirect");

    let mut cookies = vec![(
        header::SET_COOKIE,
        cookie::set(cookie::VERIFIER_COOKIE, &pkce.verifier),
    )];
    if stash_client_id {
        cookies.push((
            header::SET_COOKIE,
            cookie::set(cookie::CLIENT_ID_COOKIE, &client_id),
        ));
    }

    (
        StatusCode::FOUND,
        [(header::LOCATION, authorize_url)],
        AppendHeaders(cookies),
    )
        .into_response()
}

/// Handle GET /oauth/spotify/extension/callback
///
/// Finishes an authorization: classifies the provider's response, recovers
/// the pending context from cookies, exchanges the code, and renders the
/// refresh token page.
async fn handle_callback(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Result<Response, RelayError> {
    let config = &state.config;

    let client_id = match config.client_id_source {
        ClientIdSource::Fixed => config.client_id.clone(),
        ClientIdSource::CallerSupplied => {
            match cookie::get(&headers, cookie::CLIENT_ID_COOKIE) {
                Some(id) => id,
                None => {
                    return Err(RelayError::MalformedRequest {
                        description: Some("Missing client_id cookie".to_string()),
                    });
                }
            }
        }
    };

    let code = match params.into_outcome() {
        CallbackOutcome::Success { code } => code,
        CallbackOutcome::Denied { description } => {
            return Ok(clear_verifier(RelayError::ProviderDenied { description }));
        }
        CallbackOutcome::ProviderError { error, description } => {
            return Ok(clear_verifier(RelayError::ProviderError {
                error,
                description,
            }));
        }
        CallbackOutcome::MalformedRequest => {
            return Err(RelayError::MalformedRequest { description: None });
        }
    };

    let verifier = cookie::get(&headers, cookie::VERIFIER_COOKIE)
        .ok_or(RelayError::MalformedRequest { description: None })?;

    let token = state
        .exchange
        .exchange_code_for_token(&config.callback_url(), &code, &verifier, &client_id)
        .await?;

    tracing::debug!("Exchanged authorization code for tokens");

    let page = pages::extension_token_page(token.refresh_token.as_deref());
    Ok(Html(page).into_response())
}

/// Attach a verifier-clearing cookie to an error response.
fn clear_verifier(err: RelayError) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, cookie::clear(cookie::VERIFIER_COOKIE))]),
        err,
    )
        .into_response()
}

/// Structured request logging middleware.
///
/// Logs method, path, status, and duration for every request. Server errors
/// log at error; everything else logs at info. Denied and malformed
/// callbacks surface as 4xx and stay out of the warning stream.
async fn request_logging_middleware(
    State(state): State<Arc<RelayState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        tracing::info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}
