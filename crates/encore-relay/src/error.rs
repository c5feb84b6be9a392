//! Error types for the relay.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while driving the authorization flow.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Callback arrived without the parameters or cookies the flow needs.
    #[error("Invalid request")]
    MalformedRequest {
        /// Extra detail surfaced to the caller, when there is any.
        description: Option<String>,
    },

    /// The user declined the provider's authorization prompt.
    #[error("access_denied")]
    ProviderDenied {
        /// Optional human-readable description from the provider.
        description: Option<String>,
    },

    /// The provider redirected back with an error other than `access_denied`.
    #[error("Provider error: {error}")]
    ProviderError {
        /// Raw error code from the provider.
        error: String,
        /// Optional human-readable description from the provider.
        description: Option<String>,
    },

    /// The token endpoint answered with a non-success status.
    #[error("Token exchange failed with status {status}")]
    ExchangeFailed {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Upstream response body, kept for logs and never echoed back.
        detail: String,
    },

    /// The token endpoint did not answer within the exchange timeout.
    #[error("Token exchange timed out")]
    ExchangeTimeout,

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RelayError::ExchangeTimeout
        } else {
            RelayError::Network(e.to_string())
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code or message.
    pub error: String,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: None,
        }
    }
}

/// Compose a provider error for the wire: `"{error}: {description}"` when a
/// description is present, the bare error code otherwise.
fn compose(error: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("{}: {}", error, description),
        None => error.to_string(),
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RelayError::MalformedRequest { description } => {
                tracing::warn!(detail = ?description, "Rejected malformed callback");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: "Invalid request".to_string(),
                        error_description: description.clone(),
                    },
                )
            }
            RelayError::ProviderDenied { description } => {
                tracing::debug!("User declined the authorization prompt");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(compose("access_denied", description.as_deref())),
                )
            }
            RelayError::ProviderError { error, description } => {
                tracing::info!(error = %error, "Provider returned an authorization error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(compose(error, description.as_deref())),
                )
            }
            RelayError::ExchangeFailed { status, detail } => {
                tracing::error!(upstream_status = status, detail = %detail, "Token exchange failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new("Token exchange failed"),
                )
            }
            RelayError::ExchangeTimeout => {
                tracing::error!("Token exchange timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorBody::new("Token exchange timed out"),
                )
            }
            RelayError::Network(msg) => {
                tracing::error!(error = %msg, "Token exchange transport failure");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new("Token exchange failed"),
                )
            }
            RelayError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
