//! Authorization flow plumbing: provider URL construction and callback
//! classification. Pure functions, no I/O.

use serde::Deserialize;

/// Build the provider authorization URL for a redirect-out.
///
/// `scope` is the space-joined scope list; every value is percent-encoded.
pub fn build_authorization_url(
    authorize_url: &str,
    client_id: &str,
    redirect_uri: &str,
    challenge: &str,
    scope: &str,
) -> String {
    let params = [
        ("response_type", "code"),
        ("client_id", client_id),
        ("redirect_uri", redirect_uri),
        ("code_challenge", challenge),
        ("code_challenge_method", "S256"),
        ("scope", scope),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", authorize_url, query)
}

/// Query parameters the provider sends to the callback endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// What a callback request means for the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The provider granted an authorization code.
    Success { code: String },
    /// The user declined the authorization prompt (`error=access_denied`).
    Denied { description: Option<String> },
    /// The provider reported any other error.
    ProviderError {
        error: String,
        description: Option<String>,
    },
    /// Neither a code nor an error arrived.
    MalformedRequest,
}

impl CallbackParams {
    /// Classify the callback query. An `error` wins over a `code` when the
    /// provider sends both; empty-string values count as absent.
    pub fn into_outcome(self) -> CallbackOutcome {
        let code = self.code.filter(|code| !code.is_empty());
        let error = self.error.filter(|error| !error.is_empty());
        let description = self.error_description.filter(|d| !d.is_empty());

        if let Some(error) = error {
            return if error == "access_denied" {
                CallbackOutcome::Denied { description }
            } else {
                CallbackOutcome::ProviderError { error, description }
            };
        }

        match code {
            Some(code) => CallbackOutcome::Success { code },
            None => CallbackOutcome::MalformedRequest,
        }
    }
}
