//! Cookie carriage for the pending authorization context.
//!
//! The relay holds no state between the redirect-out and the provider's
//! callback; the PKCE verifier (and, in caller-supplied mode, the client id)
//! travel in short-lived HttpOnly cookies instead.

use axum::http::{HeaderMap, header};

/// Cookie carrying the PKCE code verifier across the redirect boundary.
pub const VERIFIER_COOKIE: &str = "code_verifier";

/// Cookie carrying the resolved client id across the redirect boundary.
pub const CLIENT_ID_COOKIE: &str = "client_id";

/// Lifetime of the pending-authorization cookies, in seconds.
pub const PENDING_COOKIE_MAX_AGE: u64 = 60;

/// Build a `Set-Cookie` value for a pending-authorization cookie:
/// 60-second lifetime, host-wide path, HttpOnly, no Secure attribute.
pub fn set(name: &str, value: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly",
        name, value, PENDING_COOKIE_MAX_AGE
    )
}

/// Build a `Set-Cookie` value that clears a cookie.
pub fn clear(name: &str) -> String {
    format!("{}=; Max-Age=0; Path=/; HttpOnly", name)
}

/// Read a cookie value from the request's `Cookie` header. An empty value
/// counts as an absent cookie.
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}
