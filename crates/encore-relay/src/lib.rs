//! OAuth 2.0 PKCE relay for the Encore Spotify browser extension.
//!
//! Lets the extension obtain a Spotify refresh token without a client
//! secret: the relay issues the authorization redirect, carries the PKCE
//! verifier across the redirect boundary in a short-lived cookie, exchanges
//! the callback's authorization code server-to-server, and renders the
//! refresh token for manual copying.
//!
//! # Components
//!
//! - [`pkce`] — Code verifier and S256 challenge generation
//! - [`flow`] — Authorization URL construction and callback classification
//! - [`cookie`] — Pending-context cookie carriage
//! - [`spotify`] — Token endpoint client behind the [`spotify::TokenExchange`] seam
//! - [`config`] — Relay configuration
//! - [`server`] — Axum-based relay server
//! - [`pages`] — Token presentation page

pub mod config;
pub mod cookie;
pub mod error;
pub mod flow;
pub mod pages;
pub mod pkce;
pub mod server;
pub mod spotify;

pub use config::{ClientIdSource, RelayConfig};
pub use error::{RelayError, Result};
pub use flow::{CallbackOutcome, CallbackParams};
pub use pkce::PkcePair;
pub use server::RelayServer;
pub use spotify::{OAuthToken, Scope, SharedTokenExchange, SpotifyClient, TokenExchange};
