//! Encore relay server entry point.

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;

use encore_relay::{ClientIdSource, RelayConfig, RelayServer};

/// OAuth 2.0 PKCE relay for the Encore Spotify extension.
#[derive(Parser, Debug)]
#[command(name = "encore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Public host the provider redirects back to, scheme included
    #[arg(long, env = "ENCORE_REDIRECT_HOST")]
    redirect_host: Option<String>,

    /// Spotify application client id
    #[arg(long, env = "ENCORE_CLIENT_ID")]
    client_id: Option<String>,

    /// Let callers supply their own client id via ?client_id=
    #[arg(long)]
    caller_client_id: bool,

    /// Disable per-request logging
    #[arg(long)]
    no_request_logging: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "encore=debug,encore_relay=debug,tower_http=debug,info"
    } else {
        "encore=info,encore_relay=info,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    let mut config = RelayConfig::default().with_bind_address(addr);
    if let Some(host) = cli.redirect_host {
        config = config.with_redirect_host(host);
    }
    if let Some(client_id) = cli.client_id {
        config = config.with_client_id(client_id);
    }
    if cli.caller_client_id {
        config = config.with_client_id_source(ClientIdSource::CallerSupplied);
    }
    if cli.no_request_logging {
        config = config.with_request_logging(false);
    }

    tracing::info!(
        redirect_host = %config.redirect_host,
        client_id_source = ?config.client_id_source,
        "Relay configured"
    );

    println!("Encore relay starting on http://{}", addr);
    println!("Press Ctrl+C to stop");

    RelayServer::new(config).run().await?;

    Ok(())
}
