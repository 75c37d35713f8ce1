//! `portico serve` — run the proxy server.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use portico_server::{Server, ServerConfig};

/// Arguments for the `serve` command.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides PORTICO_BIND_ADDR)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Enable a permissive CORS layer
    #[arg(long)]
    pub cors: bool,
}

/// Run the server with configuration from the environment, applying any
/// flag overrides.
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config =
        ServerConfig::from_env().context("Loading configuration from environment")?;
    if let Some(bind) = args.bind {
        config = config.with_bind_address(bind);
    }
    if args.cors {
        config = config.with_cors(true);
    }

    info!(addr = %config.bind_address, idp = %config.idp_login_url, "Portico starting");
    Server::new(config).run().await?;
    Ok(())
}
