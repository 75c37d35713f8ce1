//! Portico — session-forwarding proxy for SSO-protected campus sites.
//!
//! Main entry point for the Portico CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{serve, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Portico — session-forwarding proxy for SSO-protected campus sites
#[derive(Parser)]
#[command(name = "portico")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL (default: http://127.0.0.1:8080)
    #[arg(long, global = true, env = "PORTICO_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Portico server
    Serve(serve::ServeArgs),

    /// Show the status of a running server
    Status(status::StatusArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "portico=debug,portico_server=debug,portico_sso=debug,portico_session=debug,info"
    } else {
        "portico=info,portico_server=info,portico_sso=info,portico_session=info,warn"
    };

    let log_dir = std::env::var("PORTICO_LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let file_appender = tracing_appender::rolling::daily(&log_dir, "portico.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "portico=trace,portico_server=trace,portico_sso=trace,portico_session=trace,info",
                )),
        )
        .init();

    let server_url = cli
        .server
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Status(args) => status::run(&server_url, args).await,
    }
}
