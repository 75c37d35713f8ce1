//! `portico status` — probe a running server's health endpoint.

use anyhow::Result;
use clap::Args;
use console::style;

/// Arguments for the `status` command.
#[derive(Args)]
pub struct StatusArgs {
    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

/// Probe `/health` on the configured server and print a one-line status.
pub async fn run(server_url: &str, args: StatusArgs) -> Result<()> {
    let url = format!("{}/health", server_url.trim_end_matches('/'));

    match reqwest::get(&url).await {
        Ok(response) if response.status().is_success() => {
            let body: serde_json::Value = response.json().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!(
                    "{} portico {} at {}",
                    style("●").green(),
                    body["version"].as_str().unwrap_or("?"),
                    server_url
                );
            }
        }
        Ok(response) => {
            println!(
                "{} server at {} answered {}",
                style("●").yellow(),
                server_url,
                response.status()
            );
        }
        Err(_) => {
            println!("{} no server at {}", style("●").red(), server_url);
        }
    }

    Ok(())
}
