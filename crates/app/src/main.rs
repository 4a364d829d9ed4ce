//! Brief - weekly check-in service
//!
//! Main entry point for the `brief` binary.

use brief_app::{commands, logging, AppContext, Cli, Command};
use brief_infra::config;
use clap::Parser;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => config::load_with(Some(path))?,
        None => config::load()?,
    };
    logging::init(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    let ctx = AppContext::new(config)?;
    commands::run(cli.command.unwrap_or(Command::Serve), &ctx).await
}
