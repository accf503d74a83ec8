//! taskpad - a command-line to-do list backed by a remote task service.
//!
//! Logs in against the service, keeps the session token on disk, and sends
//! it as a bearer token with every task request.

mod cli;
mod commands;
mod format;
mod logging;

use anyhow::Result;
use clap::Parser;
use taskpad_core::Config;
use tracing::info;

use cli::Cli;
use commands::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    logging::init_tracing(config.log_dir().ok().as_deref());
    info!(api_url = %config.api_url, "taskpad starting");

    let mut app = App::new(config)?;
    app.run(cli.command).await
}
