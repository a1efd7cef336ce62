mod awards;
mod cli;
mod config;
mod errors;
mod export;
mod graph;
mod overview;
mod reviews;
mod session;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{execute, run_menu, Cli};
use crate::config::Config;
use crate::session::http::HttpBrowser;
use crate::session::Session;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting harvester v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    // Initialize the browser session
    let browser = HttpBrowser::new(&config.user_agent).context("failed to build HTTP browser")?;
    let session = Arc::new(Session::new(browser));
    info!("Browser session ready (base: {})", config.site_base_url);

    // Ctrl-C flips the cancel flag; runs stop at the next page boundary
    let (cancel_tx, cancel) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, finishing current step");
                let _ = cancel_tx.send(true);
                // Hold the sender until exit
                std::future::pending::<()>().await;
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    let state = AppState {
        session,
        config,
        cancel,
    };

    match cli.command {
        Some(command) => {
            let path = execute(&state, command).await?;
            println!("Data written to {}", path.display());
        }
        None => run_menu(&state, BufReader::new(tokio::io::stdin())).await,
    }

    Ok(())
}
