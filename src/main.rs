//! Profswitch Service
//!
//! Main entry point for the profit switcher.
//! Every poll interval it:
//! - ranks the configured coins by fiat daily revenue
//! - moves proxy workers to the most profitable coin
//! - records a snapshot, persists the history and draws the chart

use anyhow::Context;
use clap::Parser;
use profswitch::error::AppError;
use profswitch::poller::restore_history;
use profswitch::{AppConfig, History, ProfitSwitcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Command line flags
#[derive(Parser, Debug)]
#[command(name = "profswitch", version, about = "Switch proxy workers to the most profitable coin")]
struct Cli {
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Display profitability without switching workers
    #[arg(long)]
    dry_run: bool,

    /// Load environment from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

/// Resolves on SIGINT or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables first
    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("profswitch={},reqwest=warn", config.log_level).into()),
        )
        .init();

    info!(
        "Loaded {} coin(s), interval={}s, fiat={}",
        config.coins.len(),
        config.poll_interval_secs,
        config.fiat_currency
    );
    if cli.dry_run {
        info!("Dry-run mode: will NOT switch workers");
    }

    // 24h of history at one sample per interval; the chart shows the tail
    let history = Arc::new(History::new(config.history_capacity()));
    let current_ticker = restore_history(&history, &config.history_file);

    let mut switcher = ProfitSwitcher::new(config, history, current_ticker)
        .context("Failed to initialise HTTP clients")?
        .with_dry_run(cli.dry_run);

    if cli.once {
        switcher.run_cycle().await;
        return Ok(());
    }

    info!("Press Ctrl+C to shutdown gracefully");
    switcher.start(shutdown_signal()).await;

    info!("Profswitch shutdown complete");
    Ok(())
}
