//! # TripBot — WhatsApp message scheduler
//!
//! Sends one predetermined WhatsApp message to a selected chat/group at a
//! scheduled time (typically tomorrow at midnight IST), skipping weekends
//! and listed holidays. Controlled over a small JSON HTTP API.
//!
//! Usage:
//!   tripbot                  # Start on the configured port (default 3000)
//!   tripbot --port 8080      # Custom port
//!   tripbot --config x.toml  # Custom config file

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tripbot_channels::WhatsAppBridge;
use tripbot_core::TripBotConfig;
use tripbot_gateway::AppState;
use tripbot_scheduler::{spawn_dispatcher, DispatchEngine, ScheduleStore};

#[derive(Parser)]
#[command(name = "tripbot", version, about = "WhatsApp message scheduler")]
struct Cli {
    /// HTTP port (overrides config and PORT env)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file (default: ~/.tripbot/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tripbot=debug,tower_http=debug"
    } else {
        "tripbot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Load config, then layer env and CLI overrides on top
    let mut config = match &cli.config {
        Some(path) => TripBotConfig::load_from(std::path::Path::new(path))?,
        None => TripBotConfig::load()?,
    };
    config.apply_env_overrides();
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    // The bridge owns the WhatsApp session; we only talk HTTP to it
    let bridge = Arc::new(WhatsAppBridge::new(config.bridge.clone()));
    match bridge.status().await {
        Ok(status) if status.ready => tracing::info!("✅ WhatsApp bridge is ready"),
        Ok(_) => tracing::warn!("⚠️ WhatsApp bridge not ready yet; sends will fail until it is"),
        Err(e) => tracing::warn!("⚠️ WhatsApp bridge unreachable ({e}); continuing anyway"),
    }

    // Shared schedule/target state, owned jointly by the poller and the API
    let store = Arc::new(Mutex::new(ScheduleStore::new()));

    let engine = Arc::new(DispatchEngine::new(
        store.clone(),
        bridge.clone(),
        &config.scheduler,
    ));
    spawn_dispatcher(engine, config.scheduler.tick_secs);

    let state = Arc::new(AppState::new(config, bridge, store));
    tripbot_gateway::serve(state).await?;
    Ok(())
}
