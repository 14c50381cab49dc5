//! GemHunter - Location-based scavenger hunt backend
//!
//! Main entry point: load configuration, open the attraction store, serve the API.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gemhunter::storage::config::{get_config_path, load_config};
use gemhunter::{open_store, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GemHunter v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()
        .with_context(|| format!("loading configuration from {}", get_config_path().display()))?;

    let store = open_store(&config.storage).context("opening attraction store")?;

    server::serve(&config, store).await
}
