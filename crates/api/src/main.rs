//! Sensor Registry API - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, ApiConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load().context("failed to load configuration")?;
    init_logging(&config)?;

    info!("=== Sensor API v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Sensor database: {}", config.store.database_url);

    run_server(&config).await.context("sensor API server stopped")?;

    Ok(())
}
