//! slidecast-relay server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay, deck upload, and
//! static file endpoints.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use slidecast_relay::config::RelayConfig;
use slidecast_relay::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        uploads_dir = %config.uploads_dir.display(),
        "starting slidecast-relay"
    );

    server::serve(config).await
}
