use anyhow::{Context, Result};
use immo_estimate::api::build_router;
use immo_estimate::config::AppConfig;
use immo_estimate::estimation::EstimationService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    info!("🏠 Starting estimation API server...");

    // Load configuration (config file + environment)
    let config = AppConfig::from_env()?;
    info!(
        "Configuration loaded (geocoding {}, {}s timeout)",
        if config.geocoding.enabled { "on" } else { "off" },
        config.geocoding.timeout_secs
    );

    let service = EstimationService::from_config(&config)?;
    let app = build_router(Arc::new(service));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("server.host/server.port do not form a valid socket address")?;
    info!("🚀 Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
