mod api;
mod config;
mod enrich;
mod mist;
mod search;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use crate::config::Config;
use crate::mist::MistClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("clamsd=info"))
        )
        .init();

    tracing::info!("Starting clamsd");

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/clams/clamsd.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    tracing::info!("Loaded config from {}", config_path);

    if !config.mist.is_configured() {
        tracing::warn!(
            "Mist API token or org ID not configured; searches will fail until {} is updated",
            config_path
        );
    }

    let client = MistClient::new(config.mist.clone())?;
    tracing::info!(
        "Using Mist API at {} (timeout {}s)",
        config.mist.base_url(),
        config.mist.timeout_secs
    );

    let app = api::routes::router(api::routes::AppState { client });

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("Listening on {}", config.api.listen);

    // Run server with graceful shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");
    cancel.cancel();

    if let Err(e) = server_handle.await {
        tracing::error!("Server task failed: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
