//! `NatioID` Server - Main Entry Point

use anyhow::Result;
use tracing::info;

use natioid_server::{api, config, sweeper};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "natioid_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting NatioID Server"
    );

    // Build application state
    let state = api::AppState::new(config.clone());
    info!(
        applications = state.queue.stats().await.total,
        page_size = state.queue.page_size(),
        "Review queue ready"
    );

    // Background expiry of drafts and confirmations
    let sweeper = sweeper::spawn_expiry_task(state.clone());

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    sweeper.abort();
    info!("Server shutdown complete");

    Ok(())
}
