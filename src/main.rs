// Main entry point - Dependency injection, refresh loop and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::application::refresher::DashboardRefresher;
use crate::application::scheduler::run_refresh_loop;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::memory_surface::MemorySurface;
use crate::infrastructure::sheet_client::SheetClient;
use crate::presentation::app_state::AppState;
use crate::presentation::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG wins over the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sensor_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    tracing::info!(
        api_url = %config.api_url,
        metrics = config.metrics.len(),
        refresh_interval_secs = config.refresh_interval().as_secs(),
        "Loaded configuration"
    );

    // Adapters (infrastructure layer)
    let source = Arc::new(SheetClient::new(config.api_url.clone(), config.request_timeout())?);
    let surface = Arc::new(MemorySurface::new());

    // Refresher (application layer)
    let refresher = Arc::new(DashboardRefresher::new(
        source,
        surface.clone(),
        config.metrics.clone(),
        config.limit,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_task = tokio::spawn(run_refresh_loop(
        refresher.clone(),
        config.refresh_interval(),
        shutdown_rx,
    ));

    // Router (presentation layer)
    let state = Arc::new(AppState {
        refresher,
        surface,
        refresh_interval: config.refresh_interval(),
    });
    let router = build_router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!(%addr, "Starting sensor-dashboard service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    // Let an in-flight cycle finish before exiting
    if shutdown_tx.send(true).is_err() {
        tracing::debug!("Refresh loop already stopped");
    }
    refresh_task.await?;

    Ok(())
}
