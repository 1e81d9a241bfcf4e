use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state, Settings};
use crate::router::create_router;
use crate::schemas::AppState;

use super::seed_admin::seed_if_enabled;

pub async fn serve(settings: &Settings) -> Result<()> {
    trace!("Entering serve function");
    info!("Service desk starting up");
    debug!("Database URL: {}", settings.database_url);
    debug!("Bind address: {}", settings.bind_address);

    let state = initialize_app_state(settings).await.inspect_err(|e| {
        error!("Failed to initialize application state: {:#}", e);
    })?;
    debug!("Application state initialized successfully");

    seed_if_enabled(&state, settings).await?;
    run_server(state, &settings.bind_address).await
}

/// Bind `bind_address` and serve until Ctrl+C.
pub(crate) async fn run_server(state: AppState, bind_address: &str) -> Result<()> {
    trace!("Creating application router");
    let app = create_router(state);

    info!("Starting server on {}", bind_address);
    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind to address {}", bind_address))?;

    info!("Service desk API running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Unable to listen for shutdown signal: {}", e),
    }
}
