// File: services/neobrain_backend/src/main.rs
use neobrain_backend::{build_app, AppState};
use neobrain_common::logging;
use neobrain_config::{load_config, redacted};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);
    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = logging::init_from_config(&config.logging);
    info!("Loaded configuration: {}", redacted(&config));

    let state = AppState::new(config.clone()).map_err(|e| {
        error!("Failed to initialise services: {}", e);
        e
    })?;
    let app = build_app(&state)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);
    info!(
        "Login restricted to emails ending with {}",
        config.auth.allowed_email_suffix
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
