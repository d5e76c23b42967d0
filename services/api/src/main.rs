//! evtbook event API
//!
//! Serves `POST /events` and `GET /events/{id}` over a Postgres event store.

use anyhow::Result;
use evtbook_api::{api, config, db::Database, state::AppState, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    telemetry::init_tracing(&config.log_level);

    info!("Starting evtbook event API");
    info!(listen_addr = %config.listen_addr, "Configuration loaded");

    let metrics = if config.metrics_enabled {
        telemetry::install_metrics()
    } else {
        None
    };

    // Connect to database
    let db = match Database::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            return Err(e.into());
        }
    };

    if let Err(e) = db.health_check().await {
        error!(error = %e, "Database ping failed");
        return Err(e.into());
    }
    info!("Database connection established");

    // Run migrations in dev mode
    if config.dev_mode {
        info!("Running database migrations (dev mode)");
        if let Err(e) = db.run_migrations().await {
            error!(error = %e, "Failed to run migrations");
            return Err(e.into());
        }
    }

    // Create application state
    let mut state = AppState::new(db.clone());
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let app = api::create_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for connections");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("HTTP server stopped; closing database pool");
    db.close().await;

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Event API shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Received shutdown signal");
}
