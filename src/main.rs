//! Campus Events backend
//!
//! Main application entry point

use anyhow::Context;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use campus_events::{
    config::Settings,
    database::{connection::{create_pool, run_migrations, DatabaseConfig}, DatabaseService},
    utils::logging,
    AppState,
};

const LOGIN_THROTTLE_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match std::env::var_os("CAMPUS_EVENTS_CONFIG") {
        Some(path) => Settings::from_file(Path::new(&path)),
        None => Settings::new(),
    }
    .context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on drop
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!(
        version = campus_events::VERSION,
        environment = %settings.app.environment,
        "Starting Campus Events backend..."
    );

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    if settings.database.run_migrations {
        run_migrations(&db_pool).await?;
    } else {
        warn!("Skipping database migrations");
    }

    // Initialize services
    let state = AppState::new(&settings, DatabaseService::new(db_pool))?;
    spawn_login_throttle_cleanup(state.clone());
    let app = campus_events::router(state, &settings.server.cors_origins);

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!(address = %address, "Campus Events backend is ready!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Campus Events backend has been shut down.");
    Ok(())
}

/// Periodically forget student ids whose login quota has replenished
fn spawn_login_throttle_cleanup(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LOGIN_THROTTLE_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let remaining = state.services.auth_service.cleanup_login_attempts();
            debug!(remaining_entries = remaining, "Login throttle cleanup tick");
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
