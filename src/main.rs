//! TutorLink Server: student/tutor matching with live chat.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use tutorlink_api::{AppState, build_app};
use tutorlink_core::config::AppConfig;
use tutorlink_core::error::AppError;
use tutorlink_database::{DatabasePool, MemoryUserDirectory, UserDirectory, UserRepository};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TUTORLINK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting TutorLink");

    // ── Step 1: User directory ───────────────────────────────────
    let (directory, db_pool) = if config.database.is_memory() {
        tracing::warn!("Using in-memory user directory; accounts are lost on restart");
        let directory: Arc<dyn UserDirectory> = Arc::new(MemoryUserDirectory::new());
        (directory, None)
    } else {
        let pool = DatabasePool::connect(&config.database).await?;
        tutorlink_database::migration::run_migrations(pool.pool()).await?;

        let directory: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(pool.pool().clone()));
        (directory, Some(pool))
    };

    // ── Step 2: Services and realtime engine ─────────────────────
    let shutdown_grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(config, directory, db_pool.clone());
    let realtime = Arc::clone(&state.realtime);
    let app = build_app(state);

    // ── Step 3: HTTP server ──────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "TutorLink server listening");

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let server_realtime = Arc::clone(&realtime);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, closing WebSocket connections...");
            server_realtime.shutdown().await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(pool) = db_pool {
        if tokio::time::timeout(shutdown_grace, pool.close()).await.is_err() {
            tracing::warn!("Timed out closing database pool");
        }
    }

    tracing::info!("TutorLink server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
