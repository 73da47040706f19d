//! Acadia cross-store sync service.
//!
//! Keeps the primary Postgres store and the Cloudflare D1 edge store
//! consistent for the shared user entity. Exposes `POST /sync` to trigger a
//! reconciliation run and `GET /sync` for a status snapshot.

mod config;
mod logging;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use config::Config;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use acadia_api_sync::{claims_from_headers, sync_router, EdgeConfigState, SyncState};
use acadia_db::run_migrations;
use acadia_edge::{D1Client, D1Config, EdgeError};
use acadia_sync::{D1UserStore, EdgeHandle, LocalUserStore};

#[tokio::main]
async fn main() {
    // Load configuration (fail-fast on missing required values)
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        "Starting sync service"
    );

    // Create database connection pool
    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        eprintln!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    // Edge store credentials are optional: their absence degrades the
    // service (503 on trigger, disconnected status) instead of stopping it.
    let edge = match D1Config::from_env() {
        Ok(d1_config) => match D1Client::new(d1_config) {
            Ok(client) => {
                let store = Arc::new(D1UserStore::new(client));
                info!("Edge store configured");
                EdgeConfigState::Ready(EdgeHandle {
                    store: store.clone(),
                    probe: store,
                })
            }
            Err(e) => {
                eprintln!("Failed to build edge store client: {e}");
                std::process::exit(1);
            }
        },
        Err(EdgeError::NotConfigured { missing }) => {
            tracing::warn!(
                missing = ?missing,
                "Edge store credentials absent; sync trigger will be unavailable"
            );
            EdgeConfigState::NotConfigured { missing }
        }
        Err(e) => {
            eprintln!("Failed to load edge store configuration: {e}");
            std::process::exit(1);
        }
    };

    let local = Arc::new(LocalUserStore::new(pool));
    let state = SyncState {
        local: local.clone(),
        audit: local,
        edge,
    };

    let app = sync_router(state)
        .layer(middleware::from_fn(claims_from_headers))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid listen address: {e}");
            std::process::exit(1);
        }
    };

    info!(%addr, "Listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
