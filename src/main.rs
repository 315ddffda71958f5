//! KV Cache Server - key-value HTTP service with a bounded read-aside cache

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kv_cache_server::api::{create_router, serve};
use kv_cache_server::config::StoreBackend;
use kv_cache_server::{AppState, Config, KvStore, MemoryStore, PgStore};

/// Main entry point for the key-value server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load `.env` and configuration from environment variables
/// 3. Connect the store of record (bootstrapping database and table)
/// 4. Build the bounded cache and coordinator
/// 5. Serve HTTP until SIGINT/SIGTERM, then close the store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_cache_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting KV Cache Server (pid {})", std::process::id());

    if dotenvy::dotenv().is_err() {
        info!(".env file not found, using system environment variables");
    }

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: cache_capacity={}, port={}, backend={:?}",
        config.cache_capacity, config.server_port, config.store_backend
    );

    let store: Arc<dyn KvStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .context("postgres backend selected without database settings")?;
            let pg = PgStore::connect(db)
                .await
                .context("failed to initialise PostgreSQL store")?;
            Arc::new(pg)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::from_config(&config, store.clone()).context("failed to build cache")?;
    info!("Cache initialized with capacity {}", config.cache_capacity);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    serve(listener, app, store, shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
