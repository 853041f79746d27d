//! Simplicache - Multi-layer result cache for text simplification requests
//!
//! Serves the cache contract (get/set/delete/exists) plus the diagnostic
//! surface over HTTP, backed by an in-process fast tier and a shared Redis
//! tier.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod monitor;
mod service;
mod tasks;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::{DurableCache, FastCache};
use config::Config;
use monitor::AlertThresholds;
use service::CacheService;
use tasks::spawn_cleanup_task;

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the fast and durable tiers and compose the cache service
/// 4. Start the background fast-layer sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simplicache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Simplicache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: fast_max_entries={}, default_ttl={}s, redis={}:{}, port={}",
        config.fast_max_entries,
        config.default_ttl,
        config.redis_host,
        config.redis_port,
        config.server_port
    );

    // The durable pool is lazy; startup succeeds even while Redis is down
    // and the service degrades to the fast layer until it comes back.
    let fast = FastCache::new(config.fast_max_entries);
    let durable = DurableCache::connect(&config).context("building durable cache pool")?;
    let service = CacheService::new(fast.clone(), durable, AlertThresholds::default());
    let state = AppState::new(service);
    info!("Cache service initialized");

    let cleanup_handle = spawn_cleanup_task(fast, config.cleanup_interval);
    info!("Background sweep task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    cleanup_handle.abort();
    warn!("Sweep task aborted");
}
