//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, exists_handler, expire_handler, flush_handler, get_handler, health_handler,
    history_handler, report_handler, reset_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Write a cached result to both layers
/// - `GET /get/:key` - Retrieve a cached result
/// - `DELETE /del/:key` - Delete a key from both layers
/// - `GET /exists/:key` - Check for a key in either layer
/// - `PUT /expire/:key` - Refresh a durable entry's TTL
/// - `GET /stats` - Coordinator and store-native counters
/// - `GET /health` - Service and store liveness
/// - `GET /metrics/report` - Bundled performance report
/// - `GET /metrics/history` - Rolling metric snapshots
/// - `POST /metrics/reset` - Zero the monitoring counters
/// - `POST /flush` - Clear the durable namespace (requires confirm=true)
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/exists/:key", get(exists_handler))
        .route("/expire/:key", put(expire_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/metrics/report", get(report_handler))
        .route("/metrics/history", get(history_handler))
        .route("/metrics/reset", post(reset_handler))
        .route("/flush", post(flush_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
