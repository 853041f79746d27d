//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint. The cache fails
//! open throughout: layer failures show up as `stored: false` flags or a
//! `degraded` health status, never as 5xx responses.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::models::{
    DeleteResponse, ExistsResponse, ExpireRequest, ExpireResponse, FlushParams, FlushResponse,
    GetResponse, HealthResponse, HistoryParams, ResetResponse, SetRequest, SetResponse,
    StatsResponse,
};
use crate::monitor::{MetricsSnapshot, PerformanceReport};
use crate::service::CacheService;

/// Default number of snapshots returned by the history endpoint.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The composed cache service
    pub service: Arc<CacheService>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: CacheService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Handler for PUT /set
///
/// Writes a cached result to both layers with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> ApiResult<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let stored = state.service.set(&req.key, &req.value, req.ttl).await;

    Ok(Json(SetResponse {
        key: req.key,
        stored,
    }))
}

/// Handler for GET /get/:key
///
/// Retrieves a cached result, fast layer first.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GetResponse>> {
    match state.service.get(&key).await {
        Some(value) => Ok(Json(GetResponse { key, value })),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.service.delete(&key).await;
    Json(DeleteResponse { key, deleted })
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.service.exists(&key).await;
    Json(ExistsResponse { key, exists })
}

/// Handler for PUT /expire/:key
///
/// Refreshes the TTL of an existing durable entry.
pub async fn expire_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ExpireRequest>,
) -> Json<ExpireResponse> {
    let applied = state.service.expire(&key, req.ttl).await;
    Json(ExpireResponse { key, applied })
}

/// Handler for GET /stats
///
/// Coordinator counters plus the store's native counters, side by side.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let coordinator = state.service.coordinator_stats();
    let store = state.service.store_stats().await.ok();

    Json(StatsResponse { coordinator, store })
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.service.health().await;
    Json(HealthResponse::from_store(store))
}

/// Handler for GET /metrics/report
pub async fn report_handler(State(state): State<AppState>) -> Json<PerformanceReport> {
    Json(state.service.performance_report().await)
}

/// Handler for GET /metrics/history
pub async fn history_handler(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<MetricsSnapshot>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(state.service.metrics_history(limit))
}

/// Handler for POST /metrics/reset
pub async fn reset_handler(State(state): State<AppState>) -> Json<ResetResponse> {
    state.service.reset_metrics();
    Json(ResetResponse {
        message: "metrics reset".to_string(),
    })
}

/// Handler for POST /flush
///
/// Destructive: clears the entire durable namespace. Refused without an
/// explicit `confirm=true`; flushing is never automatic.
pub async fn flush_handler(
    State(state): State<AppState>,
    Query(params): Query<FlushParams>,
) -> ApiResult<Json<FlushResponse>> {
    if params.confirm != Some(true) {
        return Err(ApiError::InvalidRequest(
            "flush requires confirm=true".to_string(),
        ));
    }

    let flushed = state.service.flush().await;
    Ok(Json(FlushResponse { flushed }))
}
