//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies. Cache failures
//! are reported as flags in 200 responses, never as 5xx errors: a degraded
//! cache is an expected condition, not a server fault.

use serde::Serialize;

use crate::cache::{CachedTranslation, CoordinatorStats, HealthReport, StatsReport};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached result
    pub value: CachedTranslation,
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// The key that was written
    pub key: String,
    /// True only if both layers accepted the write
    pub stored: bool,
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was deleted
    pub key: String,
    /// True only if both layers confirmed the removal
    pub deleted: bool,
}

/// Response body for the EXISTS operation (GET /exists/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    /// The checked key
    pub key: String,
    /// True if either layer holds the key
    pub exists: bool,
}

/// Response body for the EXPIRE operation (PUT /expire/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    /// The key whose TTL was refreshed
    pub key: String,
    /// True if the durable store applied the TTL
    pub applied: bool,
}

/// Response body for the stats endpoint (GET /stats)
///
/// Coordinator counters and store-native counters are surfaced side by
/// side, not merged; `store` is absent while the durable store is down.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub coordinator: CoordinatorStats,
    pub store: Option<StatsReport>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` while the durable store is unreachable
    /// (the fast layer keeps serving)
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// The durable store's own liveness report
    pub store: HealthReport,
}

impl HealthResponse {
    /// Builds the service-level view from the store report.
    pub fn from_store(store: HealthReport) -> Self {
        let status = if store.is_healthy() {
            "healthy"
        } else {
            "degraded"
        };
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            store,
        }
    }
}

/// Response body for the flush endpoint (POST /flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// True if the durable namespace was cleared
    pub flushed: bool,
}

/// Response body for the metrics reset endpoint (POST /metrics/reset)
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub message: String,
}
