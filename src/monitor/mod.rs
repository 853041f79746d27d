//! Monitor Module
//!
//! Accumulates cache performance counters, produces point-in-time metric
//! snapshots with a bounded rolling history, and evaluates threshold-based
//! alerts. The monitor only observes; it never mutates cache contents.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::cache::{HealthReport, StatsReport};
use crate::error::LayerError;

// == Capacities ==
/// Maximum retained metric snapshots; the oldest is dropped on overflow.
pub const METRICS_HISTORY_CAPACITY: usize = 100;

/// Ring-buffer bound on raw latency samples.
pub const LATENCY_SAMPLE_CAPACITY: usize = 1024;

// == Store Introspection ==
/// What the monitor needs from the durable store: its native counters and a
/// liveness report. Kept as an interface so tests can substitute a stub.
#[async_trait]
pub trait StoreIntrospect: Send + Sync {
    async fn get_stats(&self) -> Result<StatsReport, LayerError>;
    async fn health_check(&self) -> HealthReport;
}

// == Metrics Snapshot ==
/// Immutable point-in-time aggregate of cache performance.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub hit_count: u64,
    pub miss_count: u64,
    pub total_requests: u64,
    pub hit_ratio: f64,
    pub avg_response_time_ms: f64,
    pub memory_usage: u64,
    pub key_count: u64,
}

// == Alerts ==
/// Threshold rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowHitRatio,
    HighResponseTime,
    HighMemoryUsage,
    HighErrorRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// A fired alert with the observed value and the threshold it crossed.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}

/// Threshold configuration evaluated against the latest snapshot.
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Minimum acceptable hit ratio
    pub hit_ratio_min: f64,
    /// Maximum acceptable average response time in milliseconds
    pub response_time_max_ms: f64,
    /// Maximum acceptable store memory usage in bytes
    pub memory_usage_max: u64,
    /// Maximum acceptable error rate
    pub error_rate_max: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            hit_ratio_min: 0.7,
            response_time_max_ms: 10.0,
            memory_usage_max: 1024 * 1024 * 1024,
            error_rate_max: 0.05,
        }
    }
}

// == Performance Report ==
/// Bundled snapshot, alerts, uptime, and store health.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
    pub metrics: MetricsSnapshot,
    pub error_count: u64,
    pub error_rate: f64,
    pub store_health: HealthReport,
    pub alerts: Vec<Alert>,
    pub alert_count: usize,
    pub history_size: usize,
}

// == Monitor State ==
struct MonitorState {
    started_at: Instant,
    hits: u64,
    misses: u64,
    errors: u64,
    latency_samples_ms: VecDeque<f64>,
    history: VecDeque<MetricsSnapshot>,
}

impl MonitorState {
    fn fresh() -> Self {
        Self {
            started_at: Instant::now(),
            hits: 0,
            misses: 0,
            errors: 0,
            latency_samples_ms: VecDeque::new(),
            history: VecDeque::new(),
        }
    }

    fn push_sample(&mut self, latency: Duration) {
        if self.latency_samples_ms.len() == LATENCY_SAMPLE_CAPACITY {
            self.latency_samples_ms.pop_front();
        }
        self.latency_samples_ms
            .push_back(latency.as_secs_f64() * 1000.0);
    }

    fn avg_latency_ms(&self) -> f64 {
        let sum: f64 = self.latency_samples_ms.iter().sum();
        sum / self.latency_samples_ms.len().max(1) as f64
    }
}

// == Cache Monitor ==
/// Counter set with point-in-time snapshotting and alerting.
pub struct CacheMonitor<S> {
    store: S,
    thresholds: AlertThresholds,
    state: Mutex<MonitorState>,
}

impl<S: StoreIntrospect> CacheMonitor<S> {
    /// Creates a monitor over the given store handle.
    pub fn new(store: S, thresholds: AlertThresholds) -> Self {
        Self {
            store,
            thresholds,
            state: Mutex::new(MonitorState::fresh()),
        }
    }

    // == Recording ==
    /// Records a cache hit and its observed latency.
    pub fn record_hit(&self, latency: Duration) {
        let mut state = self.state();
        state.hits += 1;
        state.push_sample(latency);
    }

    /// Records a cache miss and its observed latency.
    pub fn record_miss(&self, latency: Duration) {
        let mut state = self.state();
        state.misses += 1;
        state.push_sample(latency);
    }

    /// Records a cache error.
    pub fn record_error(&self) {
        self.state().errors += 1;
    }

    // == Snapshot ==
    /// Computes the current metrics and appends them to the rolling history.
    ///
    /// Store stats are fetched best-effort; an unreachable store contributes
    /// zeroed memory/key-count figures rather than failing the snapshot.
    pub async fn get_current_metrics(&self) -> MetricsSnapshot {
        let store_stats = self.store.get_stats().await.unwrap_or_default();

        let mut state = self.state();
        let total = state.hits + state.misses;
        let snapshot = MetricsSnapshot {
            timestamp: Utc::now(),
            hit_count: state.hits,
            miss_count: state.misses,
            total_requests: total,
            hit_ratio: state.hits as f64 / total.max(1) as f64,
            avg_response_time_ms: state.avg_latency_ms(),
            memory_usage: store_stats.used_memory,
            key_count: store_stats.key_count,
        };

        state.history.push_back(snapshot.clone());
        if state.history.len() > METRICS_HISTORY_CAPACITY {
            state.history.pop_front();
        }

        snapshot
    }

    // == Alerts ==
    /// Takes a fresh snapshot and evaluates all alert rules against it.
    pub async fn check_alerts(&self) -> Vec<Alert> {
        let metrics = self.get_current_metrics().await;
        let (errors, total) = {
            let state = self.state();
            (state.errors, state.hits + state.misses)
        };
        self.evaluate_alerts(&metrics, errors, total)
    }

    /// Evaluates the four independent rules in fixed order: hit ratio,
    /// latency, memory, error rate.
    fn evaluate_alerts(&self, metrics: &MetricsSnapshot, errors: u64, total: u64) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if metrics.hit_ratio < self.thresholds.hit_ratio_min {
            alerts.push(Alert {
                kind: AlertKind::LowHitRatio,
                severity: Severity::Warning,
                message: format!(
                    "cache hit ratio is {:.1}%, below threshold of {:.1}%",
                    metrics.hit_ratio * 100.0,
                    self.thresholds.hit_ratio_min * 100.0
                ),
                value: metrics.hit_ratio,
                threshold: self.thresholds.hit_ratio_min,
            });
        }

        if metrics.avg_response_time_ms > self.thresholds.response_time_max_ms {
            alerts.push(Alert {
                kind: AlertKind::HighResponseTime,
                severity: Severity::Warning,
                message: format!(
                    "average response time is {:.2}ms, above threshold of {:.2}ms",
                    metrics.avg_response_time_ms, self.thresholds.response_time_max_ms
                ),
                value: metrics.avg_response_time_ms,
                threshold: self.thresholds.response_time_max_ms,
            });
        }

        if metrics.memory_usage > self.thresholds.memory_usage_max {
            alerts.push(Alert {
                kind: AlertKind::HighMemoryUsage,
                severity: Severity::Critical,
                message: format!(
                    "store memory usage is {:.2}GB, above threshold of {:.2}GB",
                    metrics.memory_usage as f64 / (1 << 30) as f64,
                    self.thresholds.memory_usage_max as f64 / (1 << 30) as f64
                ),
                value: metrics.memory_usage as f64,
                threshold: self.thresholds.memory_usage_max as f64,
            });
        }

        let error_rate = errors as f64 / total.max(1) as f64;
        if error_rate > self.thresholds.error_rate_max {
            alerts.push(Alert {
                kind: AlertKind::HighErrorRate,
                severity: Severity::Critical,
                message: format!(
                    "error rate is {:.1}%, above threshold of {:.1}%",
                    error_rate * 100.0,
                    self.thresholds.error_rate_max * 100.0
                ),
                value: error_rate,
                threshold: self.thresholds.error_rate_max,
            });
        }

        alerts
    }

    // == Report ==
    /// Bundles the latest snapshot, alerts, uptime, and store health.
    ///
    /// Snapshots exactly once; no state is mutated beyond what
    /// [`Self::get_current_metrics`] already does.
    pub async fn get_performance_report(&self) -> PerformanceReport {
        let metrics = self.get_current_metrics().await;
        let store_health = self.store.health_check().await;

        let (errors, total, uptime, history_size) = {
            let state = self.state();
            (
                state.errors,
                state.hits + state.misses,
                state.started_at.elapsed().as_secs_f64(),
                state.history.len(),
            )
        };

        let alerts = self.evaluate_alerts(&metrics, errors, total);
        let error_rate = errors as f64 / total.max(1) as f64;

        PerformanceReport {
            timestamp: Utc::now(),
            uptime_seconds: uptime,
            metrics,
            error_count: errors,
            error_rate,
            store_health,
            alert_count: alerts.len(),
            alerts,
            history_size,
        }
    }

    // == History ==
    /// Returns the most recent `limit` snapshots in chronological order.
    pub fn get_metrics_history(&self, limit: usize) -> Vec<MetricsSnapshot> {
        let state = self.state();
        let skip = state.history.len().saturating_sub(limit);
        state.history.iter().skip(skip).cloned().collect()
    }

    // == Reset ==
    /// Zeroes all counters and clears history. Cache contents are untouched.
    pub fn reset_metrics(&self) {
        *self.state() = MonitorState::fresh();
        info!("cache metrics reset");
    }

    fn state(&self) -> MutexGuard<'_, MonitorState> {
        // A poisoned lock still holds consistent counters; keep serving them.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
