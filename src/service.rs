//! Cache Service Module
//!
//! The explicitly constructed composition root: owns the layered cache and
//! the monitor, times every lookup, and re-exports the diagnostic surface.
//! Whatever composes the application owns one of these; there is no hidden
//! process-wide instance.

use std::time::Instant;

use crate::cache::{
    key, CachedTranslation, CoordinatorStats, DurableCache, FastCache, HealthReport, LayeredCache,
    StatsReport,
};
use crate::config::Config;
use crate::error::LayerError;
use crate::monitor::{AlertThresholds, CacheMonitor, MetricsSnapshot, PerformanceReport};

/// Multi-layer cache with monitoring, composed once per process.
pub struct CacheService {
    cache: LayeredCache<FastCache, DurableCache>,
    monitor: CacheMonitor<DurableCache>,
    durable: DurableCache,
}

impl CacheService {
    /// Composes the service from already-built tiers.
    pub fn new(fast: FastCache, durable: DurableCache, thresholds: AlertThresholds) -> Self {
        Self {
            cache: LayeredCache::new(fast, durable.clone()),
            monitor: CacheMonitor::new(durable.clone(), thresholds),
            durable,
        }
    }

    /// Builds the tiers from configuration and composes the service.
    pub fn from_config(config: &Config) -> Result<Self, LayerError> {
        let fast = FastCache::new(config.fast_max_entries);
        let durable = DurableCache::connect(config)?;
        Ok(Self::new(fast, durable, AlertThresholds::default()))
    }

    // == Key Derivation ==
    /// Derives the cache key for a simplification request.
    pub fn generate_key(
        &self,
        model_version: &str,
        glossary_version: &str,
        mode: &str,
        input_text: &str,
    ) -> String {
        key::generate_key(model_version, glossary_version, mode, input_text)
    }

    // == Cache Contract ==
    /// Looks up a key, recording the outcome and latency with the monitor.
    pub async fn get(&self, cache_key: &str) -> Option<CachedTranslation> {
        let started = Instant::now();
        let result = self.cache.get(cache_key).await;

        match &result {
            Some(_) => self.monitor.record_hit(started.elapsed()),
            None => self.monitor.record_miss(started.elapsed()),
        }

        result
    }

    /// Writes to both tiers. A partial or total write failure is recorded
    /// as a cache error and reported as `false`; it is never propagated.
    pub async fn set(
        &self,
        cache_key: &str,
        value: &CachedTranslation,
        ttl_seconds: Option<u64>,
    ) -> bool {
        let stored = self.cache.set(cache_key, value, ttl_seconds).await;
        if !stored {
            self.monitor.record_error();
        }
        stored
    }

    /// Removes a key from both tiers.
    pub async fn delete(&self, cache_key: &str) -> bool {
        let deleted = self.cache.delete(cache_key).await;
        if !deleted {
            self.monitor.record_error();
        }
        deleted
    }

    /// Checks both tiers for the key.
    pub async fn exists(&self, cache_key: &str) -> bool {
        self.cache.exists(cache_key).await
    }

    /// Sets a fresh TTL on an existing durable entry.
    pub async fn expire(&self, cache_key: &str, ttl_seconds: u64) -> bool {
        self.durable
            .expire(cache_key, ttl_seconds)
            .await
            .unwrap_or(false)
    }

    // == Diagnostic Surface ==
    /// The coordinator's own hit/miss counters.
    pub fn coordinator_stats(&self) -> CoordinatorStats {
        self.cache.stats()
    }

    /// The durable store's native counters.
    pub async fn store_stats(&self) -> Result<StatsReport, LayerError> {
        self.durable.get_stats().await
    }

    /// The durable store's liveness report.
    pub async fn health(&self) -> HealthReport {
        self.durable.health_check().await
    }

    /// Current metrics snapshot (appended to the rolling history).
    pub async fn current_metrics(&self) -> MetricsSnapshot {
        self.monitor.get_current_metrics().await
    }

    /// Bundled performance report.
    pub async fn performance_report(&self) -> PerformanceReport {
        self.monitor.get_performance_report().await
    }

    /// The most recent `limit` metric snapshots.
    pub fn metrics_history(&self, limit: usize) -> Vec<MetricsSnapshot> {
        self.monitor.get_metrics_history(limit)
    }

    /// Zeroes monitoring counters; cache contents are untouched.
    pub fn reset_metrics(&self) {
        self.monitor.reset_metrics();
    }

    /// Clears the entire durable namespace. Destructive; callers must guard
    /// the invocation explicitly.
    pub async fn flush(&self) -> bool {
        self.durable.flush_cache().await.is_ok()
    }
}
