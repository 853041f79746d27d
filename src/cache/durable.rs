//! Durable Layer Module
//!
//! Shared, network-backed cache tier on Redis. Values are stored as JSON
//! with the store's native TTL expiry; a bounded connection pool with
//! connect/wait timeouts plus a per-operation timeout keeps an unreachable
//! store from stalling callers.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config as RedisPoolConfig, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use serde::Serialize;
use tracing::warn;

use crate::cache::{CacheLayer, CachedTranslation};
use crate::config::Config;
use crate::error::LayerError;
use crate::monitor::StoreIntrospect;

// == Health Report ==
/// Liveness report for the durable store, for external observability only;
/// cache operations are never gated on it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy {
        connected_clients: u64,
        used_memory_human: String,
        key_count: u64,
        uptime_seconds: u64,
    },
    Unhealthy {
        error: String,
    },
}

impl HealthReport {
    /// Returns true for a healthy report.
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthReport::Healthy { .. })
    }
}

// == Stats Report ==
/// Cumulative operational counters as tracked by the store itself.
///
/// These are store-native figures, distinct from the coordinator's and the
/// monitor's own counters; reports surface them side by side, never merged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsReport {
    pub total_commands_processed: u64,
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    pub used_memory: u64,
    pub connected_clients: u64,
    pub uptime_seconds: u64,
    pub key_count: u64,
}

// == Durable Cache ==
/// Redis-backed cache tier behind a bounded connection pool.
///
/// Handles are cheap to clone; the pool is established once and reused.
#[derive(Clone)]
pub struct DurableCache {
    pool: Pool,
    default_ttl: u64,
    op_timeout: Duration,
}

impl DurableCache {
    /// Builds the connection pool from configuration.
    ///
    /// Pool creation is lazy: no connection is opened until the first
    /// operation, so construction succeeds even while the store is down.
    pub fn connect(config: &Config) -> Result<Self, LayerError> {
        let mut cfg = RedisPoolConfig::from_url(config.redis_url());

        let mut pool_cfg = PoolConfig::new(config.redis_max_connections);
        let connect_timeout = Duration::from_secs(config.redis_connect_timeout);
        pool_cfg.timeouts.create = Some(connect_timeout);
        pool_cfg.timeouts.wait = Some(connect_timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| LayerError::Pool(e.to_string()))?;

        Ok(Self {
            pool,
            default_ttl: config.default_ttl,
            op_timeout: Duration::from_secs(config.redis_op_timeout),
        })
    }

    // == Expire ==
    /// Sets a fresh TTL on an existing key. Returns false if the key is gone.
    pub async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool, LayerError> {
        let mut conn = self.connection().await?;
        let applied: bool = self
            .with_timeout(conn.expire(key, ttl_seconds as i64))
            .await?;
        Ok(applied)
    }

    // == Health Check ==
    /// Reports store liveness facts, or the error keeping it unreachable.
    pub async fn health_check(&self) -> HealthReport {
        match self.info().await {
            Ok(info) => HealthReport::Healthy {
                connected_clients: info_u64(&info, "connected_clients"),
                used_memory_human: info_field(&info, "used_memory_human")
                    .unwrap_or("0B")
                    .to_string(),
                key_count: self.key_count().await.unwrap_or(0),
                uptime_seconds: info_u64(&info, "uptime_in_seconds"),
            },
            Err(error) => HealthReport::Unhealthy {
                error: error.to_string(),
            },
        }
    }

    // == Stats ==
    /// Returns the store's cumulative operational counters.
    pub async fn get_stats(&self) -> Result<StatsReport, LayerError> {
        let info = self.info().await?;
        let key_count = self.key_count().await.unwrap_or(0);

        Ok(StatsReport {
            total_commands_processed: info_u64(&info, "total_commands_processed"),
            keyspace_hits: info_u64(&info, "keyspace_hits"),
            keyspace_misses: info_u64(&info, "keyspace_misses"),
            used_memory: info_u64(&info, "used_memory"),
            connected_clients: info_u64(&info, "connected_clients"),
            uptime_seconds: info_u64(&info, "uptime_in_seconds"),
            key_count,
        })
    }

    // == Flush ==
    /// Clears the entire shared namespace. Destructive; the HTTP boundary
    /// requires explicit confirmation before calling this.
    pub async fn flush_cache(&self) -> Result<(), LayerError> {
        let mut conn = self.connection().await?;
        let _: () = self
            .with_timeout(redis::cmd("FLUSHDB").query_async(&mut conn))
            .await?;
        warn!("durable cache flushed");
        Ok(())
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, LayerError> {
        self.pool
            .get()
            .await
            .map_err(|e| LayerError::Pool(e.to_string()))
    }

    async fn info(&self) -> Result<String, LayerError> {
        let mut conn = self.connection().await?;
        self.with_timeout(redis::cmd("INFO").query_async(&mut conn))
            .await
    }

    async fn key_count(&self) -> Result<u64, LayerError> {
        let mut conn = self.connection().await?;
        self.with_timeout(redis::cmd("DBSIZE").query_async(&mut conn))
            .await
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T, LayerError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(LayerError::from),
            Err(_) => Err(LayerError::Timeout(self.op_timeout)),
        }
    }
}

#[async_trait]
impl CacheLayer for DurableCache {
    async fn get(&self, key: &str) -> Result<Option<CachedTranslation>, LayerError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = self.with_timeout(conn.get(key)).await?;

        match payload {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &CachedTranslation,
        ttl_seconds: Option<u64>,
    ) -> Result<(), LayerError> {
        let payload = serde_json::to_string(value)?;
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let mut conn = self.connection().await?;
        let _: () = self.with_timeout(conn.set_ex(key, payload, ttl)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, LayerError> {
        let mut conn = self.connection().await?;
        let removed: u64 = self.with_timeout(conn.del(key)).await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, LayerError> {
        let mut conn = self.connection().await?;
        let found: bool = self.with_timeout(conn.exists(key)).await?;
        Ok(found)
    }
}

#[async_trait]
impl StoreIntrospect for DurableCache {
    async fn get_stats(&self) -> Result<StatsReport, LayerError> {
        DurableCache::get_stats(self).await
    }

    async fn health_check(&self) -> HealthReport {
        DurableCache::health_check(self).await
    }
}

// == INFO Parsing ==
/// Looks up one `field:value` line in raw INFO output.
fn info_field<'a>(info: &'a str, field: &str) -> Option<&'a str> {
    info.lines().find_map(|line| {
        line.strip_prefix(field)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(str::trim)
    })
}

/// Parses an INFO field as an integer, defaulting to zero when absent.
fn info_u64(info: &str, field: &str) -> u64 {
    info_field(info, field)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
