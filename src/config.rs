//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables. The durable-store connection settings are owned by the
//! deployment environment and consumed read-only here.

use std::env;

/// Cache service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Durable store hostname
    pub redis_host: String,
    /// Durable store port
    pub redis_port: u16,
    /// Optional durable store password
    pub redis_password: Option<String>,
    /// Durable store database index
    pub redis_db: i64,
    /// Maximum pooled connections to the durable store
    pub redis_max_connections: usize,
    /// Connect/pool-wait timeout in seconds
    pub redis_connect_timeout: u64,
    /// Per-operation timeout in seconds
    pub redis_op_timeout: u64,
    /// Maximum number of entries the fast layer can hold
    pub fast_max_entries: usize,
    /// Default TTL in seconds for durable writes without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Fast-layer expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Durable store host (default: 127.0.0.1)
    /// - `REDIS_PORT` - Durable store port (default: 6379)
    /// - `REDIS_PASSWORD` - Durable store password (default: none)
    /// - `REDIS_DB` - Durable store database index (default: 0)
    /// - `REDIS_MAX_CONNECTIONS` - Connection pool size (default: 20)
    /// - `REDIS_CONNECT_TIMEOUT` - Connect timeout in seconds (default: 5)
    /// - `REDIS_OP_TIMEOUT` - Operation timeout in seconds (default: 5)
    /// - `FAST_MAX_ENTRIES` - Fast layer capacity (default: 1000)
    /// - `DEFAULT_TTL` - Default durable TTL in seconds (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            redis_host: env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            redis_port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6379),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            redis_max_connections: env::var("REDIS_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            redis_connect_timeout: env::var("REDIS_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            redis_op_timeout: env::var("REDIS_OP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            fast_max_entries: env::var("FAST_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::cache::DEFAULT_TTL_SECS),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Builds the durable store connection URL.
    pub fn redis_url(&self) -> String {
        match &self.redis_password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.redis_host, self.redis_port, self.redis_db
            ),
            None => format!(
                "redis://{}:{}/{}",
                self.redis_host, self.redis_port, self.redis_db
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            redis_password: None,
            redis_db: 0,
            redis_max_connections: 20,
            redis_connect_timeout: 5,
            redis_op_timeout: 5,
            fast_max_entries: 1000,
            default_ttl: crate::cache::DEFAULT_TTL_SECS,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
