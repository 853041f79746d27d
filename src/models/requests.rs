//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::CachedTranslation;

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key to store the value under
    pub key: String,
    /// The cached simplification result
    pub value: CachedTranslation,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid. Empty
    /// keys never reach the cache core; this boundary rejects them.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > 256 {
            return Some("Key exceeds maximum length of 256 characters".to_string());
        }
        None
    }
}

/// Request body for the EXPIRE operation (PUT /expire/:key)
#[derive(Debug, Clone, Deserialize)]
pub struct ExpireRequest {
    /// Fresh TTL in seconds
    pub ttl: u64,
}

/// Query parameters for the metrics history endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryParams {
    /// Maximum number of snapshots to return
    pub limit: Option<usize>,
}

/// Query parameters guarding the flush endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FlushParams {
    /// Must be `true`; flushing is destructive and never implicit
    pub confirm: Option<bool>,
}
