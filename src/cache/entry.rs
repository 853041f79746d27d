//! Cache Entry Module
//!
//! Defines the cached simplification result and the fast-layer entry
//! wrapper that tracks recency and expiry.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Cached Translation ==
/// A cached text-simplification result.
///
/// This is the value stored under a cache key in both layers; the durable
/// layer persists it as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTranslation {
    /// The simplified output text
    pub output: String,
    /// Version tag of the model that produced the output
    pub model_version: String,
    /// Time the original computation took, in milliseconds
    pub processing_time_ms: u64,
}

impl CachedTranslation {
    /// Creates a new cached result.
    pub fn new(
        output: impl Into<String>,
        model_version: impl Into<String>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            output: output.into(),
            model_version: model_version.into(),
            processing_time_ms,
        }
    }
}

// == Fast Entry ==
/// A fast-layer slot: the value plus recency and expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct FastEntry {
    /// The stored value
    pub value: CachedTranslation,
    /// Last access timestamp (Unix milliseconds)
    pub last_access_ms: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at_ms: Option<u64>,
}

impl FastEntry {
    /// Creates a new entry with optional TTL.
    ///
    /// A `ttl_seconds` of zero produces an entry that is already expired on
    /// its next lookup.
    pub fn new(value: CachedTranslation, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            last_access_ms: now,
            expires_at_ms: ttl_seconds.map(|ttl| now + ttl * 1000),
        }
    }

    /// Checks if the entry has expired.
    ///
    /// An entry is expired when the current time is greater than or equal to
    /// its expiration time; entries without a TTL never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at_ms {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Marks the entry as accessed now.
    pub fn touch(&mut self) {
        self.last_access_ms = current_timestamp_ms();
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
