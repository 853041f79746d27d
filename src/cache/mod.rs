//! Cache Module
//!
//! The multi-layer caching core: key fingerprinting, the bounded in-process
//! fast tier, the Redis-backed durable tier, and their composition into one
//! logical read-through/write-through cache.

mod durable;
mod entry;
mod fast;
pub mod key;
mod layered;


// Re-export public types
pub use durable::{DurableCache, HealthReport, StatsReport};
pub use entry::{current_timestamp_ms, CachedTranslation, FastEntry};
pub use fast::{FastCache, FastStore};
pub use layered::{CoordinatorStats, LayeredCache};

use async_trait::async_trait;

use crate::error::LayerError;

// == Public Constants ==
/// Default TTL in seconds for durable writes without an explicit TTL (24 hours).
pub const DEFAULT_TTL_SECS: u64 = 86_400;

// == Cache Layer Contract ==
/// Capability interface every cache tier implements.
///
/// The layered coordinator is written once against this contract, so any
/// get/set/delete/exists store can serve as a tier. Operations return
/// explicit errors; degrading a failure to a miss is the coordinator's
/// decision, not the layer's.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Looks up a key. `Ok(None)` is a genuine miss.
    async fn get(&self, key: &str) -> Result<Option<CachedTranslation>, LayerError>;

    /// Stores a value with an optional TTL in seconds.
    async fn set(
        &self,
        key: &str,
        value: &CachedTranslation,
        ttl_seconds: Option<u64>,
    ) -> Result<(), LayerError>;

    /// Removes a key, reporting whether the layer considers it removed.
    async fn delete(&self, key: &str) -> Result<bool, LayerError>;

    /// Checks for a live entry.
    async fn exists(&self, key: &str) -> Result<bool, LayerError>;
}
