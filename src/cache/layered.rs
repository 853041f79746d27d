//! Layered Cache Module
//!
//! Composes a fast tier and a durable tier into one logical cache:
//! read-through with promotion, best-effort dual-write, dual-delete. The
//! coordinator is written against the [`CacheLayer`] interface and is
//! agnostic to the concrete tiers it composes.
//!
//! Every degradation is an explicit branch here: a failed layer read is
//! logged and treated as a miss, a failed layer write makes the overall
//! write unsuccessful, and nothing is ever rolled back or propagated as an
//! error to the caller.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::warn;

use crate::cache::{CacheLayer, CachedTranslation};

// == Coordinator Stats ==
/// Lightweight self-reported counters, independent of the monitor's.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStats {
    pub hits: u64,
    pub misses: u64,
    pub total_requests: u64,
    pub hit_ratio: f64,
}

// == Layered Cache ==
/// Two-tier read-through/write-through cache.
pub struct LayeredCache<F, D> {
    fast: F,
    durable: D,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<F: CacheLayer, D: CacheLayer> LayeredCache<F, D> {
    /// Composes the two tiers.
    pub fn new(fast: F, durable: D) -> Self {
        Self {
            fast,
            durable,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // == Get ==
    /// Looks a key up in the fast tier, falling back to the durable tier.
    ///
    /// A durable hit is promoted into the fast tier (without an explicit TTL,
    /// so it lives there until evicted). Layer failures degrade to a miss.
    pub async fn get(&self, key: &str) -> Option<CachedTranslation> {
        match self.fast.get(key).await {
            Ok(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(value);
            }
            Ok(None) => {}
            Err(error) => warn!(%key, %error, "fast layer lookup failed"),
        }

        match self.durable.get(key).await {
            Ok(Some(value)) => {
                if let Err(error) = self.fast.set(key, &value, None).await {
                    warn!(%key, %error, "promotion to fast layer failed");
                }
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(error) => {
                warn!(%key, %error, "durable layer lookup failed, treating as miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    // == Set ==
    /// Writes to both tiers; overall success is the AND of both results.
    ///
    /// A partially successful write is not rolled back: the surviving copy
    /// keeps serving reads and the layers re-converge lazily through the
    /// next miss-then-hit path.
    pub async fn set(&self, key: &str, value: &CachedTranslation, ttl_seconds: Option<u64>) -> bool {
        let fast_ok = match self.fast.set(key, value, ttl_seconds).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%key, %error, "fast layer write failed");
                false
            }
        };

        let durable_ok = match self.durable.set(key, value, ttl_seconds).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%key, %error, "durable layer write failed");
                false
            }
        };

        fast_ok && durable_ok
    }

    // == Delete ==
    /// Removes a key from both tiers; success is the AND of both results.
    pub async fn delete(&self, key: &str) -> bool {
        let fast_ok = match self.fast.delete(key).await {
            Ok(removed) => removed,
            Err(error) => {
                warn!(%key, %error, "fast layer delete failed");
                false
            }
        };

        let durable_ok = match self.durable.delete(key).await {
            Ok(removed) => removed,
            Err(error) => {
                warn!(%key, %error, "durable layer delete failed");
                false
            }
        };

        fast_ok && durable_ok
    }

    // == Exists ==
    /// A key is present if either tier has it.
    pub async fn exists(&self, key: &str) -> bool {
        match self.fast.exists(key).await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(error) => warn!(%key, %error, "fast layer exists check failed"),
        }

        match self.durable.exists(key).await {
            Ok(found) => found,
            Err(error) => {
                warn!(%key, %error, "durable layer exists check failed");
                false
            }
        }
    }

    // == Stats ==
    /// Returns the coordinator's own hit/miss counters.
    pub fn stats(&self) -> CoordinatorStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CoordinatorStats {
            hits,
            misses,
            total_requests: total,
            hit_ratio: hits as f64 / total.max(1) as f64,
        }
    }
}
