//! Fast Layer Module
//!
//! Bounded in-process cache tier with LRU eviction and per-entry TTL.
//! `FastStore` is the synchronous core; `FastCache` wraps it in a mutex and
//! implements the [`CacheLayer`] contract for use inside the layered cache.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::cache::{CacheLayer, CachedTranslation, FastEntry};
use crate::error::LayerError;

// == Fast Store ==
/// Recency-ordered bounded store.
///
/// The recency deque keeps the least recently used key at the front and the
/// most recently used key at the back; the entry map carries the values plus
/// last-access and expiry bookkeeping.
#[derive(Debug)]
pub struct FastStore {
    /// Key-value storage
    entries: HashMap<String, FastEntry>,
    /// Access order, front = least recently used
    order: VecDeque<String>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl FastStore {
    /// Creates a new store with the given capacity.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An entry past its expiry instant is evicted as a side effect and
    /// reported as absent. A live entry is moved to the most-recently-used
    /// position and its last-access timestamp updated.
    pub fn get(&mut self, key: &str) -> Option<CachedTranslation> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return None,
        };

        if expired {
            self.remove(key);
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch();
        let value = entry.value.clone();
        self.mark_used(key);
        Some(value)
    }

    // == Insert ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// A re-insert of an existing key discards its prior recency position,
    /// even if the value is unchanged. Without a TTL the entry has no expiry
    /// and lives until evicted or deleted. After insertion, entries are
    /// evicted one at a time from the LRU end until size is within bounds.
    pub fn insert(&mut self, key: String, value: CachedTranslation, ttl_seconds: Option<u64>) {
        self.entries
            .insert(key.clone(), FastEntry::new(value, ttl_seconds));
        self.mark_used(&key);

        while self.entries.len() > self.max_entries {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }

    // == Contains ==
    /// Checks for a live (non-expired) entry without touching recency order.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove(key);
        }

        expired_keys.len()
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves a key to the most-recently-used position.
    fn mark_used(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.to_string());
    }
}

// == Fast Cache ==
/// Shared handle over a [`FastStore`].
///
/// All operations serialize on one mutex; the critical section is memory-only
/// (no I/O happens while it is held). Handles are cheap to clone.
#[derive(Debug, Clone)]
pub struct FastCache {
    inner: Arc<Mutex<FastStore>>,
}

impl FastCache {
    /// Creates a new fast cache with the given capacity.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FastStore::new(max_entries))),
        }
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        match self.lock() {
            Ok(mut store) => store.purge_expired(),
            Err(_) => 0,
        }
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.lock().map(|store| store.len()).unwrap_or(0)
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, FastStore>, LayerError> {
        self.inner
            .lock()
            .map_err(|_| LayerError::Internal("fast cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl CacheLayer for FastCache {
    async fn get(&self, key: &str) -> Result<Option<CachedTranslation>, LayerError> {
        Ok(self.lock()?.get(key))
    }

    async fn set(
        &self,
        key: &str,
        value: &CachedTranslation,
        ttl_seconds: Option<u64>,
    ) -> Result<(), LayerError> {
        self.lock()?.insert(key.to_string(), value.clone(), ttl_seconds);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, LayerError> {
        self.lock()?.remove(key);
        Ok(true)
    }

    async fn exists(&self, key: &str) -> Result<bool, LayerError> {
        Ok(self.lock()?.contains(key))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn value(output: &str) -> CachedTranslation {
        CachedTranslation::new(output, "mt5-v1.0", 100)
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = FastStore::new(100);

        store.insert("key1".to_string(), value("value1"), None);
        let retrieved = store.get("key1").unwrap();

        assert_eq!(retrieved.output, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = FastStore::new(100);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_remove_is_idempotent() {
        let mut store = FastStore::new(100);

        store.insert("key1".to_string(), value("value1"), None);
        store.remove("key1");
        store.remove("key1");

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_zero_ttl_absent_on_next_get() {
        let mut store = FastStore::new(100);

        store.insert("key1".to_string(), value("value1"), Some(0));

        assert!(store.get("key1").is_none());
        assert_eq!(store.len(), 0, "expired entry should be evicted on get");
    }

    #[test]
    fn test_store_lru_eviction_scenario() {
        // Capacity 3: insert k1,k2,k3; get(k1); insert k4 -> k2 evicted.
        let mut store = FastStore::new(3);

        store.insert("k1".to_string(), value("v1"), None);
        store.insert("k2".to_string(), value("v2"), None);
        store.insert("k3".to_string(), value("v3"), None);

        store.get("k1").unwrap();

        store.insert("k4".to_string(), value("v4"), None);

        assert_eq!(store.len(), 3);
        assert!(store.get("k1").is_some());
        assert!(store.get("k2").is_none(), "k2 was least recently used");
        assert!(store.get("k3").is_some());
        assert!(store.get("k4").is_some());
    }

    #[test]
    fn test_store_eviction_by_insertion_order() {
        let mut store = FastStore::new(3);

        store.insert("k1".to_string(), value("v1"), None);
        store.insert("k2".to_string(), value("v2"), None);
        store.insert("k3".to_string(), value("v3"), None);
        store.insert("k4".to_string(), value("v4"), None);

        assert_eq!(store.len(), 3);
        assert!(store.get("k1").is_none(), "oldest entry evicted first");
        assert!(store.get("k2").is_some());
    }

    #[test]
    fn test_store_reinsert_resets_position() {
        let mut store = FastStore::new(3);

        store.insert("k1".to_string(), value("v1"), None);
        store.insert("k2".to_string(), value("v2"), None);
        store.insert("k3".to_string(), value("v3"), None);

        // Re-insert k1 with the same value; it becomes most recently used.
        store.insert("k1".to_string(), value("v1"), None);
        store.insert("k4".to_string(), value("v4"), None);

        assert!(store.get("k1").is_some());
        assert!(store.get("k2").is_none(), "k2 became LRU after k1 re-insert");
    }

    #[test]
    fn test_store_capacity_respected_under_burst() {
        let mut store = FastStore::new(2);

        for i in 0..10 {
            store.insert(format!("k{i}"), value(&format!("v{i}")), None);
            assert!(store.len() <= 2);
        }

        assert!(store.get("k8").is_some());
        assert!(store.get("k9").is_some());
    }

    #[test]
    fn test_store_overwrite_returns_new_value() {
        let mut store = FastStore::new(100);

        store.insert("key1".to_string(), value("old"), None);
        store.insert("key1".to_string(), value("new"), None);

        assert_eq!(store.get("key1").unwrap().output, "new");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_contains_does_not_touch_order() {
        let mut store = FastStore::new(2);

        store.insert("k1".to_string(), value("v1"), None);
        store.insert("k2".to_string(), value("v2"), None);

        // A contains check must not protect k1 from eviction.
        assert!(store.contains("k1"));
        store.insert("k3".to_string(), value("v3"), None);

        assert!(!store.contains("k1"));
        assert!(store.contains("k2"));
    }

    #[test]
    fn test_store_contains_reports_expired_as_absent() {
        let mut store = FastStore::new(100);
        store.insert("key1".to_string(), value("value1"), Some(0));
        assert!(!store.contains("key1"));
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = FastStore::new(100);

        store.insert("dead".to_string(), value("v"), Some(0));
        store.insert("live".to_string(), value("v"), Some(3600));
        store.insert("forever".to_string(), value("v"), None);

        let removed = store.purge_expired();

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);
        assert!(store.get("live").is_some());
        assert!(store.get("forever").is_some());
    }

    #[tokio::test]
    async fn test_fast_cache_layer_contract() {
        let cache = FastCache::new(10);
        let v = value("hallo");

        cache.set("key1", &v, None).await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), Some(v));
        assert!(cache.exists("key1").await.unwrap());

        assert!(cache.delete("key1").await.unwrap());
        assert_eq!(cache.get("key1").await.unwrap(), None);

        // Deleting a nonexistent key still reports success.
        assert!(cache.delete("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_fast_cache_shared_handles() {
        let cache = FastCache::new(10);
        let clone = cache.clone();

        clone.set("key1", &value("v"), None).await.unwrap();
        assert!(cache.exists("key1").await.unwrap());
        assert_eq!(cache.len(), 1);
    }
}
