//! In-memory TTL cache.
//!
//! [`MemoryCache`] implements [`CacheStore`] with a single `RwLock`-guarded
//! map. Values are cloned out on read, so storing an `Arc<T>` makes reads
//! cheap and guarantees a reader never sees a half-written value: a `set`
//! swaps the whole entry under the write lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::Result;
use crate::traits::CacheStore;

struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Process-local cache with per-entry expiry.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> MemoryCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, live or expired.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

impl<V: Clone + Send + Sync> CacheStore<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Result<Option<V>> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        // An overflowing deadline is treated as "never expires".
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", 42u32, Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(42));
        assert_eq!(cache.get("missing").unwrap(), None);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), Duration::ZERO).unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let cache = MemoryCache::new();
        cache.set("k", 1u8, Duration::MAX).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(1));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let cache = MemoryCache::new();
        cache.set("k", 1u8, Duration::from_secs(60)).unwrap();
        cache.delete("k").unwrap();
        cache.delete("k").unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", Arc::new(vec![1]), Duration::from_secs(60)).unwrap();
        cache.set("k", Arc::new(vec![2]), Duration::from_secs(60)).unwrap();
        assert_eq!(*cache.get("k").unwrap().unwrap(), vec![2]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let cache = Arc::new(MemoryCache::new());
        std::thread::scope(|s| {
            for i in 0..8u32 {
                let cache = Arc::clone(&cache);
                s.spawn(move || {
                    for _ in 0..100 {
                        cache
                            .set("slot", Arc::new(vec![i; 16]), Duration::from_secs(60))
                            .unwrap();
                        if let Some(v) = cache.get("slot").unwrap() {
                            // Every observed value is complete and uniform.
                            assert_eq!(v.len(), 16);
                            assert!(v.iter().all(|x| *x == v[0]));
                        }
                    }
                });
            }
        });
    }
}
