//! Time-bounded memoization of loaded tables.
//!
//! Concurrent reads go through `DashMap` shards; no lock is held while a
//! value is being loaded, so two callers missing the same key at once may
//! both load it and the last insert wins.

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A cached value with its expiry instant.
#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe map from key to `(value, expiry)`.
#[derive(Debug)]
pub struct TtlCache<K: Eq + Hash, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Return the live value for `key`, or run `load` and cache its result.
    /// Errors are returned as-is and leave the cache unchanged.
    pub fn get_or_try_load<E>(
        &self,
        key: K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        self.get_or_try_load_at(key, Instant::now(), load)
    }

    /// [`get_or_try_load`](Self::get_or_try_load) evaluated at `now`.
    pub fn get_or_try_load_at<E>(
        &self,
        key: K,
        now: Instant,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(value) = self.get_at(&key, now) {
            log::debug!("cache hit");
            return Ok(value);
        }

        let value = Arc::new(load()?);
        self.entries.insert(
            key,
            Entry {
                value: Arc::clone(&value),
                expires_at: now + self.ttl,
            },
        );
        Ok(value)
    }

    /// Live value for `key` at `now`; an expired entry is evicted on the way.
    pub fn get_at(&self, key: &K, now: Instant) -> Option<Arc<V>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Some(Arc::clone(&entry.value));
            }
        }
        // Guard dropped above; removing while holding it would deadlock.
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        None
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        log::info!("Clearing {} cached entries", self.entries.len());
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn cache() -> TtlCache<&'static str, u32> {
        TtlCache::new(Duration::from_secs(300))
    }

    #[test]
    fn loads_once_within_ttl() {
        let cache = cache();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Ok::<_, ()>(7)
        };
        let now = Instant::now();
        let a = cache.get_or_try_load_at("k", now, load).unwrap();
        let b = cache
            .get_or_try_load_at("k", now + Duration::from_secs(299), || Ok::<_, ()>(8))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 7);
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn entry_is_never_served_at_expiry() {
        let cache = cache();
        let now = Instant::now();
        cache.get_or_try_load_at("k", now, || Ok::<_, ()>(1)).unwrap();
        assert!(cache.get_at(&"k", now + Duration::from_secs(300)).is_none());
        assert!(cache.entries.is_empty(), "expired entry evicted on read");

        let fresh = cache
            .get_or_try_load_at("k", now + Duration::from_secs(300), || Ok::<_, ()>(2))
            .unwrap();
        assert_eq!(*fresh, 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = cache();
        assert_eq!(cache.get_or_try_load("k", || Err::<u32, _>("boom")), Err("boom"));
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn invalidate_all_clears_every_key() {
        let cache = cache();
        cache.get_or_try_load("a", || Ok::<_, ()>(1)).unwrap();
        cache.get_or_try_load("b", || Ok::<_, ()>(2)).unwrap();
        assert_eq!(cache.entries.len(), 2);
        cache.invalidate_all();
        assert!(cache.entries.is_empty());
        let reloaded = cache.get_or_try_load("a", || Ok::<_, ()>(3)).unwrap();
        assert_eq!(*reloaded, 3);
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(cache());
        cache.get_or_try_load("k", || Ok::<_, ()>(42)).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    *cache
                        .get_or_try_load("k", || Ok::<_, ()>(0))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
    }
}
