//! The cache generated stylesheets are stored in
//!
//! Generation is pure, registries wrap it with [`cached`] so the expensive scan only happens when
//! the cache is cold.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A key value store with per entry expiry.
pub trait StyleCache: Send + Sync {
    /// Get a live entry
    fn get(&self, key: &str) -> Option<String>;
    /// Store a entry for `ttl`
    fn set(&self, key: &str, value: String, ttl: Duration);
    /// Delete a entry, returning whether it existed
    fn delete(&self, key: &str) -> bool;
}

/// A in process [`StyleCache`]
#[derive(Default)]
pub struct MemoryCache {
    /// Values and the moment they expire
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    /// Create a empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `func` with the locked entries, a poisoned lock is recovered since entries are
    /// always left consistent.
    fn with_entries<R>(&self, func: impl FnOnce(&mut HashMap<String, (String, Instant)>) -> R) -> R {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        func(&mut entries)
    }
}

impl StyleCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.with_entries(|entries| {
            let (value, expires) = entries.get(key)?;
            if Instant::now() < *expires {
                return Some(value.clone());
            }
            entries.remove(key);
            None
        })
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let Some(expires) = Instant::now().checked_add(ttl) else {
            log::warn!("Cache ttl {ttl:?} for {key} overflows, not caching");
            return;
        };
        self.with_entries(|entries| {
            entries.insert(key.to_owned(), (value, expires));
        });
    }

    fn delete(&self, key: &str) -> bool {
        self.with_entries(|entries| entries.remove(key).is_some())
    }
}

/// Return the value cached under `key`, or compute and store it.
///
/// With `bypass` set the cache is neither read nor written, empty values are never stored.
pub fn cached(
    cache: &dyn StyleCache,
    key: &str,
    ttl: Duration,
    bypass: bool,
    compute: impl FnOnce() -> String,
) -> String {
    if !bypass {
        if let Some(value) = cache.get(key) {
            log::debug!("Cache hit for {key}");
            return value;
        }
        log::debug!("Cache miss for {key}");
    }

    let value = compute();
    if !bypass && !value.is_empty() {
        cache.set(key, value.clone(), ttl);
    }
    value
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    const DAY: Duration = Duration::from_secs(86_400);

    #[test]
    fn set_get_delete() {
        let cache = MemoryCache::new();
        cache.set("key", "value".into(), DAY);
        assert_eq!(cache.get("key").as_deref(), Some("value"));
        assert!(cache.delete("key"));
        assert!(!cache.delete("key"));
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn expired_entries_are_gone() {
        let cache = MemoryCache::new();
        cache.set("key", "value".into(), Duration::ZERO);
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn computes_once() {
        let cache = MemoryCache::new();
        let calls = Cell::new(0_u32);
        let compute = || {
            calls.set(calls.get().saturating_add(1));
            String::from(".a { top: 0; }")
        };

        assert_eq!(cached(&cache, "css", DAY, false, compute), ".a { top: 0; }");
        assert_eq!(cached(&cache, "css", DAY, false, compute), ".a { top: 0; }");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn bypass_skips_cache() {
        let cache = MemoryCache::new();
        cache.set("css", "stale".into(), DAY);

        let value = cached(&cache, "css", DAY, true, || String::from("fresh"));
        assert_eq!(value, "fresh");
        assert_eq!(cache.get("css").as_deref(), Some("stale"));
    }

    #[test]
    fn empty_values_are_not_stored() {
        let cache = MemoryCache::new();
        assert_eq!(cached(&cache, "css", DAY, false, String::new), "");
        assert_eq!(cache.get("css"), None);
    }
}
