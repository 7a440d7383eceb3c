//! Thread-Safe Cache Accessor
//!
//! Wraps one eviction store behind a reader/writer lock and counts lookups.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::warn;

use crate::cache::{Cache, Stat};

// == Safe Cache ==
/// Concurrency-safe front for a [`Cache`] implementation.
///
/// `set`, `del` and `del_oldest` take the write lock; `get`, `stat`, `len`
/// and `used_bytes` take the read lock and may run concurrently. The lock
/// is not reentrant: an eviction callback must never call back into the
/// same `SafeCache`.
pub struct SafeCache<C> {
    inner: RwLock<Option<C>>,
    gets: AtomicU64,
    hits: AtomicU64,
}

impl<C: Cache> SafeCache<C> {
    // == Constructor ==
    /// Wraps `cache`, taking exclusive ownership of it.
    pub fn new(cache: C) -> Self {
        Self {
            inner: RwLock::new(Some(cache)),
            gets: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Creates an accessor with no backing store.
    ///
    /// Lookups miss, writes are dropped, and sizes read as zero.
    pub fn unconfigured() -> Self {
        Self {
            inner: RwLock::new(None),
            gets: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Returns true if a backing store is present.
    pub fn is_configured(&self) -> bool {
        self.inner.read().is_some()
    }

    // == Set ==
    /// Stores `value` under `key`, possibly evicting older entries.
    pub fn set(&self, key: impl Into<String>, value: C::Value) {
        let key = key.into();
        let mut guard = self.inner.write();
        match guard.as_mut() {
            Some(cache) => cache.set(key, value),
            None => warn!(key = %key, "set on unconfigured cache ignored"),
        }
    }

    // == Get ==
    /// Returns a clone of the value for `key`.
    ///
    /// Every call counts as a lookup; only present values count as hits.
    pub fn get(&self, key: &str) -> Option<C::Value>
    where
        C::Value: Clone,
    {
        self.get_with(key, Clone::clone)
    }

    /// Looks up `key` and maps the value while the read lock is held.
    pub fn get_with<R>(&self, key: &str, f: impl FnOnce(&C::Value) -> R) -> Option<R> {
        let guard = self.inner.read();
        // gets before hits, so a concurrent stat never sees hits > gets
        self.gets.fetch_add(1, Ordering::SeqCst);
        let found = guard.as_ref()?.get(key).map(f);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        found
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn del(&self, key: &str) {
        if let Some(cache) = self.inner.write().as_mut() {
            cache.del(key);
        }
    }

    /// Removes the next eviction candidate, if any.
    pub fn del_oldest(&self) {
        if let Some(cache) = self.inner.write().as_mut() {
            cache.del_oldest();
        }
    }

    // == Stats ==
    /// Returns a snapshot of lookup counters.
    pub fn stat(&self) -> Stat {
        let _guard = self.inner.read();
        let hits = self.hits.load(Ordering::SeqCst);
        let gets = self.gets.load(Ordering::SeqCst);
        Stat { hits, gets }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.read().as_ref().map_or(0, Cache::len)
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes charged for live entries.
    pub fn used_bytes(&self) -> usize {
        self.inner.read().as_ref().map_or(0, Cache::used_bytes)
    }

    /// Runs `f` against the store under the read lock.
    ///
    /// Does not touch the lookup counters.
    pub fn inspect<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        self.inner.read().as_ref().map(f)
    }
}

impl<C: Cache> Default for SafeCache<C> {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl<C: Cache> fmt::Debug for SafeCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeCache")
            .field("configured", &self.is_configured())
            .field("len", &self.len())
            .field("used_bytes", &self.used_bytes())
            .field("stat", &self.stat())
            .finish()
    }
}
