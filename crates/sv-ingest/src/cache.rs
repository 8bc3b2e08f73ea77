//! In-memory TTL cache for assembled route geometries.
//!
//! Entries expire lazily: a `get` that finds an entry older than the TTL
//! removes it and reports a miss.  There is no size bound and no background
//! sweeper; the key space is the route table times two directions.
//!
//! The cache owns its [`WallClock`] so tests can step time with a
//! [`ManualClock`](sv_core::ManualClock) instead of sleeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sv_core::{RouteKey, WallClock};

/// How long an ingested geometry stays fresh.
pub const ROUTE_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug)]
struct CacheEntry<V> {
    value:      V,
    created_at: Instant,
}

/// Keyed by `(route id, direction)`.  Safe to share across server threads.
pub struct RouteCache<V> {
    ttl:     Duration,
    clock:   Arc<dyn WallClock>,
    entries: Mutex<HashMap<RouteKey, CacheEntry<V>>>,
}

impl<V: Clone> RouteCache<V> {
    pub fn new(clock: Arc<dyn WallClock>) -> Self {
        Self::with_ttl(clock, ROUTE_CACHE_TTL)
    }

    pub fn with_ttl(clock: Arc<dyn WallClock>, ttl: Duration) -> Self {
        Self { ttl, clock, entries: Mutex::new(HashMap::new()) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value, or `None` when absent or older than the TTL.  An
    /// expired entry is dropped on the way out.
    pub fn get(&self, key: &RouteKey) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let age = now.saturating_duration_since(entries.get(key)?.created_at);
        if age > self.ttl {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|e| e.value.clone())
    }

    /// Store `value` under `key`, replacing whatever was there.
    pub fn put(&self, key: RouteKey, value: V) {
        let created_at = self.clock.now();
        self.lock().insert(key, CacheEntry { value, created_at });
    }

    /// Entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RouteKey, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
