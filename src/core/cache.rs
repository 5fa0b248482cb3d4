//! Time-bounded cache for results of expensive external fetches.
//!
//! Entries expire lazily: an entry older than the TTL is reported as a miss
//! on read and stays in the map until the key is written again. There is no
//! size bound; callers key by a small, externally bounded set (page URLs).

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Key/value cache injected into handlers that wrap slow lookups.
pub trait Cache<V>: Send + Sync {
    /// Return the value for `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value` under `key`, replacing any previous entry.
    fn set(&self, key: String, value: V);
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// [`Cache`] whose entries expire a fixed duration after they were written.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<V: Clone + Send + Sync> Cache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(Instant::now(), self.ttl) {
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&self, key: String, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }
}
