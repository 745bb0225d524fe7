//! # Read Cache
//!
//! In-memory TTL cache in front of the keyed store.
//!
//! - `put` always refreshes the expiry to `now + ttl`
//! - `get` evicts an expired entry it runs into (lazy expiration)
//! - `clean_expired` sweeps entries that are never read again
//!
//! Entries are never persisted; on a miss the caller reloads from the store
//! and calls `put` again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    /// `None` when `now + ttl` is past the clock's range
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now > at)
    }
}

/// Cache statistics. Passive only: never influence caching.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
}

/// Concurrent TTL cache keyed by record key
#[derive(Debug)]
pub struct ReadCache {
    items: DashMap<String, CacheEntry>,
    ttl: Duration,
    counters: Counters,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: DashMap::new(),
            ttl,
            counters: Counters::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                expires_at: Instant::now().checked_add(self.ttl),
            },
        );
    }

    /// Look up `key`. An expired entry counts as a miss and is removed.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        match self.items.get(key) {
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) if !entry.is_expired(now) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => {}
        }

        // Shard guard from the lookup is released; a concurrent `put` may
        // have refreshed the entry in between, so re-check before removing.
        if self.items.remove_if(key, |_, e| e.is_expired(now)).is_some() {
            self.counters.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn delete(&self, key: &str) {
        self.items.remove(key);
    }

    pub fn clear(&self) {
        self.items.clear();
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn clean_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.items.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        self.counters
            .expirations
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Number of entries, expired ones included until they are evicted
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
        }
    }
}
