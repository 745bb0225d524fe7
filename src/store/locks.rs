//! # Per-Key Lock Registry
//!
//! One reader/writer lock per distinct key, created lazily on first use and
//! kept for the life of the store. The table grows with the number of
//! distinct keys ever touched, not with request volume.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

/// Lock handle shared by all operations on one key
pub type KeyLock = Arc<RwLock<()>>;

/// Key-to-lock registry owned by a single store instance
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<String, KeyLock>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for `key`, creating it on first access.
    pub fn lock_for(&self, key: &str) -> KeyLock {
        if let Some(lock) = self.locks.get(key) {
            return lock.clone();
        }
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Number of keys with a lock
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
