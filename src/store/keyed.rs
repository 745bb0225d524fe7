//! # Keyed Store
//!
//! File-per-key persistence of opaque ciphertext.
//!
//! ## Invariants
//! - A key never resolves outside the root directory
//! - Writers on one key are serialized; readers share the lock
//! - A reader never sees a partially written file
//! - A cancelled call performs no filesystem mutation
//!
//! The root directory is assumed to be owned by one process. Nothing
//! coordinates two processes pointed at the same directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::context::OpContext;
use super::errors::{StoreError, StoreResult};
use super::key::{normalize, resolve_path};
use super::locks::LockRegistry;
use super::record::Record;

/// Persistent store of one ciphertext per key
#[derive(Debug)]
pub struct KeyedStore {
    root: PathBuf,
    locks: LockRegistry,
    max_payload: Option<usize>,
}

impl KeyedStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(StoreError::Io("data directory path is empty".to_string()));
        }

        fs::create_dir_all(&root)
            .map_err(|e| StoreError::io(&format!("create {}", root.display()), e))?;

        Ok(Self {
            root: normalize(&root),
            locks: LockRegistry::new(),
            max_payload: None,
        })
    }

    /// Reject ciphertexts longer than `max` bytes on `put`
    pub fn with_max_payload(mut self, max: usize) -> Self {
        self.max_payload = Some(max);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct keys this store has locked so far
    pub fn tracked_keys(&self) -> usize {
        self.locks.len()
    }

    /// Write `ciphertext` under `key`, replacing any previous record.
    pub fn put(&self, ctx: &OpContext, key: &str, ciphertext: &str) -> StoreResult<()> {
        let path = resolve_path(&self.root, key)?;
        if let Some(max) = self.max_payload {
            if ciphertext.len() > max {
                return Err(StoreError::PayloadTooLarge(ciphertext.len(), max));
            }
        }

        ctx.check("put").map_err(|e| cancelled(key, e))?;

        let lock = self.locks.lock_for(key);
        let _guard = lock
            .write()
            .map_err(|_| StoreError::Io(format!("lock poisoned for {:?}", key)))?;

        ctx.check("put").map_err(|e| cancelled(key, e))?;

        let content = Record::new(key, ciphertext).to_json()?;
        fs::write(&path, content).map_err(|e| {
            warn!(key = %key, path = %path.display(), error = %e, "record write failed");
            StoreError::io("write record", e)
        })?;

        debug!(key = %key, bytes = ciphertext.len(), "record stored");
        Ok(())
    }

    /// Read the record stored under `key`.
    pub fn get(&self, ctx: &OpContext, key: &str) -> StoreResult<Record> {
        let path = resolve_path(&self.root, key)?;

        ctx.check("get").map_err(|e| cancelled(key, e))?;

        let lock = self.locks.lock_for(key);
        let _guard = lock
            .read()
            .map_err(|_| StoreError::Io(format!("lock poisoned for {:?}", key)))?;

        ctx.check("get").map_err(|e| cancelled(key, e))?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => {
                warn!(key = %key, path = %path.display(), error = %e, "record read failed");
                return Err(StoreError::io("read record", e));
            }
        };

        Record::from_json(key, &bytes).map_err(|e| {
            warn!(key = %key, error = %e, "record is not valid JSON");
            e
        })
    }

    /// Release held resources. Files are closed after every call, so there
    /// is nothing left to flush.
    pub fn close(&self) -> StoreResult<()> {
        debug!(root = %self.root.display(), keys = self.locks.len(), "store closed");
        Ok(())
    }
}

fn cancelled(key: &str, err: StoreError) -> StoreError {
    debug!(key = %key, error = %err, "store call cancelled");
    err
}
