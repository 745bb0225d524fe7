//! # Keyed Store Module
//!
//! Persists opaque ciphertext blobs, one JSON file per key, behind per-key
//! reader/writer locks and path-traversal checks.

pub mod context;
pub mod errors;
pub mod key;
pub mod keyed;
pub mod locks;
pub mod record;

pub use context::OpContext;
pub use errors::{StoreError, StoreResult};
pub use key::{validate_key, MAX_KEY_CHARS};
pub use keyed::KeyedStore;
pub use locks::LockRegistry;
pub use record::{EncryptedPayload, Record};
