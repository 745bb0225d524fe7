//! # Records
//!
//! A record is one opaque ciphertext under one key. On disk it lives at
//! `<root>/<key>.json` as `{"encrypted": "<ciphertext>"}`.

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};

/// A stored ciphertext and the key it lives under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub ciphertext: String,
}

/// On-disk and on-wire JSON form of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub encrypted: String,
}

impl Record {
    pub fn new(key: impl Into<String>, ciphertext: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ciphertext: ciphertext.into(),
        }
    }

    /// Serialize to the file format
    pub fn to_json(&self) -> StoreResult<Vec<u8>> {
        let payload = EncryptedPayload {
            encrypted: self.ciphertext.clone(),
        };
        serde_json::to_vec(&payload).map_err(|e| StoreError::io("serialize record", e))
    }

    /// Parse the file format for `key`
    pub fn from_json(key: &str, bytes: &[u8]) -> StoreResult<Self> {
        let payload: EncryptedPayload =
            serde_json::from_slice(bytes).map_err(|e| StoreError::io("corrupt record", e))?;
        Ok(Self::new(key, payload.encrypted))
    }

    pub fn into_payload(self) -> EncryptedPayload {
        EncryptedPayload {
            encrypted: self.ciphertext,
        }
    }
}
