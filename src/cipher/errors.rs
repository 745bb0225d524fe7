//! # Cipher Errors
//!
//! Internal failure reasons of the decrypt path. These never cross the
//! outward `decrypt` boundary; they exist so the codec stays testable and
//! so the gateway can log why a decrypt collapsed to `{}`.

use thiserror::Error;

/// Result type for cipher operations
pub type CipherResult<T> = Result<T, CipherError>;

/// Cipher errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("Base64 decode failed: {0}")]
    Base64(String),

    #[error("Invalid container: {0}")]
    InvalidContainer(&'static str),

    #[error("Invalid salt length: {0} bytes (expected 8)")]
    InvalidSalt(usize),

    /// Cipher rejected the key or IV slice. `KeyMaterial` is fixed at 32 and
    /// 16 bytes, so this only guards the cipher constructor's contract.
    #[error("Invalid key or IV length")]
    InvalidKeyLength,

    #[error("Invalid PKCS#7 padding")]
    BadPadding,
}

impl CipherError {
    /// Short machine-readable reason, safe to log
    pub fn reason(&self) -> &'static str {
        match self {
            CipherError::Base64(_) => "base64",
            CipherError::InvalidContainer(_) => "container",
            CipherError::InvalidSalt(_) => "salt",
            CipherError::InvalidKeyLength => "key_length",
            CipherError::BadPadding => "padding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons() {
        assert_eq!(CipherError::BadPadding.reason(), "padding");
        assert_eq!(CipherError::InvalidSalt(4).reason(), "salt");
        assert_eq!(CipherError::Base64("x".into()).reason(), "base64");
        assert_eq!(CipherError::InvalidKeyLength.reason(), "key_length");
    }

    #[test]
    fn test_display() {
        let err = CipherError::InvalidSalt(3);
        assert!(err.to_string().contains("3 bytes"));
    }
}
