//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    // Validation errors
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Payload too large: {0} bytes (max: {1})")]
    PayloadTooLarge(usize, usize),

    // Lookup errors
    #[error("Record not found: {0}")]
    NotFound(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    // Caller gave up
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl StoreError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::InvalidKey(_) => 400,
            StoreError::PayloadTooLarge(_, _) => 413,
            StoreError::NotFound(_) => 404,
            StoreError::Io(_) => 500,
            StoreError::Cancelled(_) => 503,
        }
    }

    /// Rejected before any filesystem access
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidKey(_) | StoreError::PayloadTooLarge(_, _)
        )
    }

    pub(crate) fn io(context: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Io(format!("{}: {}", context, err))
    }
}
