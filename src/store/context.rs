//! # Operation Context
//!
//! Deadline and cancellation signal carried by each store call.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::errors::{StoreError, StoreResult};

/// Deadline and cancellation token for one store operation
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

impl OpContext {
    /// No deadline, never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// A timeout past the clock's range leaves the deadline unset.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `Cancelled` once the token fires or the deadline passes.
    pub fn check(&self, op: &str) -> StoreResult<()> {
        if let Some(token) = &self.token {
            if token.is_cancelled() {
                return Err(StoreError::Cancelled(format!("{}: cancelled", op)));
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(StoreError::Cancelled(format!("{}: deadline exceeded", op)));
            }
        }
        Ok(())
    }
}
