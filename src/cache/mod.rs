//! # Cache Module
//!
//! TTL read-through cache shielding the keyed store from repeated disk
//! reads. The cache holds no reference to the store; the gateway composes
//! the two.

pub mod janitor;
pub mod read_cache;

pub use janitor::spawn_janitor;
pub use read_cache::{CacheStats, ReadCache};
