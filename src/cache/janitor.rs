//! Background sweep of expired cache entries.
//!
//! Complements the lazy expiration in `ReadCache::get` for keys that are
//! written once and never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::read_cache::ReadCache;

/// Spawn the sweep task on the current runtime. Cancel the returned token
/// to stop it.
pub fn spawn_janitor(cache: Arc<ReadCache>, every: Duration) -> CancellationToken {
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        run_janitor_loop(cache, every, cancel_clone).await;
    });

    cancel
}

async fn run_janitor_loop(cache: Arc<ReadCache>, every: Duration, cancel: CancellationToken) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_ms = every.as_millis() as u64, "cache janitor started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("cache janitor shutting down");
                break;
            }
            _ = ticker.tick() => {
                let removed = cache.clean_expired();
                if removed > 0 {
                    debug!(removed, remaining = cache.size(), "expired cache entries swept");
                }
            }
        }
    }
}
