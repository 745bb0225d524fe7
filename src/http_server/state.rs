//! Shared gateway state
//!
//! Composes the read cache and the keyed store:
//!
//! - load: cache fast path, else store read and cache refill
//! - save: store write, then cache refresh
//!
//! Store calls are blocking and run on tokio's blocking pool, each with a
//! deadline derived from the request timeout and the server shutdown token.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::cache::ReadCache;
use crate::store::{KeyedStore, OpContext, StoreError, StoreResult};

/// Sync state shared across handlers
#[derive(Debug)]
pub struct SyncState {
    pub store: Arc<KeyedStore>,
    pub cache: Arc<ReadCache>,
    pub api_root: String,
    request_timeout: Duration,
    shutdown: CancellationToken,
}

impl SyncState {
    pub fn new(store: Arc<KeyedStore>, cache: Arc<ReadCache>) -> Self {
        Self {
            store,
            cache,
            api_root: String::new(),
            request_timeout: Duration::from_secs(30),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn op_context(&self) -> OpContext {
        OpContext::background()
            .with_timeout(self.request_timeout)
            .with_token(self.shutdown.clone())
    }

    /// Persist a ciphertext and refresh its cache entry.
    pub async fn save(&self, key: String, ciphertext: String) -> StoreResult<()> {
        let store = Arc::clone(&self.store);
        let ctx = self.op_context();
        let (key, ciphertext) = tokio::task::spawn_blocking(move || {
            store.put(&ctx, &key, &ciphertext).map(|_| (key, ciphertext))
        })
        .await
        .map_err(|e| StoreError::io("store worker", e))??;

        self.cache.put(key, ciphertext);
        Ok(())
    }

    /// Fetch a ciphertext, from the cache when possible.
    pub async fn load(&self, key: &str) -> StoreResult<String> {
        if let Some(ciphertext) = self.cache.get(key) {
            return Ok(ciphertext);
        }

        let store = Arc::clone(&self.store);
        let ctx = self.op_context();
        let owned_key = key.to_string();
        let record = tokio::task::spawn_blocking(move || store.get(&ctx, &owned_key))
            .await
            .map_err(|e| StoreError::io("store worker", e))??;

        self.cache.put(record.key, record.ciphertext.clone());
        Ok(record.ciphertext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state(temp: &TempDir) -> SyncState {
        let store = Arc::new(KeyedStore::open(temp.path()).unwrap());
        let cache = Arc::new(ReadCache::new(Duration::from_secs(300)));
        SyncState::new(store, cache)
    }

    #[tokio::test]
    async fn test_save_populates_cache() {
        let temp = TempDir::new().unwrap();
        let state = state(&temp);

        state.save("k".into(), "v".into()).await.unwrap();
        assert_eq!(state.cache.get("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_load_refills_cache() {
        let temp = TempDir::new().unwrap();
        let state = state(&temp);
        state.save("k".into(), "v".into()).await.unwrap();
        state.cache.clear();

        assert_eq!(state.load("k").await.unwrap(), "v");
        assert_eq!(state.cache.get("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_load_prefers_cache() {
        let temp = TempDir::new().unwrap();
        let state = state(&temp);
        state.cache.put("only-cached", "c");

        assert_eq!(state.load("only-cached").await.unwrap(), "c");
    }

    #[tokio::test]
    async fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let state = state(&temp);
        assert_eq!(
            state.load("missing").await,
            Err(StoreError::NotFound("missing".into()))
        );
        assert_eq!(state.cache.size(), 0);
    }

    #[tokio::test]
    async fn test_unbounded_timeout_and_ttl() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(KeyedStore::open(temp.path()).unwrap());
        let cache = Arc::new(ReadCache::new(Duration::from_secs(u64::MAX)));
        let state =
            SyncState::new(store, cache).with_request_timeout(Duration::from_secs(u64::MAX));

        state.save("k".into(), "v".into()).await.unwrap();
        state.cache.clear();
        assert_eq!(state.load("k").await.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_store_calls() {
        let temp = TempDir::new().unwrap();
        let token = CancellationToken::new();
        let state = state(&temp).with_shutdown(token.clone());
        token.cancel();

        assert!(matches!(
            state.save("k".into(), "v".into()).await,
            Err(StoreError::Cancelled(_))
        ));
        assert_eq!(state.cache.size(), 0);
    }
}
