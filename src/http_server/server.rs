//! # HTTP Server
//!
//! Owns the store, the cache and its janitor, and serves the sync routes
//! until Ctrl-C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::routes::sync_routes;
use super::state::SyncState;
use crate::cache::{spawn_janitor, ReadCache};
use crate::config::ServiceConfig;
use crate::store::{KeyedStore, StoreResult};

/// Room for the JSON envelope around the ciphertext
const BODY_OVERHEAD: usize = 64 * 1024;

/// HTTP Server for the sync gateway
pub struct HttpServer {
    config: ServiceConfig,
    state: Arc<SyncState>,
    router: Router,
}

impl HttpServer {
    /// Open the store under `config.data_dir` and build the router
    pub fn open(config: ServiceConfig) -> StoreResult<Self> {
        let store = KeyedStore::open(&config.data_dir)?.with_max_payload(config.max_payload_bytes);
        let cache = ReadCache::new(config.cache_ttl());
        Ok(Self::with_parts(config, Arc::new(store), Arc::new(cache)))
    }

    /// Build a server around an existing store and cache
    pub fn with_parts(config: ServiceConfig, store: Arc<KeyedStore>, cache: Arc<ReadCache>) -> Self {
        let state = Arc::new(
            SyncState::new(store, cache)
                .with_api_root(config.http.api_root.clone())
                .with_request_timeout(config.request_timeout()),
        );
        let router = build_router(Arc::clone(&state), &config.http, config.max_payload_bytes);
        Self {
            config,
            state,
            router,
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.http.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and block until shutdown
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.http.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.http.socket_addr(), e),
            )
        })?;

        let janitor = spawn_janitor(Arc::clone(&self.state.cache), self.config.cache_sweep_interval());
        let shutdown = self.state.shutdown_token();

        let listener = TcpListener::bind(addr).await?;
        info!(
            %addr,
            api_root = %self.config.http.api_root,
            data_dir = %self.config.data_dir.display(),
            "cookiebox listening"
        );

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
            .await;

        shutdown.cancel();
        janitor.cancel();
        if let Err(e) = self.state.store.close() {
            tracing::warn!(error = %e, "store close failed");
        }
        info!("server stopped");

        served
    }
}

/// Build the router with CORS, compression, tracing and the body limit
pub fn build_router(state: Arc<SyncState>, config: &HttpServerConfig, max_payload: usize) -> Router {
    let origin = if config.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    sync_routes(state, config)
        .layer(DefaultBodyLimit::max(max_payload.saturating_add(BODY_OVERHEAD)))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = token.cancelled() => {},
    }

    info!("shutdown signal received");
    // Fail in-flight store calls fast instead of waiting on locks
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> ServiceConfig {
        ServiceConfig {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_server_creation() {
        let temp = TempDir::new().unwrap();
        let server = HttpServer::open(config(&temp)).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8088");
    }

    #[test]
    fn test_server_with_custom_port() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.http = HttpServerConfig::with_port(8080);
        let server = HttpServer::open(config).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_open_creates_data_dir() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.data_dir = temp.path().join("data");
        let _server = HttpServer::open(config).unwrap();
        assert!(temp.path().join("data").is_dir());
    }
}
