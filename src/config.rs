//! Service configuration
//!
//! One value assembled by the CLI from flags and environment variables,
//! validated before anything is opened.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Largest ciphertext accepted by the gateway (10 MiB)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("invalid data directory: {0}")]
    InvalidDataDir(String),

    #[error("invalid API root: {0:?} must start with '/'")]
    InvalidApiRoot(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Directory holding one `<key>.json` per record
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_cache_sweep_secs")]
    pub cache_sweep_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_cache_sweep_secs() -> u64 {
    60
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            data_dir: default_data_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_sweep_secs: default_cache_sweep_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort(
                "0 must be between 1 and 65535".to_string(),
            ));
        }

        let data_dir = self.data_dir.to_string_lossy();
        if data_dir.is_empty() {
            return Err(ConfigError::InvalidDataDir("cannot be empty".to_string()));
        }
        if data_dir.contains('\0') {
            return Err(ConfigError::InvalidDataDir(
                "contains a NUL byte".to_string(),
            ));
        }

        if !self.http.api_root.is_empty() && !self.http.api_root.starts_with('/') {
            return Err(ConfigError::InvalidApiRoot(self.http.api_root.clone()));
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Zero("cache TTL"));
        }
        if self.cache_sweep_secs == 0 {
            return Err(ConfigError::Zero("cache sweep interval"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero("request timeout"));
        }
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::Zero("max payload size"));
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse a port the way the `PORT` variable is documented: decimal, 1-65535.
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    let port: u32 = value
        .parse()
        .map_err(|_| ConfigError::InvalidPort(format!("{:?} is not a valid number", value)))?;
    if !(1..=65535).contains(&port) {
        return Err(ConfigError::InvalidPort(format!(
            "{} must be between 1 and 65535",
            port
        )));
    }
    Ok(port as u16)
}
