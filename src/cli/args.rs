//! CLI argument definitions using clap
//!
//! Commands:
//! - cookiebox serve [--port N] [--data-dir DIR] ...
//! - cookiebox encrypt --key K --password P < plaintext
//! - cookiebox decrypt --key K --password P < ciphertext

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{parse_port, ServiceConfig, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::http_server::config::normalize_api_root;
use crate::http_server::HttpServerConfig;

/// cookiebox - encrypted blob sync server
#[derive(Parser, Debug)]
#[command(name = "cookiebox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the sync server
    Serve(ServeArgs),

    /// Encrypt plaintext from stdin into a compatible container
    Encrypt(CipherArgs),

    /// Decrypt a container from stdin; prints `{}` on any failure
    Decrypt(CipherArgs),
}

/// Server options. Each flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "COOKIEBOX_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (1-65535)
    #[arg(long, env = "PORT", default_value = "8088", value_parser = parse_port)]
    pub port: u16,

    /// Prefix for all routes, e.g. /cookie
    #[arg(long, env = "API_ROOT", default_value = "")]
    pub api_root: String,

    /// Directory holding one JSON file per key
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Seconds a cached ciphertext stays fresh
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Seconds between sweeps of expired cache entries
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value_t = 60)]
    pub cache_sweep_secs: u64,

    /// Per-request deadline for store calls, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest accepted ciphertext, in bytes
    #[arg(long, env = "MAX_PAYLOAD_BYTES", default_value_t = DEFAULT_MAX_PAYLOAD_BYTES)]
    pub max_payload_bytes: usize,

    /// Allowed CORS origins (comma separated); any origin when empty
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Emit JSON log lines
    #[arg(long, env = "COOKIEBOX_JSON_LOGS")]
    pub json_logs: bool,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServiceConfig {
        ServiceConfig {
            http: HttpServerConfig {
                host: self.host.clone(),
                port: self.port,
                api_root: normalize_api_root(&self.api_root),
                cors_origins: self.cors_origins.clone(),
            },
            data_dir: self.data_dir.clone(),
            cache_ttl_secs: self.cache_ttl_secs,
            cache_sweep_secs: self.cache_sweep_secs,
            request_timeout_secs: self.request_timeout_secs,
            max_payload_bytes: self.max_payload_bytes,
        }
    }
}

/// Key and password used to derive the container passphrase
#[derive(Args, Debug, Clone)]
pub struct CipherArgs {
    /// Record key (the client's uuid)
    #[arg(long)]
    pub key: String,

    /// Sync password
    #[arg(long, env = "COOKIEBOX_PASSWORD")]
    pub password: String,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
