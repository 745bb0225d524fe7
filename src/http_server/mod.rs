//! # HTTP Server Module
//!
//! The sync gateway: an axum server in front of the read cache, the keyed
//! store, and the cipher.
//!
//! # Endpoints
//!
//! - `/` - Banner
//! - `/update` - Push an encrypted blob
//! - `/get/:uuid` - Fetch a blob, optionally decrypted server-side

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
pub use state::SyncState;
