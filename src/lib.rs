//! cookiebox - encrypted blob synchronization backend
//!
//! Clients push an opaque ciphertext under a key they choose and fetch it
//! back later, optionally asking the server to decrypt it with a password.
//!
//! - `cipher`: CryptoJS/OpenSSL passphrase container decryption
//! - `store`: one JSON file per key behind per-key locks
//! - `cache`: TTL read cache in front of the store
//! - `http_server`: the gateway composing the three

pub mod cache;
pub mod cipher;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod store;
