//! CLI module for cookiebox
//!
//! Provides command-line interface for:
//! - serve: Run the sync gateway
//! - encrypt: Produce a client-compatible container
//! - decrypt: Open a container the way the gateway does

mod args;
mod commands;
mod errors;

pub use args::{CipherArgs, Cli, Command, ServeArgs};
pub use commands::{decrypt, encrypt, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
