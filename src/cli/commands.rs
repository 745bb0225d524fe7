//! CLI command implementations

use std::io::{self, Read, Write};

use tracing_subscriber::EnvFilter;

use crate::cipher;
use crate::http_server::HttpServer;

use super::args::{CipherArgs, Cli, Command, ServeArgs};
use super::errors::{CliError, CliResult};

const DEFAULT_LOG_FILTER: &str = "cookiebox=info,tower_http=info";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Encrypt(args) => encrypt(&args),
        Command::Decrypt(args) => decrypt(&args),
    }
}

/// Start the sync server and block until it shuts down
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    init_tracing(args.json_logs);

    let config = args.to_config();
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.http.port,
        api_root = %config.http.api_root,
        data_dir = %config.data_dir.display(),
        "cookiebox starting"
    );

    let server = HttpServer::open(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Encrypt stdin and print the base64 container
pub fn encrypt(args: &CipherArgs) -> CliResult<()> {
    let mut plaintext = Vec::new();
    io::stdin().read_to_end(&mut plaintext)?;

    let sealed = cipher::encrypt(&args.key, &plaintext, &args.password)?;

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", sealed)?;
    stdout.flush()?;
    Ok(())
}

/// Decrypt a container from stdin and print the plaintext
pub fn decrypt(args: &CipherArgs) -> CliResult<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let plaintext = cipher::decrypt(&args.key, input.trim(), &args.password);

    let mut stdout = io::stdout();
    stdout.write_all(&plaintext)?;
    stdout.flush()?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}
