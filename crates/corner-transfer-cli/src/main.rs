//! corner-transfer - command-line client for the Cornèr Bank data transfer portal.
//!
//! Lists the files waiting in a portal directory and downloads them,
//! decrypting with the local GnuPG keyring unless told not to.

mod cli;
mod commands;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins over --verbose (e.g., RUST_LOG=corner_transfer_core=trace)
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "corner-transfer starting");

    commands::run(cli).await
}
