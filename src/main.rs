// Tokensync — Application Entry Point
//
// Parses CLI arguments, initializes structured logging, and dispatches to
// the command handler. Everything runs synchronously on the main thread.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tokensync::cli::{execute, Cli};

fn main() {
    // RUST_LOG=tokensync=debug shows per-store detail. Logs go to stderr so
    // `--json` output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tokensync=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
