//! hsearch - resolve include names against a header search path
//!
//! hsearch provides:
//! - `resolve`: look names up as `#include <...>` or `#include "..."`
//! - `list`: show the effective search list
//! - `deps`: resolve every include directive of a source file

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hsearch::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(&cli);
    cli::run(cli)
}

/// Logs go to stderr; `RUST_LOG` wins over `--quiet`/`--verbose`
fn init_logging(cli: &cli::Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
