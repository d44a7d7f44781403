// CLI binary entry point for oxiflac

mod cli;

use std::process;

use anyhow::Result;
use clap::Parser;

use cli::Config;

fn main() -> Result<()> {
    let config = Config::parse();

    // RUST_LOG overrides the level picked from the flags.
    let filter = if config.verbose {
        "debug"
    } else if config.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let failures = cli::commands::run(&config)?;
    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}
