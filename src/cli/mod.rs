//! Command-line interface for config-cache
//!
//! Provides the `config:cache` and `config:clear` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod clear;
mod utils;

pub use utils::GlobalArgs;

/// Merge application configuration files into a single cached artifact
#[derive(Parser)]
#[command(name = "config-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a cache file for faster configuration loading
    #[command(name = "config:cache")]
    Cache(cache::CacheArgs),

    /// Remove the configuration cache file
    #[command(name = "config:clear")]
    Clear(clear::ClearArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::new(Level::WARN.as_str())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Cache(args) => cache::run(args, &cli.global),
        Commands::Clear(args) => clear::run(args, &cli.global),
    }
}
