// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! CarSearch CLI - browse the vPIC vehicle catalog from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List vehicle types
//! carsearch types
//!
//! # List makes for a vehicle type
//! carsearch makes --type "Passenger Car"
//!
//! # Search models of two makes for one model year
//! carsearch search --type "Passenger Car" --make honda --make 440 --year 2015
//!
//! # Second page as JSON
//! carsearch --format json --pretty search --type Truck --make mack --page 1
//! ```

mod commands;
mod output;

use anyhow::Result;
use carsearch_fetch::{CatalogSettings, RetryPolicy};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{makes, search, types};

// ============================================================================
// CLI Definition
// ============================================================================

/// CarSearch CLI - vehicle catalog search.
#[derive(Parser)]
#[command(name = "carsearch")]
#[command(about = "Vehicle catalog search CLI")]
#[command(long_about = r#"
CarSearch queries the NHTSA vPIC vehicle catalog.

Pick a vehicle type, one or more makes and optionally a model year; the
models of every make are fetched concurrently and merged in the order the
makes were given. Failed requests are retried with a growing delay.

Environment:
  CARSEARCH_BASE_URL          Catalog base URL
  CARSEARCH_TIMEOUT_SECS      Per-request timeout
  CARSEARCH_RETRY_DELAY_SECS  Base retry delay (default 5)
  CARSEARCH_MAX_ATTEMPTS      Attempts per request (0 = unlimited)

Examples:
  carsearch types
  carsearch makes --type "Passenger Car"
  carsearch search --type "Passenger Car" --make honda --year 2015
  carsearch --format json search --type Truck --make mack
"#)]
#[command(version)]
#[command(author = "CarSearch Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, no retry notices).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Catalog base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Attempts per request before giving up (0 = unlimited).
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Base retry delay in seconds.
    #[arg(long, global = true)]
    pub retry_delay: Option<u64>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List vehicle types.
    #[command(visible_alias = "t")]
    Types,

    /// List makes for a vehicle type.
    #[command(visible_alias = "m")]
    Makes(makes::MakesArgs),

    /// Search models for makes of a vehicle type.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error, including a search that could not be submitted.
    Error = 1,
}

impl Cli {
    /// Resolves catalog settings: defaults, then environment, then flags.
    pub fn catalog_settings(&self) -> CatalogSettings {
        let mut settings = CatalogSettings::from_env();

        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }

        let mut retry: RetryPolicy = settings.retry.clone();
        if let Some(secs) = self.retry_delay {
            retry = retry.with_base_delay(secs);
        }
        if let Some(max) = self.max_attempts {
            retry = retry.with_max_attempts((max > 0).then_some(max));
        }

        settings.with_retry(retry)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("carsearch=debug,info")
    } else {
        EnvFilter::new("carsearch=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Types => types::run(&cli).await,
        Commands::Makes(args) => makes::run(args, &cli).await,
        Commands::Search(args) => search::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
