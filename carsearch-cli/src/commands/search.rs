//! Search command - run the full selection and submission flow.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::builder::RangedU64ValueParser;
use carsearch_core::{ValidationError, VehicleMake};
use carsearch_store::SubmitOutcome;
use tracing::{debug, info};

use crate::output::{JsonFormatter, PageDisplay, Pagination, DEFAULT_PER_PAGE};
use crate::{Cli, OutputFormat};

/// Arguments for the search command.
#[derive(clap::Args)]
pub struct SearchArgs {
    /// Vehicle type (case-insensitive).
    #[arg(long = "type", short = 't')]
    pub vehicle_type: String,

    /// Make name (case-insensitive) or id. Repeat for several makes;
    /// results follow the order given.
    #[arg(long = "make", short = 'm', required = true)]
    pub makes: Vec<String>,

    /// Model year.
    #[arg(long, short = 'y')]
    pub year: Option<String>,

    /// Zero-based result page.
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Rows per page.
    #[arg(
        long,
        default_value_t = DEFAULT_PER_PAGE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub per_page: usize,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    info!(vehicle_type = %args.vehicle_type, makes = ?args.makes, "Searching");

    let pagination = Pagination::new(args.page, args.per_page);
    let display = Arc::new(PageDisplay::new(
        cli.format,
        !cli.no_color,
        cli.pretty,
        pagination,
    ));
    let store = super::open_store(cli, display)?;

    super::select_type(&store, &args.vehicle_type).await?;

    let ids = resolve_makes(&store.available_makes().await, &args.makes)?;
    debug!(?ids, "Resolved makes");
    store.select_makes(&ids).await?;

    if let Some(year) = &args.year {
        store.set_year_enabled(true).await;
        store.set_year_input(year.as_str()).await;
    }

    match store.submit().await? {
        SubmitOutcome::Published { rows } => {
            debug!(rows = rows.len(), "Results shown");
            Ok(())
        }
        SubmitOutcome::Skipped(block) => {
            let year_error = store.year_error().await.map(|e| e.to_string());
            if cli.format == OutputFormat::Json {
                let formatter = JsonFormatter::new(cli.pretty);
                println!("{}", formatter.format_blocked(block, year_error.clone())?);
            }
            let reason = year_error.unwrap_or_else(|| block.to_string());
            bail!("Search not submitted: {reason}")
        }
        SubmitOutcome::Abandoned => bail!("Search abandoned"),
    }
}

/// Maps make arguments to ids, keeping their order.
///
/// An argument matches a make by numeric id or by name (trimmed,
/// case-insensitive).
pub fn resolve_makes(available: &[VehicleMake], wanted: &[String]) -> Result<Vec<i64>, ValidationError> {
    wanted
        .iter()
        .map(|arg| {
            let arg = arg.trim();
            let by_id = arg
                .parse::<i64>()
                .ok()
                .and_then(|id| available.iter().find(|m| m.id == id));
            by_id
                .or_else(|| available.iter().find(|m| m.name.trim().eq_ignore_ascii_case(arg)))
                .map(|m| m.id)
                .ok_or_else(|| ValidationError::UnknownMake(arg.to_string()))
        })
        .collect()
}
