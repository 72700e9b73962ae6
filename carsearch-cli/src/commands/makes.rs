//! Makes command - list makes for a vehicle type.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::output::{JsonFormatter, PageDisplay, Pagination, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the makes command.
#[derive(clap::Args)]
pub struct MakesArgs {
    /// Vehicle type (case-insensitive).
    #[arg(long = "type", short = 't')]
    pub vehicle_type: String,
}

/// Runs the makes command.
pub async fn run(args: &MakesArgs, cli: &Cli) -> Result<()> {
    info!(vehicle_type = %args.vehicle_type, "Listing makes");

    let display = Arc::new(PageDisplay::new(
        cli.format,
        !cli.no_color,
        cli.pretty,
        Pagination::default(),
    ));
    let store = super::open_store(cli, display)?;
    let vehicle_type = super::select_type(&store, &args.vehicle_type).await?;
    let makes = store.available_makes().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_makes(&vehicle_type, &makes));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_makes(&vehicle_type, &makes)?);
        }
    }

    Ok(())
}
