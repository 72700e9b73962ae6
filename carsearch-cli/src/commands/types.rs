//! Types command - list vehicle types.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::output::{JsonFormatter, PageDisplay, Pagination, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the types command.
pub async fn run(cli: &Cli) -> Result<()> {
    info!("Listing vehicle types");

    let display = Arc::new(PageDisplay::new(
        cli.format,
        !cli.no_color,
        cli.pretty,
        Pagination::default(),
    ));
    let store = super::open_store(cli, display)?;
    let types = store.load_vehicle_types().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_vehicle_types(&types));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_vehicle_types(&types)?);
        }
    }

    Ok(())
}
