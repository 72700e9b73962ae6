//! CLI command implementations.

pub mod makes;
pub mod search;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use carsearch_core::{Notifier, ResultsDisplay, SilentNotifier, VehicleType};
use carsearch_fetch::CatalogClient;
use carsearch_store::SearchStore;
use tracing::debug;

use crate::output::StderrNotifier;
use crate::Cli;

/// Builds a search store over the vPIC client configured by `cli`.
pub fn open_store(cli: &Cli, display: Arc<dyn ResultsDisplay>) -> Result<SearchStore> {
    let settings = cli.catalog_settings();
    debug!(base_url = %settings.base_url, "Opening catalog");

    let client = CatalogClient::with_settings(&settings).context("Invalid catalog settings")?;
    Ok(SearchStore::new(Arc::new(client), notifier(cli), display).with_retry(settings.retry))
}

/// Retry notices go to stderr unless `--quiet` is set.
pub fn notifier(cli: &Cli) -> Arc<dyn Notifier> {
    if cli.quiet {
        Arc::new(SilentNotifier)
    } else {
        Arc::new(StderrNotifier::new(!cli.no_color))
    }
}

/// Loads vehicle types, selects `name` and waits for its make list.
pub async fn select_type(store: &SearchStore, name: &str) -> Result<VehicleType> {
    store.load_vehicle_types().await?;

    if let Some(loading) = store.select_vehicle_type(name).await? {
        if !loading.await? {
            anyhow::bail!("Could not load makes for {}", name.trim());
        }
    }

    store
        .selection()
        .await
        .vehicle_type
        .context("No vehicle type selected")
}
