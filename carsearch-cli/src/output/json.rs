//! JSON output formatting.

use anyhow::Result;
use carsearch_core::{CatalogRow, VehicleMake, VehicleType};
use carsearch_store::SearchBlock;
use serde::Serialize;

use super::page::Pagination;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the make list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakesOutput<'a> {
    pub vehicle_type: &'a str,
    pub makes: &'a [VehicleMake],
}

/// JSON output for one page of search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput<'a> {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub page_count: usize,
    pub range: String,
    pub rows: &'a [CatalogRow],
}

/// JSON output for a search that was not submitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedOutput {
    pub blocked: SearchBlock,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_error: Option<String>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the vehicle-type list as an array of names.
    pub fn format_vehicle_types(&self, types: &[VehicleType]) -> Result<String> {
        let names: Vec<&str> = types.iter().map(|vt| vt.name.as_str()).collect();
        self.format(&names)
    }

    /// Formats the make list of a vehicle type.
    pub fn format_makes(&self, vehicle_type: &VehicleType, makes: &[VehicleMake]) -> Result<String> {
        self.format(&MakesOutput {
            vehicle_type: &vehicle_type.name,
            makes,
        })
    }

    /// Formats one page of search results with its page metadata.
    pub fn format_results(&self, rows: &[CatalogRow], pagination: Pagination) -> Result<String> {
        self.format(&SearchOutput {
            page: pagination.page,
            per_page: pagination.per_page,
            total: rows.len(),
            page_count: pagination.page_count(rows.len()),
            range: pagination.range_label(rows.len()),
            rows: pagination.slice(rows),
        })
    }

    /// Formats the reason a search was not submitted.
    pub fn format_blocked(&self, block: SearchBlock, year_error: Option<String>) -> Result<String> {
        self.format(&BlockedOutput {
            blocked: block,
            reason: block.to_string(),
            year_error,
        })
    }
}
