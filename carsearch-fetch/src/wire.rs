//! vPIC response parsing.
//!
//! Every endpoint answers with `{ "Results": [...] }` plus bookkeeping
//! fields (`Count`, `Message`, `SearchCriteria`) that are ignored. Only the
//! fields needed to build rows are read.

use carsearch_core::{CatalogRow, VehicleMake, VehicleType};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;

// ============================================================================
// Response Types
// ============================================================================

/// The `Results` envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<R> {
    /// Result rows.
    #[serde(rename = "Results")]
    pub results: Vec<R>,
}

/// Row of the vehicle-type variable list.
#[derive(Debug, Deserialize)]
pub struct VehicleTypeRow {
    /// Type name, sometimes padded with whitespace.
    #[serde(rename = "Name")]
    pub name: String,
}

/// Row of `GetMakesForVehicleType`.
#[derive(Debug, Deserialize)]
pub struct MakeRow {
    /// Make identifier.
    #[serde(rename = "MakeId")]
    pub make_id: i64,
    /// Make name.
    #[serde(rename = "MakeName", default)]
    pub make_name: Option<String>,
}

/// Row of `GetModelsForMakeIdYear`.
#[derive(Debug, Deserialize)]
pub struct ModelRow {
    /// Make identifier.
    #[serde(rename = "Make_ID")]
    pub make_id: i64,
    /// Make name.
    #[serde(rename = "Make_Name", default)]
    pub make_name: Option<String>,
    /// Model identifier.
    #[serde(rename = "Model_ID")]
    pub model_id: i64,
    /// Model name.
    #[serde(rename = "Model_Name", default)]
    pub model_name: Option<String>,
}

impl From<VehicleTypeRow> for VehicleType {
    fn from(row: VehicleTypeRow) -> Self {
        VehicleType::new(row.name)
    }
}

impl From<MakeRow> for VehicleMake {
    fn from(row: MakeRow) -> Self {
        VehicleMake::new(row.make_id, row.make_name.unwrap_or_default())
    }
}

impl From<ModelRow> for CatalogRow {
    fn from(row: ModelRow) -> Self {
        CatalogRow::new(
            row.make_id,
            row.make_name.unwrap_or_default(),
            row.model_id,
            row.model_name.unwrap_or_default(),
        )
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses an envelope body and converts each row.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the body is not JSON, has no `Results`
/// array, or a row lacks a required field.
pub fn parse_results<R, T>(body: &str) -> Result<Vec<T>, FetchError>
where
    R: DeserializeOwned,
    T: From<R>,
{
    debug!(len = body.len(), "Parsing catalog response");

    let envelope: Envelope<R> = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("Invalid JSON: {e}")))?;

    Ok(envelope.results.into_iter().map(T::from).collect())
}
