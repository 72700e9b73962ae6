//! Domain models for CarSearch.
//!
//! ## Submodules
//!
//! - [`catalog`] - Rows served by the catalog (VehicleType, VehicleMake, CatalogRow)
//! - [`selection`] - Query inputs (YearFilter, Selection, SearchSignature)

mod catalog;
mod selection;

pub use catalog::{sort_makes, CatalogRow, VehicleMake, VehicleType};
pub use selection::{SearchSignature, Selection, YearFilter, YearRange, FIRST_MODEL_YEAR};
#[cfg(test)]
mod serde_tests;
