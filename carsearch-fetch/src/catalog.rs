//! Catalog access trait.
//!
//! The orchestrator talks to the remote catalog only through [`CatalogApi`],
//! so tests and alternative transports can stand in for [`CatalogClient`].
//!
//! [`CatalogClient`]: crate::client::CatalogClient

use async_trait::async_trait;
use carsearch_core::{CatalogRow, VehicleMake, VehicleType};

use crate::error::FetchError;

/// The three read-only catalog lookups.
///
/// Implementations resolve with data or a single [`FetchError`]; they never
/// retry on their own.
///
/// ## Implementing
///
/// ```ignore
/// struct FixedCatalog;
///
/// #[async_trait]
/// impl CatalogApi for FixedCatalog {
///     async fn list_vehicle_types(&self) -> Result<Vec<VehicleType>, FetchError> {
///         Ok(vec![VehicleType::new("Car")])
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists every vehicle type.
    async fn list_vehicle_types(&self) -> Result<Vec<VehicleType>, FetchError>;

    /// Lists the makes for a vehicle type, sorted by name ascending
    /// (case-insensitive).
    async fn list_makes(&self, vehicle_type: &VehicleType)
    -> Result<Vec<VehicleMake>, FetchError>;

    /// Lists model rows for one make of a vehicle type. `None` means all
    /// model years.
    async fn list_models(
        &self,
        vehicle_type: &VehicleType,
        make: &VehicleMake,
        year: Option<i32>,
    ) -> Result<Vec<CatalogRow>, FetchError>;
}
