//! Store error types.

use carsearch_core::ValidationError;
use carsearch_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A catalog request failed and retrying stopped.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Makes were selected before the make list finished loading.
    #[error("Makes are not loaded yet")]
    MakesNotReady,

    /// An operation needs a vehicle type but none is selected.
    #[error("No vehicle type selected")]
    NoVehicleType,

    /// A background catalog task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// Returns true if this error came from the user's input rather than the
    /// catalog.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_) | StoreError::MakesNotReady | StoreError::NoVehicleType
        )
    }
}
