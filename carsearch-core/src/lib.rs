// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `CarSearch` Core
//!
//! Core types, models, and traits for the `CarSearch` catalog orchestrator.
//!
//! This crate provides the foundational abstractions used across all other
//! `CarSearch` crates, including:
//!
//! - Catalog models (vehicle types, makes, model rows)
//! - Selection models (year filter, selection, search signature)
//! - Validation errors
//! - Collaborator traits for the presentation layer
//!
//! ## Key Types
//!
//! ### Catalog Types
//! - [`VehicleType`] - Top-level catalog category
//! - [`VehicleMake`] - Manufacturer scoped to a vehicle type
//! - [`CatalogRow`] - Make/model row returned by a search
//!
//! ### Selection Types
//! - [`YearFilter`] - Optional model year with validity
//! - [`Selection`] - Everything that determines a query
//! - [`SearchSignature`] - Canonical query identity used for deduplication
//!
//! ### Collaborators
//! - [`Notifier`] - Transient notification sink
//! - [`ResultsDisplay`] - Receives merged rows

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::ValidationError;

// Re-export all model types
pub use models::{
    // Catalog types
    sort_makes,
    CatalogRow,
    VehicleMake,
    VehicleType,
    // Selection types
    SearchSignature,
    Selection,
    YearFilter,
    YearRange,
    FIRST_MODEL_YEAR,
};

// Re-export traits
pub use traits::{Notifier, ResultsDisplay, SilentNotifier};
