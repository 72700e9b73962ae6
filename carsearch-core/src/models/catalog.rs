//! Catalog entity types.
//!
//! This module contains the immutable rows served by the remote catalog:
//! - [`VehicleType`] - Top-level catalog category
//! - [`VehicleMake`] - Manufacturer scoped to a vehicle type
//! - [`CatalogRow`] - One make/model pair returned by a model search

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Vehicle Type
// ============================================================================

/// A top-level catalog category (e.g. "Passenger Car").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleType {
    /// Display name, trimmed of surrounding whitespace.
    pub name: String,
}

impl VehicleType {
    /// Creates a vehicle type, trimming the name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
        }
    }

    /// Returns true if `name` refers to this type (trimmed, case-insensitive).
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Vehicle Make
// ============================================================================

/// A manufacturer, scoped to a vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleMake {
    /// Catalog identifier.
    pub id: i64,
    /// Manufacturer name.
    pub name: String,
}

impl VehicleMake {
    /// Creates a new make.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Case-insensitive name ordering, falling back to the exact name so the
    /// order stays total.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for VehicleMake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Sorts makes by name ascending using case-insensitive collation.
pub fn sort_makes(makes: &mut [VehicleMake]) {
    makes.sort_by(VehicleMake::cmp_by_name);
}

// ============================================================================
// Catalog Row
// ============================================================================

/// A make/model pair as returned by the catalog, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    /// Make identifier.
    pub make_id: i64,
    /// Make name.
    pub make_name: String,
    /// Model identifier.
    pub model_id: i64,
    /// Model name.
    pub model_name: String,
}

impl CatalogRow {
    /// Creates a new row.
    pub fn new(
        make_id: i64,
        make_name: impl Into<String>,
        model_id: i64,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            make_id,
            make_name: make_name.into(),
            model_id,
            model_name: model_name.into(),
        }
    }
}
