//! Selection types.
//!
//! This module contains the user-driven query inputs:
//! - [`YearRange`] - Accepted model-year bounds
//! - [`YearFilter`] - Optional model-year filter with validity
//! - [`Selection`] - Vehicle type, ordered makes and year filter
//! - [`SearchSignature`] - Canonical identity of the query a selection issues

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::{VehicleMake, VehicleType};
use crate::error::ValidationError;

/// The first model year the catalog knows about.
pub const FIRST_MODEL_YEAR: i32 = 1886;

// ============================================================================
// Year Range
// ============================================================================

/// Inclusive range of accepted model years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// First accepted year.
    pub min: i32,
    /// Last accepted year.
    pub max: i32,
}

impl YearRange {
    /// Creates a range.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// `[1886, current local year]`.
    pub fn through_current_year() -> Self {
        Self::new(FIRST_MODEL_YEAR, chrono::Local::now().year())
    }

    /// Returns true if `year` is inside the range.
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Parses and range-checks a raw year value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the value is empty, not an integer,
    /// or out of range.
    pub fn parse(&self, raw: &str) -> Result<i32, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::YearMissing);
        }

        let year: i32 = trimmed
            .parse()
            .map_err(|_| ValidationError::YearNotNumeric(trimmed.to_string()))?;

        if self.contains(year) {
            Ok(year)
        } else {
            Err(ValidationError::YearOutOfRange {
                year,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::through_current_year()
    }
}

// ============================================================================
// Year Filter
// ============================================================================

/// Optional model-year filter.
///
/// Validity is recomputed on every change from the value just entered, so
/// the error state never lags one keystroke behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFilter {
    enabled: bool,
    raw_value: String,
    is_valid: bool,
    range: YearRange,
}

impl YearFilter {
    /// Creates a disabled filter validating against `[1886, current year]`.
    pub fn new() -> Self {
        Self::with_range(YearRange::through_current_year())
    }

    /// Creates a disabled filter validating against a fixed range.
    pub fn with_range(range: YearRange) -> Self {
        Self {
            enabled: false,
            raw_value: String::new(),
            is_valid: false,
            range,
        }
    }

    /// Whether the filter takes part in the query.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The value as typed.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Whether the current value is an accepted year. Always false while
    /// the filter is disabled.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The range values are checked against.
    pub fn range(&self) -> YearRange {
        self.range
    }

    /// Enables or disables the filter.
    ///
    /// Disabling clears validity but keeps the typed value; enabling
    /// revalidates the kept value.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.revalidate();
    }

    /// Replaces the typed value and revalidates it.
    pub fn set_input(&mut self, raw: impl Into<String>) {
        self.raw_value = raw.into();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.is_valid = self.enabled && self.range.parse(&self.raw_value).is_ok();
    }

    /// True when the filter blocks submission (enabled but invalid).
    pub fn blocks_search(&self) -> bool {
        self.enabled && !self.is_valid
    }

    /// The error to render inline, if any.
    ///
    /// An empty field blocks search but is not shown as an error.
    pub fn error(&self) -> Option<ValidationError> {
        if !self.enabled || self.raw_value.trim().is_empty() {
            return None;
        }
        self.range.parse(&self.raw_value).err()
    }

    /// Returns true if an inline error should be displayed.
    pub fn shows_error(&self) -> bool {
        self.error().is_some()
    }

    /// The year to send with the query, if the filter is on and valid.
    pub fn effective_year(&self) -> Option<i32> {
        if !self.enabled {
            return None;
        }
        self.range.parse(&self.raw_value).ok()
    }
}

impl Default for YearFilter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Selection
// ============================================================================

/// The inputs that determine which catalog query would be issued.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Selected vehicle type.
    pub vehicle_type: Option<VehicleType>,
    /// Selected makes in selection order.
    pub makes: Vec<VehicleMake>,
    /// Model-year filter.
    pub year: YearFilter,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if at least one make is selected.
    pub fn has_makes(&self) -> bool {
        !self.makes.is_empty()
    }

    /// Derives the canonical signature of the query this selection issues.
    pub fn signature(&self) -> SearchSignature {
        SearchSignature::from_selection(self)
    }
}

// ============================================================================
// Search Signature
// ============================================================================

/// Canonical identity of a query.
///
/// Two selections with equal signatures would issue identical requests in
/// the same order. The string is only ever compared, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchSignature(String);

impl SearchSignature {
    /// Builds the signature for a selection.
    pub fn from_selection(selection: &Selection) -> Self {
        let vehicle_type = selection
            .vehicle_type
            .as_ref()
            .map(|vt| vt.name.trim())
            .unwrap_or_default();

        let makes = selection
            .makes
            .iter()
            .map(|m| m.id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let year = if selection.year.enabled() {
            match selection.year.effective_year() {
                Some(year) => year.to_string(),
                None => format!("invalid:{}", selection.year.raw_value().trim()),
            }
        } else {
            "any".to_string()
        };

        Self(format!("type={vehicle_type};makes={makes};year={year}"))
    }

    /// Returns the canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
