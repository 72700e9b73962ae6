//! Core error types for `CarSearch`.

use thiserror::Error;

/// Input that the form layer rejects locally.
///
/// These never reach the retry scheduler or the notification sink; they
/// disable submission and are rendered inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The year field is enabled but empty.
    #[error("Please enter a year")]
    YearMissing,

    /// The year field does not hold an integer.
    #[error("Please enter a valid year: '{0}' is not a number")]
    YearNotNumeric(String),

    /// The year is outside the supported model-year range.
    #[error("Please enter a valid year between {min} and {max} (got {year})")]
    YearOutOfRange {
        /// Entered year.
        year: i32,
        /// First accepted year.
        min: i32,
        /// Last accepted year.
        max: i32,
    },

    /// The vehicle type is not in the loaded catalog.
    #[error("Unknown vehicle type: {0}")]
    UnknownVehicleType(String),

    /// The make is not in the make list for the selected type.
    #[error("Unknown make: {0}")]
    UnknownMake(String),
}
