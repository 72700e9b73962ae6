// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # `CarSearch` Fetch
//!
//! Catalog HTTP client and retry scheduling for `CarSearch`.
//!
//! ## Catalog Access
//!
//! - [`catalog::CatalogApi`] - The three read-only catalog lookups
//! - [`client::CatalogClient`] - reqwest-backed vPIC implementation
//! - [`wire`] - Response envelope parsing
//!
//! ## Retry
//!
//! - [`retry::RetryPolicy`] - Linear backoff, unbounded unless capped
//!
//! ## Settings
//!
//! - [`settings::CatalogSettings`] - Base URL, timeout and retry policy,
//!   overridable through `CARSEARCH_*` environment variables
//!
//! ## Example
//!
//! ```ignore
//! use carsearch_fetch::{CatalogApi, CatalogClient, CatalogSettings};
//!
//! let settings = CatalogSettings::from_env();
//! let client = CatalogClient::with_settings(&settings)?;
//!
//! let types = settings
//!     .retry
//!     .run_with_retry(|| client.list_vehicle_types(), |_, _, _| {})
//!     .await?;
//! ```

pub mod catalog;
pub mod client;
pub mod error;
pub mod retry;
pub mod settings;
pub mod wire;

pub use catalog::CatalogApi;
pub use client::CatalogClient;
pub use error::{FetchError, FetchErrorKind};
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY_SECS};
pub use settings::{
    CatalogSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_MAX_ATTEMPTS,
    ENV_RETRY_DELAY_SECS, ENV_TIMEOUT_SECS,
};
