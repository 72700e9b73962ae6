// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # `CarSearch` Store
//!
//! State management and search orchestration for `CarSearch`.
//!
//! This crate provides:
//!
//! - **SelectionState**: vehicle type, make list, selected makes and year
//!   filter, with a generation counter per vehicle-type change
//! - **Gate**: [`can_search`] and [`search_block`] over the selection and
//!   the request bookkeeping
//! - **SearchStore**: drives the catalog through the retry scheduler and
//!   publishes change notifications on a watch channel
//!
//! ## Usage
//!
//! ```ignore
//! use carsearch_store::{SearchStore, SubmitOutcome};
//!
//! let store = SearchStore::new(catalog, notifier, display);
//! store.load_vehicle_types().await?;
//!
//! if let Some(loading) = store.select_vehicle_type("Passenger Car").await? {
//!     loading.await?;
//! }
//! store.select_makes(&[440]).await?;
//!
//! // Re-evaluate the gate whenever state changes
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("can search: {}", store.can_search().await);
//! }
//! ```

pub mod error;
pub mod gate;
pub mod search_store;
pub mod selection;

pub use error::StoreError;
pub use gate::{can_search, search_block, SearchBlock, SearchRequestState};
pub use search_store::{SearchStore, SubmitOutcome};
pub use selection::{SelectionPhase, SelectionState};
