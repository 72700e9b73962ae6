//! Search gate.
//!
//! Decides whether the current selection may be submitted.

use std::fmt;

use carsearch_core::{SearchSignature, Selection};
use serde::Serialize;

/// Bookkeeping for the search request lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRequestState {
    /// A submission is running.
    pub in_flight: bool,
    /// Signature of the last published search.
    pub last_issued: Option<SearchSignature>,
    /// Signature of the running submission.
    pub pending: Option<SearchSignature>,
}

impl SearchRequestState {
    /// Marks a submission for `signature` as running.
    pub fn begin(&mut self, signature: SearchSignature) {
        self.in_flight = true;
        self.pending = Some(signature);
    }

    /// Marks the running submission as published.
    pub fn complete(&mut self) {
        self.in_flight = false;
        if let Some(signature) = self.pending.take() {
            self.last_issued = Some(signature);
        }
    }

    /// Drops the running submission without publishing.
    pub fn abandon(&mut self) {
        self.in_flight = false;
        self.pending = None;
    }
}

/// Why a search cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBlock {
    /// No make is selected.
    NoMakes,
    /// The year filter is on but its value is not accepted.
    InvalidYear,
    /// A search is already running.
    InFlight,
    /// The same search was already published.
    AlreadyIssued,
}

impl fmt::Display for SearchBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoMakes => "select at least one make",
            Self::InvalidYear => "enter a valid model year or turn the year filter off",
            Self::InFlight => "a search is already running",
            Self::AlreadyIssued => "these results are already shown",
        };
        f.write_str(reason)
    }
}

/// Returns the first condition that keeps the search closed, if any.
pub fn search_block(selection: &Selection, request: &SearchRequestState) -> Option<SearchBlock> {
    if !selection.has_makes() {
        return Some(SearchBlock::NoMakes);
    }
    if selection.year.blocks_search() {
        return Some(SearchBlock::InvalidYear);
    }
    if request.in_flight {
        return Some(SearchBlock::InFlight);
    }
    if request.last_issued.as_ref() == Some(&selection.signature()) {
        return Some(SearchBlock::AlreadyIssued);
    }
    None
}

/// Returns true if `selection` may be submitted.
pub fn can_search(selection: &Selection, request: &SearchRequestState) -> bool {
    search_block(selection, request).is_none()
}
