//! Selection state machine.
//!
//! Tracks the vehicle type, the make list loaded for it, the selected makes
//! and the year filter. Every vehicle-type change bumps a generation counter
//! so make lists and searches issued for an older type can be recognised and
//! dropped.

use carsearch_core::{Selection, ValidationError, VehicleMake, VehicleType, YearFilter, YearRange};
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;

/// Where the selection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    /// No vehicle type chosen yet.
    #[default]
    NoTypeSelected,
    /// Waiting for the make list of the current type.
    LoadingMakes,
    /// Makes are loaded and can be selected.
    MakesReady,
}

/// Selection plus the data needed to drive it.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selection: Selection,
    available_makes: Vec<VehicleMake>,
    phase: SelectionPhase,
    generation: u64,
}

impl SelectionState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty state whose year filter checks a fixed range.
    pub fn with_year_range(range: YearRange) -> Self {
        Self {
            selection: Selection {
                year: YearFilter::with_range(range),
                ..Selection::default()
            },
            ..Self::default()
        }
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Makes available for the current type.
    pub fn available_makes(&self) -> &[VehicleMake] {
        &self.available_makes
    }

    /// Current phase.
    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Current vehicle-type generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ========================================================================
    // Vehicle Type
    // ========================================================================

    /// Switches to a new vehicle type.
    ///
    /// Clears available and selected makes and enters
    /// [`SelectionPhase::LoadingMakes`]. Returns the new generation, or
    /// `None` if `vehicle_type` is already the current type.
    pub fn begin_type_selection(&mut self, vehicle_type: VehicleType) -> Option<u64> {
        if self.selection.vehicle_type.as_ref() == Some(&vehicle_type) {
            debug!(vehicle_type = %vehicle_type, "Vehicle type unchanged");
            return None;
        }

        self.generation += 1;
        self.selection.vehicle_type = Some(vehicle_type);
        self.selection.makes.clear();
        self.available_makes.clear();
        self.phase = SelectionPhase::LoadingMakes;

        debug!(generation = self.generation, "Vehicle type changed");
        Some(self.generation)
    }

    /// Stores the make list loaded for `generation`.
    ///
    /// Returns false, leaving the state untouched, if the type has changed
    /// since the load was issued.
    pub fn apply_makes(&mut self, generation: u64, makes: Vec<VehicleMake>) -> bool {
        if generation != self.generation || self.phase != SelectionPhase::LoadingMakes {
            debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale make list"
            );
            return false;
        }

        self.available_makes = makes;
        self.phase = SelectionPhase::MakesReady;
        true
    }

    /// Forgets the current type after its make list could not be loaded, so
    /// selecting it again starts a fresh load.
    pub fn abandon_load(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != SelectionPhase::LoadingMakes {
            return false;
        }

        self.selection.vehicle_type = None;
        self.phase = SelectionPhase::NoTypeSelected;
        true
    }

    // ========================================================================
    // Makes
    // ========================================================================

    fn ensure_ready(&self) -> Result<(), StoreError> {
        match self.phase {
            SelectionPhase::MakesReady => Ok(()),
            SelectionPhase::LoadingMakes => Err(StoreError::MakesNotReady),
            SelectionPhase::NoTypeSelected => Err(StoreError::NoVehicleType),
        }
    }

    fn find_make(&self, id: i64) -> Result<&VehicleMake, StoreError> {
        self.available_makes
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ValidationError::UnknownMake(id.to_string()).into())
    }

    /// Replaces the selected makes, keeping the given order and dropping
    /// repeated ids.
    ///
    /// # Errors
    ///
    /// Fails without changing the selection if makes are not loaded or an id
    /// is not in the loaded list.
    pub fn select_makes(&mut self, ids: &[i64]) -> Result<(), StoreError> {
        self.ensure_ready()?;

        let mut makes: Vec<VehicleMake> = Vec::with_capacity(ids.len());
        for &id in ids {
            let make = self.find_make(id)?;
            if !makes.iter().any(|m| m.id == id) {
                makes.push(make.clone());
            }
        }

        self.selection.makes = makes;
        Ok(())
    }

    /// Adds the make if it is not selected, removes it otherwise.
    ///
    /// Returns true if the make is selected afterwards.
    ///
    /// # Errors
    ///
    /// Fails if makes are not loaded or the id is not in the loaded list.
    pub fn toggle_make(&mut self, id: i64) -> Result<bool, StoreError> {
        self.ensure_ready()?;

        if let Some(pos) = self.selection.makes.iter().position(|m| m.id == id) {
            self.selection.makes.remove(pos);
            return Ok(false);
        }

        let make = self.find_make(id)?.clone();
        self.selection.makes.push(make);
        Ok(true)
    }

    // ========================================================================
    // Year
    // ========================================================================

    /// Enables or disables the year filter.
    pub fn set_year_enabled(&mut self, enabled: bool) {
        self.selection.year.set_enabled(enabled);
    }

    /// Replaces the typed year.
    pub fn set_year_input(&mut self, raw: impl Into<String>) {
        self.selection.year.set_input(raw);
    }
}
