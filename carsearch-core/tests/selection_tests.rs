//! Integration tests for selection types.

use carsearch_core::{Selection, VehicleMake, VehicleType, YearFilter, YearRange, FIRST_MODEL_YEAR};

#[test]
fn test_current_year_is_accepted() {
    let range = YearRange::through_current_year();
    assert_eq!(range.min, FIRST_MODEL_YEAR);
    assert!(range.contains(range.max));
    assert!(!range.contains(range.max + 1));
    assert!(!range.contains(1776));
}

#[test]
fn test_year_changes_signature_only_when_enabled() {
    let mut selection = Selection {
        vehicle_type: Some(VehicleType::new("Truck")),
        makes: vec![VehicleMake::new(7, "Ford")],
        year: YearFilter::new(),
    };
    let before = selection.signature();

    selection.year.set_input("1950");
    assert_eq!(selection.signature(), before);

    selection.year.set_enabled(true);
    assert_ne!(selection.signature(), before);
}
