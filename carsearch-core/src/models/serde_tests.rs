//! Serde serialization/deserialization tests for core types.
//!
//! Rows and signatures are emitted as JSON by the CLI, so their wire
//! shape is pinned here.

use serde_json::json;

use crate::{CatalogRow, SearchSignature, Selection, VehicleMake, VehicleType, YearFilter, YearRange};

// ============================================================================
// CatalogRow Serde Tests
// ============================================================================

#[test]
fn test_catalog_row_uses_camel_case() {
    let row = CatalogRow::new(440, "ASTON MARTIN", 1684, "V8 Vantage");
    let value = serde_json::to_value(&row).unwrap();

    assert_eq!(
        value,
        json!({
            "makeId": 440,
            "makeName": "ASTON MARTIN",
            "modelId": 1684,
            "modelName": "V8 Vantage"
        })
    );
}

#[test]
fn test_catalog_row_roundtrip() {
    let row = CatalogRow::new(1, "Acura", 10, "ILX");
    let json = serde_json::to_string(&row).unwrap();
    let parsed: CatalogRow = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, row);
}

// ============================================================================
// Make / Type Serde Tests
// ============================================================================

#[test]
fn test_vehicle_make_shape() {
    let make = VehicleMake::new(2, "Audi");
    assert_eq!(
        serde_json::to_value(&make).unwrap(),
        json!({ "id": 2, "name": "Audi" })
    );
}

#[test]
fn test_vehicle_type_shape() {
    let vt = VehicleType::new("Truck ");
    assert_eq!(serde_json::to_value(&vt).unwrap(), json!({ "name": "Truck" }));
}

// ============================================================================
// SearchSignature Serde Tests
// ============================================================================

#[test]
fn test_signature_serializes_as_plain_string() {
    let mut selection = Selection {
        vehicle_type: Some(VehicleType::new("Car")),
        makes: vec![VehicleMake::new(1, "Acura")],
        year: YearFilter::with_range(YearRange::new(1886, 2024)),
    };
    selection.year.set_enabled(true);
    selection.year.set_input("2001");

    let value = serde_json::to_value(selection.signature()).unwrap();
    assert_eq!(value, json!("type=Car;makes=1;year=2001"));

    let parsed: SearchSignature = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, selection.signature());
}
