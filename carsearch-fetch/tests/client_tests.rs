//! Integration tests for `CatalogClient` against an in-process stub catalog.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use carsearch_core::{CatalogRow, VehicleMake, VehicleType};
use carsearch_fetch::{CatalogApi, CatalogClient, CatalogSettings, FetchError, RetryPolicy};
use serde_json::{json, Value};
use tokio::net::TcpListener;

// ============================================================================
// Stub Server
// ============================================================================

#[derive(Clone, Default)]
struct Stub {
    /// Number of leading model requests answered with 503.
    failing_model_requests: Arc<AtomicUsize>,
    model_requests: Arc<AtomicUsize>,
}

async fn vehicle_types(
    Path(variable): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if variable != "vehicle type" || query.get("format").map(String::as_str) != Some("json") {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    }
    Json(json!({
        "Count": 2,
        "Message": "Response returned successfully",
        "Results": [
            {"Id": 2, "Name": "Passenger Car "},
            {"Id": 1, "Name": "Motorcycle"}
        ]
    }))
    .into_response()
}

async fn makes(Path(vehicle_type): Path<String>) -> Json<Value> {
    let results = if vehicle_type == "Passenger Car" {
        json!([
            {"MakeId": 474, "MakeName": "HONDA"},
            {"MakeId": 440, "MakeName": "ASTON MARTIN"},
            {"MakeId": 582, "MakeName": "audi"}
        ])
    } else {
        json!([])
    };
    Json(json!({ "Count": 0, "Results": results }))
}

async fn models(
    State(stub): State<Stub>,
    Path((make_id, year, vehicle_type)): Path<(i64, i32, String)>,
) -> impl IntoResponse {
    stub.model_requests.fetch_add(1, Ordering::SeqCst);
    let remaining = stub.failing_model_requests.load(Ordering::SeqCst);
    if remaining > 0 {
        stub.failing_model_requests.fetch_sub(1, Ordering::SeqCst);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    Json(json!({
        "SearchCriteria": format!("Make ID: {make_id} | ModelYear: {year} | VehicleType: {vehicle_type}"),
        "Results": [
            {"Make_ID": make_id, "Make_Name": "ASTON MARTIN", "Model_ID": 1684, "Model_Name": "V8 Vantage"},
            {"Make_ID": make_id, "Make_Name": "ASTON MARTIN", "Model_ID": 1686, "Model_Name": "DB9"}
        ]
    }))
    .into_response()
}

async fn models_any_year(Path((make_id, _vehicle_type)): Path<(i64, String)>) -> Json<Value> {
    Json(json!({ "Results": [
        {"Make_ID": make_id, "Make_Name": "ASTON MARTIN", "Model_ID": 1, "Model_Name": "Lagonda"}
    ]}))
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

fn router(stub: Stub) -> Router {
    Router::new()
        .route("/api/vehicles/getvehiclevariablevalueslist/{variable}", get(vehicle_types))
        .route("/api/vehicles/GetMakesForVehicleType/{vehicle_type}", get(makes))
        .route(
            "/api/vehicles/GetModelsForMakeIdYear/makeId/{make_id}/modelyear/{year}/vehicleType/{vehicle_type}",
            get(models),
        )
        .route(
            "/api/vehicles/GetModelsForMakeIdYear/makeId/{make_id}/vehicleType/{vehicle_type}",
            get(models_any_year),
        )
        .route("/broken/GetMakesForVehicleType/{vehicle_type}", get(not_json))
        .with_state(stub)
}

async fn start(stub: Stub) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(stub);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

fn client(addr: SocketAddr, path: &str) -> CatalogClient {
    let settings = CatalogSettings::default().with_base_url(format!("http://{addr}{path}"));
    CatalogClient::with_settings(&settings).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_list_vehicle_types_trims_names() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/api/vehicles");

    let types = client.list_vehicle_types().await.unwrap();

    assert_eq!(
        types,
        vec![VehicleType::new("Passenger Car"), VehicleType::new("Motorcycle")]
    );
}

#[tokio::test]
async fn test_list_makes_sorted_case_insensitively() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/api/vehicles/");

    let makes = client
        .list_makes(&VehicleType::new("Passenger Car"))
        .await
        .unwrap();

    let names: Vec<&str> = makes.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["ASTON MARTIN", "audi", "HONDA"]);
}

#[tokio::test]
async fn test_list_makes_empty_for_unknown_type() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/api/vehicles");

    let makes = client.list_makes(&VehicleType::new("Hovercraft")).await.unwrap();
    assert!(makes.is_empty());
}

#[tokio::test]
async fn test_list_models_with_year() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/api/vehicles");
    let make = VehicleMake::new(440, "ASTON MARTIN");

    let rows = client
        .list_models(&VehicleType::new("Passenger Car"), &make, Some(2015))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![
            CatalogRow::new(440, "ASTON MARTIN", 1684, "V8 Vantage"),
            CatalogRow::new(440, "ASTON MARTIN", 1686, "DB9"),
        ]
    );
}

#[tokio::test]
async fn test_list_models_without_year_omits_segment() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/api/vehicles");
    let make = VehicleMake::new(440, "ASTON MARTIN");

    let rows = client
        .list_models(&VehicleType::new("Passenger Car"), &make, None)
        .await
        .unwrap();

    assert_eq!(rows, vec![CatalogRow::new(440, "ASTON MARTIN", 1, "Lagonda")]);
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let stub = Stub::default();
    stub.failing_model_requests.store(1, Ordering::SeqCst);
    let addr = start(stub).await;
    let client = client(addr, "/api/vehicles");

    let err = client
        .list_models(&VehicleType::new("Car"), &VehicleMake::new(1, "A"), Some(2000))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/broken");

    let err = client.list_makes(&VehicleType::new("Car")).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_missing_route_is_status_error() {
    let addr = start(Stub::default()).await;
    let client = client(addr, "/elsewhere");

    let err = client.list_vehicle_types().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404 }));
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failures() {
    let stub = Stub::default();
    stub.failing_model_requests.store(2, Ordering::SeqCst);
    let requests = Arc::clone(&stub.model_requests);
    let addr = start(stub).await;
    let client = client(addr, "/api/vehicles");
    let policy = RetryPolicy::unbounded().with_base_delay(0);

    let vehicle_type = VehicleType::new("Passenger Car");
    let make = VehicleMake::new(440, "ASTON MARTIN");
    let mut failures = Vec::new();

    let rows = policy
        .run_with_retry(
            || client.list_models(&vehicle_type, &make, Some(2015)),
            |attempt, _, _| failures.push(attempt),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(failures, vec![1, 2]);
    assert_eq!(requests.load(Ordering::SeqCst), 3);
}
