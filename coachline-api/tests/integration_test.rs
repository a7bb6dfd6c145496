use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use coachline_api::{app, AppState};
use coachline_core::{FleetRules, InMemoryTripRepository, InMemoryVehicleRepository};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tower::ServiceExt;

fn test_app() -> Router {
    let (events_tx, _) = broadcast::channel(16);
    app(AppState::new(
        Arc::new(InMemoryVehicleRepository::new()),
        Arc::new(InMemoryTripRepository::new()),
        FleetRules::default(),
        events_tx,
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn seat_numbers(trip: &Value) -> Vec<String> {
    trip["seats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["seat_number"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_vehicle_to_trip_flow() {
    let app = test_app();

    let (status, vehicle) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({
            "plate_number": "51B-10001",
            "name": "Limousine",
            "dimensions": { "seat_rows": 3, "seat_columns": 4, "aisle_positions": [2], "floors": 1 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vehicle["seating"]["total_seats"], 9);
    assert_eq!(
        vehicle["seating"]["seat_map_floor1"]["layout"][0],
        json!(["A01", null, "A02", "A03"])
    );
    assert!(vehicle["seating"]["seat_map_floor2"].is_null());

    let (status, trip) = send(
        &app,
        "POST",
        "/v1/trips",
        Some(json!({
            "vehicle_id": vehicle["id"],
            "origin": "Ha Noi",
            "destination": "Sa Pa",
            "departure_time": "2026-11-01T22:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        seat_numbers(&trip),
        vec!["A01", "A02", "A03", "A04", "A05", "A06", "A07", "A08", "A09"]
    );
    assert!(trip["seats"].as_array().unwrap().iter().all(|s| s["status"] == "AVAILABLE"));

    let trip_id = trip["id"].as_str().unwrap();
    let (status, seat) = send(&app, "POST", &format!("/v1/trips/{}/seats/A05/hold", trip_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seat["status"], "HELD");

    let (status, _) = send(&app, "POST", &format!("/v1/trips/{}/seats/A05/hold", trip_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, seat) = send(&app, "POST", &format!("/v1/trips/{}/seats/A05/book", trip_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seat["status"], "BOOKED");

    let (status, availability) = send(&app, "GET", &format!("/v1/trips/{}/availability", trip_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(availability, json!({ "total": 9, "available": 8, "held": 0, "booked": 1 }));
}

#[tokio::test]
async fn test_two_floor_vehicle() {
    let app = test_app();

    let (status, vehicle) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({
            "plate_number": "51B-10002",
            "name": "Sleeper",
            "dimensions": { "seat_rows": 2, "seat_columns": 2, "floors": 2 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vehicle["seating"]["total_seats"], 8);

    let (_, trip) = send(
        &app,
        "POST",
        "/v1/trips",
        Some(json!({
            "vehicle_id": vehicle["id"],
            "origin": "Da Nang",
            "destination": "Hue",
            "departure_time": "2026-11-02T06:30:00Z"
        })),
    )
    .await;
    assert_eq!(
        seat_numbers(&trip),
        vec!["A01", "A02", "A03", "A04", "B01", "B02", "B03", "B04"]
    );
}

#[tokio::test]
async fn test_legacy_vehicle_trip_uses_generic_seats() {
    let app = test_app();

    let (_, vehicle) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({ "plate_number": "29A-00042", "name": "Minibus", "total_seats": 3 })),
    )
    .await;

    let (status, trip) = send(
        &app,
        "POST",
        "/v1/trips",
        Some(json!({
            "vehicle_id": vehicle["id"],
            "origin": "Can Tho",
            "destination": "Ca Mau",
            "departure_time": "2026-11-03T08:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(seat_numbers(&trip), vec!["G1", "G2", "G3"]);
}

#[tokio::test]
async fn test_zero_rows_is_bad_request() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({
            "plate_number": "51B-10003",
            "name": "Broken",
            "dimensions": { "seat_rows": 0, "seat_columns": 4 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid seat map dimensions"));
}

#[tokio::test]
async fn test_unknown_trip_is_not_found() {
    let app = test_app();

    let (status, _) = send(&app, "GET", &format!("/v1/trips/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/trips/{}/seats/A01/hold", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reconfigure_keeps_existing_trip_seats() {
    let app = test_app();

    let (_, vehicle) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({
            "plate_number": "51B-10004",
            "name": "Coach",
            "dimensions": { "seat_rows": 1, "seat_columns": 2 }
        })),
    )
    .await;
    let vehicle_id = vehicle["id"].as_str().unwrap();

    let (_, trip) = send(
        &app,
        "POST",
        "/v1/trips",
        Some(json!({
            "vehicle_id": vehicle_id,
            "origin": "Vung Tau",
            "destination": "Phan Thiet",
            "departure_time": "2026-11-04T07:00:00Z"
        })),
    )
    .await;

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/v1/admin/vehicles/{}/seating", vehicle_id),
        Some(json!({ "seat_rows": 4, "seat_columns": 4, "aisle_positions": [3] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["seating"]["total_seats"], 12);

    let (_, stored) = send(&app, "GET", &format!("/v1/trips/{}", trip["id"].as_str().unwrap()), None).await;
    assert_eq!(seat_numbers(&stored), vec!["A01", "A02"]);

    let (status, trips) = send(&app, "GET", &format!("/v1/admin/vehicles/{}/trips", vehicle_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trips.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_vehicle_then_get() {
    let app = test_app();

    let (_, vehicle) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({ "plate_number": "51B-10005", "name": "Van", "total_seats": 7 })),
    )
    .await;
    let uri = format!("/v1/admin/vehicles/{}", vehicle["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_legacy_vehicle_is_bad_request() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({ "plate_number": "51B-10006", "name": "Huge", "total_seats": 2147483647 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("total_seats"));
}

#[tokio::test]
async fn test_overlapping_holds_yield_one_conflict() {
    let app = test_app();

    let (_, vehicle) = send(
        &app,
        "POST",
        "/v1/admin/vehicles",
        Some(json!({ "plate_number": "51B-10007", "name": "Van", "total_seats": 2 })),
    )
    .await;
    let (_, trip) = send(
        &app,
        "POST",
        "/v1/trips",
        Some(json!({
            "vehicle_id": vehicle["id"],
            "origin": "Quy Nhon",
            "destination": "Pleiku",
            "departure_time": "2026-11-05T09:00:00Z"
        })),
    )
    .await;
    let hold = format!("/v1/trips/{}/seats/G1/hold", trip["id"].as_str().unwrap());

    let ((first, _), (second, _)) = tokio::join!(
        send(&app, "POST", &hold, None),
        send(&app, "POST", &hold, None)
    );
    let mut statuses = vec![first, second];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
}
