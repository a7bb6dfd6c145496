use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use coachline_core::NewVehicle;
use coachline_fleet::{SeatDimensions, Vehicle};
use coachline_trip::Trip;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/v1/admin/vehicles/{id}", get(get_vehicle).delete(delete_vehicle))
        .route("/v1/admin/vehicles/{id}/seating", put(reconfigure_vehicle))
        .route("/v1/admin/vehicles/{id}/trips", get(list_vehicle_trips))
}

/// POST /v1/admin/vehicles
async fn create_vehicle(
    State(state): State<AppState>,
    Json(req): Json<NewVehicle>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let vehicle = state.vehicles.create_vehicle(req).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// GET /v1/admin/vehicles
async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    Ok(Json(state.vehicles.list_vehicles().await?))
}

/// GET /v1/admin/vehicles/{id}
async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(state.vehicles.get_vehicle(id).await?))
}

/// PUT /v1/admin/vehicles/{id}/seating
async fn reconfigure_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dimensions): Json<SeatDimensions>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(state.vehicles.reconfigure_vehicle(id, dimensions).await?))
}

/// DELETE /v1/admin/vehicles/{id}
async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.vehicles.delete_vehicle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/admin/vehicles/{id}/trips
async fn list_vehicle_trips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Trip>>, AppError> {
    Ok(Json(state.trips.list_trips_for_vehicle(id).await?))
}
