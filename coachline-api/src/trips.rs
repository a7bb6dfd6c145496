use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use coachline_core::NewTrip;
use coachline_shared::DomainEvent;
use coachline_trip::{SeatAction, SeatAvailability, Trip, TripSeat};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips", post(create_trip))
        .route("/v1/trips/{id}", get(get_trip).delete(delete_trip))
        .route("/v1/trips/{id}/availability", get(get_availability))
        .route("/v1/trips/{id}/seats/{seat}/{action}", post(update_seat))
        .route("/v1/trips/{id}/stream", get(stream_seat_changes))
}

/// POST /v1/trips
async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let trip = state.trips.create_trip(req).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /v1/trips/{id}
async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.trips.get_trip(id).await?))
}

/// DELETE /v1/trips/{id}
async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.trips.delete_trip(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/trips/{id}/availability
async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatAvailability>, AppError> {
    Ok(Json(state.trips.availability(id).await?))
}

/// POST /v1/trips/{id}/seats/{seat}/{hold|book|release}
async fn update_seat(
    State(state): State<AppState>,
    Path((id, seat, action)): Path<(Uuid, String, SeatAction)>,
) -> Result<Json<TripSeat>, AppError> {
    Ok(Json(state.trips.update_seat(id, &seat, action).await?))
}

/// GET /v1/trips/{id}/stream
///
/// Server-sent seat status changes for one trip.
async fn stream_seat_changes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Unknown trips are a 404 rather than an empty stream
    state.trips.get_trip(id).await?;

    let rx = state.events_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(DomainEvent::SeatStatusChanged(event)) if event.trip_id == id => Event::default()
                .event("seat_status_changed")
                .json_data(&event)
                .ok()
                .map(Ok),
            // Lagged receivers just skip what they missed
            _ => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
