pub mod repository;
pub mod memory;
pub mod vehicles;
pub mod trips;

use coachline_fleet::SeatMapError;
use coachline_trip::SeatError;
use serde::Deserialize;

pub use memory::{InMemoryTripRepository, InMemoryVehicleRepository};
pub use repository::{RepoError, SeatUpdate, TripRepository, VehicleRepository};
pub use trips::{NewTrip, TripService};
pub use vehicles::{NewVehicle, VehicleService};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<SeatMapError> for CoreError {
    fn from(err: SeatMapError) -> Self {
        CoreError::ValidationError(err.to_string())
    }
}

impl From<SeatError> for CoreError {
    fn from(err: SeatError) -> Self {
        match err {
            SeatError::NotFound(_) => CoreError::NotFound(err.to_string()),
            SeatError::InvalidTransition { .. } => CoreError::Conflict(err.to_string()),
        }
    }
}

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        CoreError::InternalError(err.to_string())
    }
}

/// Limits applied when operators configure vehicle seating.
#[derive(Debug, Deserialize, Clone)]
pub struct FleetRules {
    #[serde(default = "default_max_floors")]
    pub max_floors: i32,
    #[serde(default = "default_max_seat_rows")]
    pub max_seat_rows: i32,
    #[serde(default = "default_max_seat_columns")]
    pub max_seat_columns: i32,
    /// Upper bound for vehicles registered by seat count only
    #[serde(default = "default_max_total_seats")]
    pub max_total_seats: i32,
}

fn default_max_floors() -> i32 { 2 }
fn default_max_seat_rows() -> i32 { 30 }
fn default_max_seat_columns() -> i32 { 8 }
fn default_max_total_seats() -> i32 { 480 }

impl Default for FleetRules {
    fn default() -> Self {
        Self {
            max_floors: default_max_floors(),
            max_seat_rows: default_max_seat_rows(),
            max_seat_columns: default_max_seat_columns(),
            max_total_seats: default_max_total_seats(),
        }
    }
}
