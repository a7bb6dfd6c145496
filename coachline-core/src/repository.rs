use async_trait::async_trait;
use coachline_fleet::Vehicle;
use coachline_trip::{SeatAction, SeatError, Trip, TripSeat};
use uuid::Uuid;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for vehicle records
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Insert or replace a vehicle
    async fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), RepoError>;

    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, RepoError>;

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, RepoError>;

    /// Returns whether a vehicle was removed
    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Repository trait for trips and their seat inventory
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a new trip together with all of its seats
    async fn insert_trip(&self, trip: &Trip) -> Result<(), RepoError>;

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, RepoError>;

    async fn list_trips_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Trip>, RepoError>;

    /// Returns whether a trip was removed
    async fn delete_trip(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Change one seat's status, only if its current status still permits
    /// `action`. The check and the write are a single atomic step.
    async fn apply_seat_action(
        &self,
        trip_id: Uuid,
        seat_number: &str,
        action: SeatAction,
    ) -> Result<SeatUpdate, RepoError>;
}

/// Outcome of [`TripRepository::apply_seat_action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatUpdate {
    Applied(TripSeat),
    Rejected(SeatError),
    TripNotFound,
}
