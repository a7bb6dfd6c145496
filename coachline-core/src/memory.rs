use async_trait::async_trait;
use coachline_fleet::Vehicle;
use coachline_trip::{SeatAction, Trip};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{RepoError, SeatUpdate, TripRepository, VehicleRepository};

/// In-memory vehicle store, used when no database is configured and in tests
#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<HashMap<Uuid, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), RepoError> {
        self.vehicles.write().await.insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, RepoError> {
        Ok(self.vehicles.read().await.get(&id).cloned())
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, RepoError> {
        let mut vehicles: Vec<Vehicle> = self.vehicles.read().await.values().cloned().collect();
        vehicles.sort_by(|a, b| a.plate_number.cmp(&b.plate_number));
        Ok(vehicles)
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.vehicles.write().await.remove(&id).is_some())
    }
}

/// In-memory trip store
#[derive(Default)]
pub struct InMemoryTripRepository {
    trips: RwLock<HashMap<Uuid, Trip>>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), RepoError> {
        self.trips.write().await.insert(trip.id, trip.clone());
        Ok(())
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, RepoError> {
        Ok(self.trips.read().await.get(&id).cloned())
    }

    async fn list_trips_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Trip>, RepoError> {
        let mut trips: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|t| t.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        trips.sort_by_key(|t| t.departure_time);
        Ok(trips)
    }

    async fn delete_trip(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.trips.write().await.remove(&id).is_some())
    }

    async fn apply_seat_action(
        &self,
        trip_id: Uuid,
        seat_number: &str,
        action: SeatAction,
    ) -> Result<SeatUpdate, RepoError> {
        // Held across the status check and the write
        let mut trips = self.trips.write().await;
        let Some(trip) = trips.get_mut(&trip_id) else {
            return Ok(SeatUpdate::TripNotFound);
        };

        Ok(match trip.apply_seat_action(action, seat_number) {
            Ok(seat) => SeatUpdate::Applied(seat.clone()),
            Err(err) => SeatUpdate::Rejected(err),
        })
    }
}
