use chrono::{DateTime, Utc};
use coachline_shared::{DomainEvent, SeatStatusChangedEvent, TripCreatedEvent};
use coachline_trip::{initialize_trip_seats, SeatAction, SeatAvailability, Trip, TripSeat};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::repository::{SeatUpdate, TripRepository, VehicleRepository};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    pub vehicle_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
}

/// Creates trips from vehicle seat maps and applies seat status changes
#[derive(Clone)]
pub struct TripService {
    vehicles: Arc<dyn VehicleRepository>,
    trips: Arc<dyn TripRepository>,
    events: broadcast::Sender<DomainEvent>,
}

impl TripService {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        trips: Arc<dyn TripRepository>,
        events: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self { vehicles, trips, events }
    }

    pub async fn create_trip(&self, req: NewTrip) -> CoreResult<Trip> {
        let vehicle = self
            .vehicles
            .get_vehicle(req.vehicle_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("vehicle {}", req.vehicle_id)))?;

        let seats = initialize_trip_seats(&vehicle.seating);
        if !vehicle.seating.has_seat_map() {
            warn!(
                "Vehicle {} has no seat map, trip uses {} generic seats",
                vehicle.id,
                seats.len()
            );
        }

        let trip = Trip::new(vehicle.id, req.origin, req.destination, req.departure_time, seats);
        self.trips.insert_trip(&trip).await?;
        info!(
            "Trip {} created on vehicle {} with {} seats",
            trip.id,
            vehicle.id,
            trip.seats.len()
        );

        let _ = self.events.send(DomainEvent::TripCreated(TripCreatedEvent {
            trip_id: trip.id,
            vehicle_id: vehicle.id,
            seat_count: trip.seats.len(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(trip)
    }

    pub async fn get_trip(&self, id: Uuid) -> CoreResult<Trip> {
        self.trips
            .get_trip(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("trip {}", id)))
    }

    pub async fn list_trips_for_vehicle(&self, vehicle_id: Uuid) -> CoreResult<Vec<Trip>> {
        Ok(self.trips.list_trips_for_vehicle(vehicle_id).await?)
    }

    pub async fn delete_trip(&self, id: Uuid) -> CoreResult<()> {
        if !self.trips.delete_trip(id).await? {
            return Err(CoreError::NotFound(format!("trip {}", id)));
        }
        info!("Trip {} deleted", id);
        Ok(())
    }

    pub async fn availability(&self, id: Uuid) -> CoreResult<SeatAvailability> {
        Ok(self.get_trip(id).await?.availability())
    }

    pub async fn hold_seat(&self, trip_id: Uuid, seat_number: &str) -> CoreResult<TripSeat> {
        self.update_seat(trip_id, seat_number, SeatAction::Hold).await
    }

    pub async fn book_seat(&self, trip_id: Uuid, seat_number: &str) -> CoreResult<TripSeat> {
        self.update_seat(trip_id, seat_number, SeatAction::Book).await
    }

    pub async fn release_seat(&self, trip_id: Uuid, seat_number: &str) -> CoreResult<TripSeat> {
        self.update_seat(trip_id, seat_number, SeatAction::Release).await
    }

    pub async fn update_seat(
        &self,
        trip_id: Uuid,
        seat_number: &str,
        action: SeatAction,
    ) -> CoreResult<TripSeat> {
        let seat = match self.trips.apply_seat_action(trip_id, seat_number, action).await? {
            SeatUpdate::Applied(seat) => seat,
            SeatUpdate::Rejected(err) => {
                warn!("Seat {} on trip {} rejected {:?}: {}", seat_number, trip_id, action, err);
                return Err(err.into());
            }
            SeatUpdate::TripNotFound => {
                return Err(CoreError::NotFound(format!("trip {}", trip_id)));
            }
        };
        info!("Seat {} on trip {} is now {}", seat.seat_number, trip_id, seat.status);

        let _ = self.events.send(DomainEvent::SeatStatusChanged(SeatStatusChangedEvent {
            trip_id,
            seat_number: seat.seat_number.clone(),
            status: seat.status.to_string(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(seat)
    }
}
