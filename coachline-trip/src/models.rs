use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Booking status of a single trip seat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Held,
    Booked,
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeatStatus::Available => "AVAILABLE",
            SeatStatus::Held => "HELD",
            SeatStatus::Booked => "BOOKED",
        };
        f.write_str(label)
    }
}

/// A bookable seat slot owned by one trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripSeat {
    pub seat_number: String,
    pub status: SeatStatus,
}

impl TripSeat {
    pub fn available(seat_number: impl Into<String>) -> Self {
        Self {
            seat_number: seat_number.into(),
            status: SeatStatus::Available,
        }
    }
}

/// A scheduled departure of a vehicle with its own seat inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub seats: Vec<TripSeat>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        vehicle_id: Uuid,
        origin: String,
        destination: String,
        departure_time: DateTime<Utc>,
        seats: Vec<TripSeat>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            origin,
            destination,
            departure_time,
            seats,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn seat(&self, seat_number: &str) -> Option<&TripSeat> {
        self.seats.iter().find(|s| s.seat_number == seat_number)
    }
}
