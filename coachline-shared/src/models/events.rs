use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct VehicleConfiguredEvent {
    pub vehicle_id: Uuid,
    pub floors: i32,
    pub total_seats: i32,
    pub has_seat_map: bool,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct TripCreatedEvent {
    pub trip_id: Uuid,
    pub vehicle_id: Uuid,
    pub seat_count: usize,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct SeatStatusChangedEvent {
    pub trip_id: Uuid,
    pub seat_number: String,
    pub status: String, // AVAILABLE, HELD, BOOKED
    pub timestamp: i64,
}

/// Everything the services broadcast to subscribers.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    VehicleConfigured(VehicleConfiguredEvent),
    TripCreated(TripCreatedEvent),
    SeatStatusChanged(SeatStatusChangedEvent),
}
