pub mod models;

pub use models::events::{
    DomainEvent, SeatStatusChangedEvent, TripCreatedEvent, VehicleConfiguredEvent,
};
