pub mod models;
pub mod materializer;
pub mod inventory;

pub use models::{SeatStatus, Trip, TripSeat};
pub use materializer::initialize_trip_seats;
pub use inventory::{SeatAction, SeatAvailability, SeatError};
