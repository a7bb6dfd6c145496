pub mod seat_map;
pub mod vehicle;

pub use seat_map::{generate_seat_map_layout, GeneratedSeatMap, SeatLayout, SeatMapConfig, SeatMapError};
pub use vehicle::{calculate_vehicle_config, SeatDimensions, Vehicle, VehicleConfig, VehicleSeating};
