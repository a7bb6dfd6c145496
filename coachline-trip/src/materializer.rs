use coachline_fleet::{SeatMapConfig, VehicleSeating};

use crate::models::TripSeat;

pub const GENERIC_SEAT_PREFIX: &str = "G";

/// Build the seat inventory of a new trip from the vehicle's stored seating.
///
/// Floor 1 comes first, then floor 2 when the vehicle has more than one floor,
/// each read row by row and left to right with aisle cells skipped. When no
/// seat at all comes out of the seat maps, `total_seats` generic seats
/// `G1..Gn` are created instead.
pub fn initialize_trip_seats(seating: &VehicleSeating) -> Vec<TripSeat> {
    let mut seats = Vec::new();

    if let Some(lower) = &seating.seat_map_floor1 {
        append_floor(&mut seats, lower);
    }

    if seating.floors > 1 {
        if let Some(upper) = &seating.seat_map_floor2 {
            append_floor(&mut seats, upper);
        }
    }

    // Also triggers for a configured map that yields no seats (all aisles).
    if seats.is_empty() && seating.total_seats > 0 {
        seats = (1..=seating.total_seats)
            .map(|n| TripSeat::available(format!("{}{}", GENERIC_SEAT_PREFIX, n)))
            .collect();
    }

    seats
}

fn append_floor(seats: &mut Vec<TripSeat>, seat_map: &SeatMapConfig) {
    seats.extend(seat_map.layout.seat_labels().map(TripSeat::available));
}
