use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{SeatStatus, Trip, TripSeat};

/// Seat counts of a trip by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAvailability {
    pub total: usize,
    pub available: usize,
    pub held: usize,
    pub booked: usize,
}

/// A requested seat status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatAction {
    Hold,
    Book,
    Release,
}

impl SeatAction {
    /// Status the seat ends up in
    pub fn target(self) -> SeatStatus {
        match self {
            SeatAction::Hold => SeatStatus::Held,
            SeatAction::Book => SeatStatus::Booked,
            SeatAction::Release => SeatStatus::Available,
        }
    }

    /// Statuses the seat may be in for the change to apply
    pub fn allowed_from(self) -> &'static [SeatStatus] {
        match self {
            SeatAction::Hold => &[SeatStatus::Available],
            SeatAction::Book => &[SeatStatus::Available, SeatStatus::Held],
            SeatAction::Release => &[SeatStatus::Held, SeatStatus::Booked],
        }
    }

    pub fn permits(self, from: SeatStatus) -> bool {
        self.allowed_from().contains(&from)
    }

    /// Error for a seat found in `from`, which this action does not accept
    pub fn rejection(self, seat_number: &str, from: SeatStatus) -> SeatError {
        SeatError::InvalidTransition {
            seat: seat_number.to_string(),
            from,
            to: self.target(),
        }
    }
}

impl Trip {
    /// Transition: Available → Held
    pub fn hold_seat(&mut self, seat_number: &str) -> Result<&TripSeat, SeatError> {
        self.apply_seat_action(SeatAction::Hold, seat_number)
    }

    /// Transition: Available | Held → Booked
    pub fn book_seat(&mut self, seat_number: &str) -> Result<&TripSeat, SeatError> {
        self.apply_seat_action(SeatAction::Book, seat_number)
    }

    /// Transition: Held | Booked → Available
    pub fn release_seat(&mut self, seat_number: &str) -> Result<&TripSeat, SeatError> {
        self.apply_seat_action(SeatAction::Release, seat_number)
    }

    pub fn apply_seat_action(
        &mut self,
        action: SeatAction,
        seat_number: &str,
    ) -> Result<&TripSeat, SeatError> {
        let idx = self
            .seats
            .iter()
            .position(|s| s.seat_number == seat_number)
            .ok_or_else(|| SeatError::NotFound(seat_number.to_string()))?;

        let from = self.seats[idx].status;
        if !action.permits(from) {
            return Err(action.rejection(seat_number, from));
        }

        self.seats[idx].status = action.target();
        self.updated_at = Utc::now();
        Ok(&self.seats[idx])
    }

    pub fn availability(&self) -> SeatAvailability {
        self.seats.iter().fold(
            SeatAvailability {
                total: self.seats.len(),
                ..Default::default()
            },
            |mut acc, seat| {
                match seat.status {
                    SeatStatus::Available => acc.available += 1,
                    SeatStatus::Held => acc.held += 1,
                    SeatStatus::Booked => acc.booked += 1,
                }
                acc
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("Seat not found: {0}")]
    NotFound(String),

    #[error("Invalid seat transition for {seat} from {from} to {to}")]
    InvalidTransition {
        seat: String,
        from: SeatStatus,
        to: SeatStatus,
    },
}
