use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::seat_map::{generate_seat_map_layout, SeatMapConfig, SeatMapError};

pub const LOWER_DECK_PREFIX: &str = "A";
pub const UPPER_DECK_PREFIX: &str = "B";

/// Admin-supplied seating dimensions of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatDimensions {
    pub seat_rows: i32,
    pub seat_columns: i32,
    #[serde(default)]
    pub aisle_positions: BTreeSet<i32>,
    #[serde(default = "default_floors")]
    pub floors: i32,
}

fn default_floors() -> i32 {
    1
}

/// Full seating configuration derived from [`SeatDimensions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub floors: i32,
    pub seat_rows: i32,
    pub seat_columns: i32,
    pub aisle_positions: BTreeSet<i32>,
    pub seat_map_floor1: SeatMapConfig,
    pub seat_map_floor2: Option<SeatMapConfig>,
    pub total_seats: i32,
}

/// Build both floors of a vehicle. Floor 1 is always generated with prefix
/// `A`; floor 2 only when `floors > 1`, with prefix `B` and its own counter.
pub fn calculate_vehicle_config(
    rows: i32,
    cols: i32,
    aisle_positions: &BTreeSet<i32>,
    floors: i32,
) -> Result<VehicleConfig, SeatMapError> {
    let lower = generate_seat_map_layout(rows, cols, aisle_positions, LOWER_DECK_PREFIX)?;
    let mut total_seats = lower.seat_count;

    let seat_map_floor2 = if floors > 1 {
        let upper = generate_seat_map_layout(rows, cols, aisle_positions, UPPER_DECK_PREFIX)?;
        total_seats += upper.seat_count;
        Some(upper.seat_map)
    } else {
        None
    };

    Ok(VehicleConfig {
        floors,
        seat_rows: rows,
        seat_columns: cols,
        aisle_positions: aisle_positions.clone(),
        seat_map_floor1: lower.seat_map,
        seat_map_floor2,
        total_seats,
    })
}

impl SeatDimensions {
    pub fn to_config(&self) -> Result<VehicleConfig, SeatMapError> {
        calculate_vehicle_config(
            self.seat_rows,
            self.seat_columns,
            &self.aisle_positions,
            self.floors,
        )
    }
}

/// Seating as stored on a vehicle record. Legacy vehicles carry only
/// `total_seats` with both seat maps unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSeating {
    pub floors: i32,
    #[serde(default)]
    pub seat_map_floor1: Option<SeatMapConfig>,
    #[serde(default)]
    pub seat_map_floor2: Option<SeatMapConfig>,
    pub total_seats: i32,
}

impl VehicleSeating {
    pub fn legacy(total_seats: i32) -> Self {
        Self {
            floors: 1,
            seat_map_floor1: None,
            seat_map_floor2: None,
            total_seats,
        }
    }

    pub fn has_seat_map(&self) -> bool {
        self.seat_map_floor1.is_some() || self.seat_map_floor2.is_some()
    }

    /// Validate stored seating. Legacy seating (no maps) only needs a
    /// non-negative count; otherwise floor 1 must be mapped, floor 2 must be
    /// mapped exactly when `floors > 1`, and the maps must add up to
    /// `total_seats`.
    pub fn validate(&self) -> Result<(), SeatMapError> {
        if self.total_seats < 0 {
            return Err(SeatMapError::MalformedLayout(format!(
                "negative total_seats {}",
                self.total_seats
            )));
        }
        if !self.has_seat_map() {
            return Ok(());
        }

        let Some(floor1) = &self.seat_map_floor1 else {
            return Err(SeatMapError::MalformedLayout(
                "upper deck seat map without a lower deck".into(),
            ));
        };
        if self.seat_map_floor2.is_some() != (self.floors > 1) {
            return Err(SeatMapError::MalformedLayout(format!(
                "{} floor(s) but upper deck seat map is {}",
                self.floors,
                if self.seat_map_floor2.is_some() { "present" } else { "missing" }
            )));
        }

        let mut mapped = 0usize;
        for seat_map in std::iter::once(floor1).chain(self.seat_map_floor2.iter()) {
            seat_map.validate()?;
            mapped += seat_map.seat_count();
        }
        if mapped != self.total_seats as usize {
            return Err(SeatMapError::MalformedLayout(format!(
                "seat maps hold {} seats but total_seats is {}",
                mapped, self.total_seats
            )));
        }
        Ok(())
    }
}

impl From<VehicleConfig> for VehicleSeating {
    fn from(config: VehicleConfig) -> Self {
        Self {
            floors: config.floors,
            seat_map_floor1: Some(config.seat_map_floor1),
            seat_map_floor2: config.seat_map_floor2,
            total_seats: config.total_seats,
        }
    }
}

/// A bus as registered by an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: String,
    pub name: String,
    pub dimensions: Option<SeatDimensions>,
    pub seating: VehicleSeating,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Register a vehicle with a generated seat map.
    pub fn configured(
        plate_number: String,
        name: String,
        dimensions: SeatDimensions,
    ) -> Result<Self, SeatMapError> {
        let seating = dimensions.to_config()?.into();
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            plate_number,
            name,
            dimensions: Some(dimensions),
            seating,
            created_at: now,
            updated_at: now,
        })
    }

    /// Register a vehicle known only by its seat count.
    pub fn legacy(plate_number: String, name: String, total_seats: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            plate_number,
            name,
            dimensions: None,
            seating: VehicleSeating::legacy(total_seats),
            created_at: now,
            updated_at: now,
        }
    }

    /// Regenerate seating from new dimensions. Trips already created keep
    /// their own seat copies.
    pub fn reconfigure(&mut self, dimensions: SeatDimensions) -> Result<(), SeatMapError> {
        self.seating = dimensions.to_config()?.into();
        self.dimensions = Some(dimensions);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn total_seats(&self) -> i32 {
        self.seating.total_seats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(seat_map: &SeatMapConfig) -> Vec<&str> {
        seat_map.layout.seat_labels().collect()
    }

    #[test]
    fn test_two_floor_numbering_restarts() {
        let config = calculate_vehicle_config(2, 2, &BTreeSet::new(), 2).unwrap();

        assert_eq!(labels(&config.seat_map_floor1), vec!["A01", "A02", "A03", "A04"]);
        let upper = config.seat_map_floor2.as_ref().unwrap();
        assert_eq!(labels(upper), vec!["B01", "B02", "B03", "B04"]);
        assert_eq!(config.total_seats, 8);
    }

    #[test]
    fn test_single_floor_has_no_upper_deck() {
        let config = calculate_vehicle_config(10, 4, &BTreeSet::from([3]), 1).unwrap();

        assert!(config.seat_map_floor2.is_none());
        assert_eq!(config.total_seats, 30);
    }

    #[test]
    fn test_zero_floors_behaves_like_single_floor() {
        let config = calculate_vehicle_config(2, 3, &BTreeSet::new(), 0).unwrap();
        assert!(config.seat_map_floor2.is_none());
        assert_eq!(config.total_seats, 6);
    }

    #[test]
    fn test_invalid_dimension_propagates() {
        let result = calculate_vehicle_config(3, 0, &BTreeSet::new(), 2);
        assert!(matches!(result, Err(SeatMapError::InvalidDimension { rows: 3, columns: 0 })));
    }

    #[test]
    fn test_seating_from_config() {
        let config = calculate_vehicle_config(2, 2, &BTreeSet::new(), 2).unwrap();
        let seating = VehicleSeating::from(config);

        assert!(seating.has_seat_map());
        assert_eq!(seating.total_seats, 8);
        assert!(seating.validate().is_ok());
    }

    fn two_floor_seating() -> VehicleSeating {
        VehicleSeating::from(calculate_vehicle_config(2, 2, &BTreeSet::new(), 2).unwrap())
    }

    #[test]
    fn test_upper_deck_must_match_floor_count() {
        let mut missing_upper = two_floor_seating();
        missing_upper.seat_map_floor2 = None;
        missing_upper.total_seats = 4;
        assert!(matches!(missing_upper.validate(), Err(SeatMapError::MalformedLayout(_))));

        let mut extra_upper = two_floor_seating();
        extra_upper.floors = 1;
        assert!(matches!(extra_upper.validate(), Err(SeatMapError::MalformedLayout(_))));
    }

    #[test]
    fn test_upper_deck_alone_is_rejected() {
        let mut seating = two_floor_seating();
        seating.seat_map_floor1 = None;
        seating.total_seats = 4;
        assert!(matches!(seating.validate(), Err(SeatMapError::MalformedLayout(_))));
    }

    #[test]
    fn test_total_seats_must_match_maps() {
        let mut seating = two_floor_seating();
        seating.total_seats = 9;
        assert!(matches!(seating.validate(), Err(SeatMapError::MalformedLayout(_))));
    }

    #[test]
    fn test_legacy_seating_validates() {
        assert!(VehicleSeating::legacy(29).validate().is_ok());
        assert!(VehicleSeating::legacy(-1).validate().is_err());

        let single = VehicleSeating::from(calculate_vehicle_config(2, 3, &BTreeSet::new(), 0).unwrap());
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_legacy_vehicle_has_no_seat_map() {
        let vehicle = Vehicle::legacy("51B-12345".into(), "Old coach".into(), 29);

        assert!(!vehicle.seating.has_seat_map());
        assert_eq!(vehicle.total_seats(), 29);
        assert!(vehicle.dimensions.is_none());
    }

    #[test]
    fn test_reconfigure_replaces_seating() {
        let dimensions = SeatDimensions {
            seat_rows: 2,
            seat_columns: 3,
            aisle_positions: BTreeSet::from([2]),
            floors: 1,
        };
        let mut vehicle = Vehicle::configured("51B-1".into(), "Sleeper".into(), dimensions).unwrap();
        assert_eq!(vehicle.total_seats(), 4);

        vehicle
            .reconfigure(SeatDimensions {
                seat_rows: 3,
                seat_columns: 3,
                aisle_positions: BTreeSet::from([2]),
                floors: 2,
            })
            .unwrap();
        assert_eq!(vehicle.total_seats(), 12);
        assert!(vehicle.seating.seat_map_floor2.is_some());
    }

    #[test]
    fn test_dimensions_default_to_one_floor() {
        let dimensions: SeatDimensions =
            serde_json::from_value(serde_json::json!({ "seat_rows": 2, "seat_columns": 2 })).unwrap();
        assert_eq!(dimensions.floors, 1);
        assert!(dimensions.aisle_positions.is_empty());
    }
}
