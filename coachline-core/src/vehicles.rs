use chrono::Utc;
use coachline_fleet::{SeatDimensions, Vehicle};
use coachline_shared::{DomainEvent, VehicleConfiguredEvent};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::repository::VehicleRepository;
use crate::{CoreError, CoreResult, FleetRules};

/// Vehicle registration request. Without `dimensions` the vehicle is stored
/// as a legacy vehicle carrying only `total_seats`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicle {
    pub plate_number: String,
    pub name: String,
    pub dimensions: Option<SeatDimensions>,
    pub total_seats: Option<i32>,
}

/// Configures vehicles and persists their generated seat maps
#[derive(Clone)]
pub struct VehicleService {
    repo: Arc<dyn VehicleRepository>,
    rules: FleetRules,
    events: broadcast::Sender<DomainEvent>,
}

impl VehicleService {
    pub fn new(
        repo: Arc<dyn VehicleRepository>,
        rules: FleetRules,
        events: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self { repo, rules, events }
    }

    pub async fn create_vehicle(&self, req: NewVehicle) -> CoreResult<Vehicle> {
        if req.plate_number.trim().is_empty() {
            return Err(CoreError::ValidationError("plate_number is required".into()));
        }

        let vehicle = match req.dimensions {
            Some(dimensions) => {
                self.check_dimensions(&dimensions)?;
                Vehicle::configured(req.plate_number, req.name, dimensions)?
            }
            None => {
                let total_seats = req.total_seats.ok_or_else(|| {
                    CoreError::ValidationError("either dimensions or total_seats is required".into())
                })?;
                self.check_total_seats(total_seats)?;
                Vehicle::legacy(req.plate_number, req.name, total_seats)
            }
        };

        self.repo.save_vehicle(&vehicle).await?;
        info!(
            "Vehicle {} ({}) configured with {} seats",
            vehicle.id, vehicle.plate_number, vehicle.total_seats()
        );
        self.publish(&vehicle);

        Ok(vehicle)
    }

    /// Regenerate the seat maps of an existing vehicle.
    pub async fn reconfigure_vehicle(&self, id: Uuid, dimensions: SeatDimensions) -> CoreResult<Vehicle> {
        self.check_dimensions(&dimensions)?;

        let mut vehicle = self.get_vehicle(id).await?;
        vehicle.reconfigure(dimensions)?;

        self.repo.save_vehicle(&vehicle).await?;
        info!("Vehicle {} reconfigured with {} seats", vehicle.id, vehicle.total_seats());
        self.publish(&vehicle);

        Ok(vehicle)
    }

    pub async fn get_vehicle(&self, id: Uuid) -> CoreResult<Vehicle> {
        self.repo
            .get_vehicle(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("vehicle {}", id)))
    }

    pub async fn list_vehicles(&self) -> CoreResult<Vec<Vehicle>> {
        Ok(self.repo.list_vehicles().await?)
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> CoreResult<()> {
        if !self.repo.delete_vehicle(id).await? {
            return Err(CoreError::NotFound(format!("vehicle {}", id)));
        }
        info!("Vehicle {} deleted", id);
        Ok(())
    }

    /// Operator limits on top of the generator's own positivity check.
    fn check_dimensions(&self, dimensions: &SeatDimensions) -> CoreResult<()> {
        if dimensions.floors < 1 || dimensions.floors > self.rules.max_floors {
            return Err(CoreError::ValidationError(format!(
                "floors must be between 1 and {}, got {}",
                self.rules.max_floors, dimensions.floors
            )));
        }
        if dimensions.seat_rows > self.rules.max_seat_rows {
            return Err(CoreError::ValidationError(format!(
                "seat_rows must not exceed {}, got {}",
                self.rules.max_seat_rows, dimensions.seat_rows
            )));
        }
        if dimensions.seat_columns > self.rules.max_seat_columns {
            return Err(CoreError::ValidationError(format!(
                "seat_columns must not exceed {}, got {}",
                self.rules.max_seat_columns, dimensions.seat_columns
            )));
        }
        Ok(())
    }

    fn check_total_seats(&self, total_seats: i32) -> CoreResult<()> {
        if total_seats < 0 || total_seats > self.rules.max_total_seats {
            return Err(CoreError::ValidationError(format!(
                "total_seats must be between 0 and {}, got {}",
                self.rules.max_total_seats, total_seats
            )));
        }
        Ok(())
    }

    fn publish(&self, vehicle: &Vehicle) {
        // No subscribers is fine.
        let _ = self.events.send(DomainEvent::VehicleConfigured(VehicleConfiguredEvent {
            vehicle_id: vehicle.id,
            floors: vehicle.seating.floors,
            total_seats: vehicle.total_seats(),
            has_seat_map: vehicle.seating.has_seat_map(),
            timestamp: Utc::now().timestamp(),
        }));
    }
}
