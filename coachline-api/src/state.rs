use std::sync::Arc;

use coachline_core::{FleetRules, TripRepository, TripService, VehicleRepository, VehicleService};
use coachline_shared::DomainEvent;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub vehicles: VehicleService,
    pub trips: TripService,
    pub events_tx: broadcast::Sender<DomainEvent>,
}

impl AppState {
    pub fn new(
        vehicle_repo: Arc<dyn VehicleRepository>,
        trip_repo: Arc<dyn TripRepository>,
        fleet_rules: FleetRules,
        events_tx: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            vehicles: VehicleService::new(vehicle_repo.clone(), fleet_rules, events_tx.clone()),
            trips: TripService::new(vehicle_repo, trip_repo, events_tx.clone()),
            events_tx,
        }
    }
}
