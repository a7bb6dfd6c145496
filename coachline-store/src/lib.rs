pub mod app_config;
pub mod database;
pub mod vehicle_repo;
pub mod trip_repo;

pub use database::DbClient;
pub use trip_repo::PostgresTripRepository;
pub use vehicle_repo::PostgresVehicleRepository;
