use async_trait::async_trait;
use coachline_core::repository::{RepoError, VehicleRepository};
use coachline_fleet::{SeatDimensions, SeatMapConfig, Vehicle, VehicleSeating};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresVehicleRepository {
    pool: PgPool,
}

impl PostgresVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    plate_number: String,
    name: String,
    dimensions: Option<Json<SeatDimensions>>,
    floors: i32,
    total_seats: i32,
    seat_map_floor1: Option<Json<SeatMapConfig>>,
    seat_map_floor2: Option<Json<SeatMapConfig>>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = RepoError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let seating = VehicleSeating {
            floors: row.floors,
            seat_map_floor1: row.seat_map_floor1.map(|j| j.0),
            seat_map_floor2: row.seat_map_floor2.map(|j| j.0),
            total_seats: row.total_seats,
        };
        seating
            .validate()
            .map_err(|e| format!("vehicle {} has a corrupt seat map: {}", row.id, e))?;

        Ok(Vehicle {
            id: row.id,
            plate_number: row.plate_number,
            name: row.name,
            dimensions: row.dimensions.map(|j| j.0),
            seating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_VEHICLE: &str = "SELECT id, plate_number, name, dimensions, floors, total_seats, seat_map_floor1, seat_map_floor2, created_at, updated_at FROM vehicles";

#[async_trait]
impl VehicleRepository for PostgresVehicleRepository {
    async fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, plate_number, name, dimensions, floors, total_seats, seat_map_floor1, seat_map_floor2, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET plate_number = EXCLUDED.plate_number,
                name = EXCLUDED.name,
                dimensions = EXCLUDED.dimensions,
                floors = EXCLUDED.floors,
                total_seats = EXCLUDED.total_seats,
                seat_map_floor1 = EXCLUDED.seat_map_floor1,
                seat_map_floor2 = EXCLUDED.seat_map_floor2,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.plate_number)
        .bind(&vehicle.name)
        .bind(vehicle.dimensions.as_ref().map(Json))
        .bind(vehicle.seating.floors)
        .bind(vehicle.seating.total_seats)
        .bind(vehicle.seating.seat_map_floor1.as_ref().map(Json))
        .bind(vehicle.seating.seat_map_floor2.as_ref().map(Json))
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, RepoError> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!("{} WHERE id = $1", SELECT_VEHICLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, RepoError> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!("{} ORDER BY plate_number", SELECT_VEHICLE))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Vehicle::try_from).collect()
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
