use async_trait::async_trait;
use coachline_core::repository::{RepoError, SeatUpdate, TripRepository};
use coachline_trip::{SeatAction, SeatError, SeatStatus, Trip, TripSeat};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresTripRepository {
    pool: PgPool,
}

impl PostgresTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_seats(&self, trip_id: Uuid) -> Result<Vec<TripSeat>, RepoError> {
        let rows = sqlx::query_as::<_, SeatRow>(
            "SELECT seat_number, status FROM trip_seats WHERE trip_id = $1 ORDER BY position",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<TripSeat, RepoError> {
                Ok(TripSeat {
                    status: parse_status(&row.status)?,
                    seat_number: row.seat_number,
                })
            })
            .collect()
    }

    async fn hydrate(&self, row: TripRow) -> Result<Trip, RepoError> {
        let seats = self.load_seats(row.id).await?;
        Ok(Trip {
            id: row.id,
            vehicle_id: row.vehicle_id,
            origin: row.origin,
            destination: row.destination,
            departure_time: row.departure_time,
            seats,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    vehicle_id: Uuid,
    origin: String,
    destination: String,
    departure_time: chrono::DateTime<chrono::Utc>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct SeatRow {
    seat_number: String,
    status: String,
}

fn parse_status(raw: &str) -> Result<SeatStatus, RepoError> {
    Ok(serde_json::from_value(serde_json::Value::String(raw.to_string()))?)
}

/// Column values for a set of statuses, as stored in `trip_seats.status`
fn status_names(statuses: &[SeatStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

const SELECT_TRIP: &str = "SELECT id, vehicle_id, origin, destination, departure_time, created_at, updated_at FROM trips";

#[async_trait]
impl TripRepository for PostgresTripRepository {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO trips (id, vehicle_id, origin, destination, departure_time, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(trip.id)
        .bind(trip.vehicle_id)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.departure_time)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(&mut *tx)
        .await?;

        // position keeps floor/row order
        let positions: Vec<i32> = (0..trip.seats.len() as i32).collect();
        let numbers: Vec<String> = trip.seats.iter().map(|s| s.seat_number.clone()).collect();
        let statuses: Vec<String> = trip.seats.iter().map(|s| s.status.to_string()).collect();

        sqlx::query(
            r#"
            INSERT INTO trip_seats (trip_id, position, seat_number, status)
            SELECT $1, * FROM UNNEST($2::int4[], $3::text[], $4::text[])
            "#,
        )
        .bind(trip.id)
        .bind(&positions)
        .bind(&numbers)
        .bind(&statuses)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, RepoError> {
        let row = sqlx::query_as::<_, TripRow>(&format!("{} WHERE id = $1", SELECT_TRIP))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_trips_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Trip>, RepoError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE vehicle_id = $1 ORDER BY departure_time",
            SELECT_TRIP
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        let mut trips = Vec::with_capacity(rows.len());
        for row in rows {
            trips.push(self.hydrate(row).await?);
        }
        Ok(trips)
    }

    async fn delete_trip(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_seat_action(
        &self,
        trip_id: Uuid,
        seat_number: &str,
        action: SeatAction,
    ) -> Result<SeatUpdate, RepoError> {
        let allowed = status_names(action.allowed_from());
        let mut tx = self.pool.begin().await?;

        // The status guard in WHERE makes the check and the write one statement
        let updated = sqlx::query_as::<_, SeatRow>(
            r#"
            UPDATE trip_seats SET status = $1
            WHERE trip_id = $2 AND seat_number = $3 AND status = ANY($4)
            RETURNING seat_number, status
            "#,
        )
        .bind(action.target().to_string())
        .bind(trip_id)
        .bind(seat_number)
        .bind(&allowed)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = updated {
            sqlx::query("UPDATE trips SET updated_at = NOW() WHERE id = $1")
                .bind(trip_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            return Ok(SeatUpdate::Applied(TripSeat {
                status: parse_status(&row.status)?,
                seat_number: row.seat_number,
            }));
        }
        tx.rollback().await?;

        // Nothing changed; work out why
        let current: Option<String> = sqlx::query_scalar(
            "SELECT status FROM trip_seats WHERE trip_id = $1 AND seat_number = $2",
        )
        .bind(trip_id)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(status) = current {
            return Ok(SeatUpdate::Rejected(action.rejection(seat_number, parse_status(&status)?)));
        }

        let trip_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match trip_exists {
            Some(_) => SeatUpdate::Rejected(SeatError::NotFound(seat_number.to_string())),
            None => SeatUpdate::TripNotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("HELD").unwrap(), SeatStatus::Held);
        assert_eq!(parse_status(&SeatStatus::Booked.to_string()).unwrap(), SeatStatus::Booked);
        assert!(parse_status("LOST").is_err());
    }

    #[test]
    fn test_action_guards_use_stored_status_names() {
        assert_eq!(status_names(SeatAction::Hold.allowed_from()), vec!["AVAILABLE"]);
        assert_eq!(
            status_names(SeatAction::Book.allowed_from()),
            vec!["AVAILABLE", "HELD"]
        );
        for name in status_names(SeatAction::Release.allowed_from()) {
            assert!(parse_status(&name).is_ok());
        }
    }
}
