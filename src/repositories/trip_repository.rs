use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::dto::exchange::TripRecord;
use crate::models::trip::{Trip, TripPoint};
use crate::utils::errors::AppResult;

/// Repositorio de viajes y de sus puntos de inicio/fin
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Viajes de los vehículos dados cuya ventana se solapa con
    /// `[from, to]`; un límite NULL no filtra
    pub async fn list_overlapping(
        &self,
        vehicle_ids: &[i64],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE vehicle_id = ANY($1)
              AND ($2::timestamptz IS NULL OR end_utc >= $2)
              AND ($3::timestamptz IS NULL OR start_utc <= $3)
            ORDER BY start_utc, id
            "#,
        )
        .bind(vehicle_ids)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    /// Viajes de un vehículo completamente contenidos en la ventana UTC,
    /// ordenados por inicio ascendente con desempate por id
    pub async fn list_contained(
        &self,
        vehicle_id: i64,
        from_utc: DateTime<Utc>,
        to_utc: DateTime<Utc>,
    ) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE vehicle_id = $1 AND start_utc >= $2 AND end_utc <= $3
            ORDER BY start_utc ASC, id ASC
            "#,
        )
        .bind(vehicle_id)
        .bind(from_utc)
        .bind(to_utc)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    pub async fn find_points_by_ids(&self, ids: &[i64]) -> AppResult<Vec<TripPoint>> {
        let points =
            sqlx::query_as::<_, TripPoint>("SELECT * FROM trip_points WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(points)
    }

    /// Fijar la dirección de un punto que aún no la tiene.
    /// `address_resolved_at` se escribe exactamente una vez; un punto con
    /// dirección no se toca.
    pub async fn fill_point_address(&self, id: i64, address: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE trip_points
            SET address = $2, address_resolved_at = $3
            WHERE id = $1 AND address IS NULL
            "#,
        )
        .bind(id)
        .bind(address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(conn: &mut PgConnection, id: i64) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(trip)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        record: &TripRecord,
        vehicle_id: i64,
        start_point_id: Option<i64>,
        end_point_id: Option<i64>,
    ) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips
                (vehicle_id, start_utc, end_utc, distance_km, start_point_id, end_point_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(record.start_utc)
        .bind(record.end_utc)
        .bind(record.distance_km)
        .bind(start_point_id)
        .bind(end_point_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(trip)
    }

    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        record: &TripRecord,
        vehicle_id: i64,
        start_point_id: Option<i64>,
        end_point_id: Option<i64>,
    ) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET vehicle_id = $2, start_utc = $3, end_utc = $4, distance_km = $5,
                start_point_id = $6, end_point_id = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle_id)
        .bind(record.start_utc)
        .bind(record.end_utc)
        .bind(record.distance_km)
        .bind(start_point_id)
        .bind(end_point_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(trip)
    }

    pub async fn get_point(conn: &mut PgConnection, id: i64) -> AppResult<Option<TripPoint>> {
        let point = sqlx::query_as::<_, TripPoint>("SELECT * FROM trip_points WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(point)
    }

    pub async fn insert_point(
        conn: &mut PgConnection,
        latitude: f64,
        longitude: f64,
        address: Option<&str>,
    ) -> AppResult<TripPoint> {
        let resolved_at = address.map(|_| Utc::now());
        let point = sqlx::query_as::<_, TripPoint>(
            r#"
            INSERT INTO trip_points (latitude, longitude, address, address_resolved_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(address)
        .bind(resolved_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(point)
    }

    /// Actualizar coordenadas de un punto preservando la regla de dirección
    /// única: una dirección ya asignada no se sobrescribe
    pub async fn update_point(
        conn: &mut PgConnection,
        id: i64,
        latitude: f64,
        longitude: f64,
        address: Option<&str>,
    ) -> AppResult<TripPoint> {
        let point = sqlx::query_as::<_, TripPoint>(
            r#"
            UPDATE trip_points
            SET latitude = $2,
                longitude = $3,
                address_resolved_at = CASE
                    WHEN address IS NULL AND $4::text IS NOT NULL THEN $5
                    ELSE address_resolved_at
                END,
                address = COALESCE(address, $4)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .bind(address)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(point)
    }
}
