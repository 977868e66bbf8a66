use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::dto::exchange::TrackPointRecord;
use crate::models::track_point::TrackPoint;
use crate::utils::errors::AppResult;

pub struct TrackPointRepository {
    pool: PgPool,
}

impl TrackPointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Puntos de telemetría de los vehículos dados dentro de `[from, to]`;
    /// un límite NULL no filtra
    pub async fn list_for_vehicles(
        &self,
        vehicle_ids: &[i64],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<TrackPoint>> {
        let points = sqlx::query_as::<_, TrackPoint>(
            r#"
            SELECT * FROM track_points
            WHERE vehicle_id = ANY($1)
              AND ($2::timestamptz IS NULL OR timestamp_utc >= $2)
              AND ($3::timestamptz IS NULL OR timestamp_utc <= $3)
            ORDER BY vehicle_id, timestamp_utc
            "#,
        )
        .bind(vehicle_ids)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    pub async fn list_for_vehicle_between(
        &self,
        vehicle_id: i64,
        from_utc: DateTime<Utc>,
        to_utc: DateTime<Utc>,
    ) -> AppResult<Vec<TrackPoint>> {
        let points = sqlx::query_as::<_, TrackPoint>(
            r#"
            SELECT * FROM track_points
            WHERE vehicle_id = $1 AND timestamp_utc >= $2 AND timestamp_utc <= $3
            ORDER BY timestamp_utc ASC
            "#,
        )
        .bind(vehicle_id)
        .bind(from_utc)
        .bind(to_utc)
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    /// La clave natural es (vehicle_id, timestamp_utc)
    pub async fn exists(
        conn: &mut PgConnection,
        vehicle_id: i64,
        timestamp_utc: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM track_points WHERE vehicle_id = $1 AND timestamp_utc = $2)",
        )
        .bind(vehicle_id)
        .bind(timestamp_utc)
        .fetch_one(&mut *conn)
        .await?;

        Ok(result.0)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        record: &TrackPointRecord,
        vehicle_id: i64,
    ) -> AppResult<TrackPoint> {
        let point = sqlx::query_as::<_, TrackPoint>(
            r#"
            INSERT INTO track_points
                (vehicle_id, timestamp_utc, latitude, longitude, speed, rpm, fuel_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(record.timestamp_utc)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.speed)
        .bind(record.rpm)
        .bind(record.fuel_level)
        .fetch_one(&mut *conn)
        .await?;

        Ok(point)
    }
}
