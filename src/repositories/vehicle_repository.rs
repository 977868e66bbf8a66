use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::dto::exchange::VehicleRecord;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list_by_enterprise(&self, enterprise_id: i64) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE enterprise_id = $1 ORDER BY id",
        )
        .bind(enterprise_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn get(conn: &mut PgConnection, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(vehicle)
    }

    /// Insertar un vehículo. `active_driver_id` queda NULL: la pareja
    /// vehículo-conductor se resuelve en la pasada de reconciliación,
    /// cuando los conductores ya existen.
    pub async fn insert(
        conn: &mut PgConnection,
        record: &VehicleRecord,
        enterprise_id: i64,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles
                (name, price, mileage, color, registration_number,
                 brand_model_id, enterprise_id, active_driver_id, purchase_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&record.name)
        .bind(record.price)
        .bind(record.mileage)
        .bind(&record.color)
        .bind(&record.registration_number)
        .bind(record.brand_model_id)
        .bind(enterprise_id)
        .bind(record.purchase_date)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(vehicle)
    }

    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        record: &VehicleRecord,
        enterprise_id: i64,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET name = $2, price = $3, mileage = $4, color = $5,
                registration_number = $6, brand_model_id = $7,
                enterprise_id = $8, purchase_date = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.name)
        .bind(record.price)
        .bind(record.mileage)
        .bind(&record.color)
        .bind(&record.registration_number)
        .bind(record.brand_model_id)
        .bind(enterprise_id)
        .bind(record.purchase_date)
        .fetch_one(&mut *conn)
        .await?;

        Ok(vehicle)
    }

    pub async fn set_active_driver(
        conn: &mut PgConnection,
        vehicle_id: i64,
        driver_id: i64,
    ) -> AppResult<()> {
        sqlx::query("UPDATE vehicles SET active_driver_id = $2 WHERE id = $1")
            .bind(vehicle_id)
            .bind(driver_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
