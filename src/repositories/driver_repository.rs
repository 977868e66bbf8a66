use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::driver::{Driver, DriverWithName};
use crate::models::user::User;
use crate::utils::errors::AppResult;

/// Repositorio de conductores. También gestiona la identidad User que
/// respalda a cada conductor, creada bajo demanda por el importador.
pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_enterprise_with_names(
        &self,
        enterprise_id: i64,
    ) -> AppResult<Vec<DriverWithName>> {
        let drivers = sqlx::query_as::<_, DriverWithName>(
            r#"
            SELECT d.id, d.user_id, u.full_name, d.salary, d.enterprise_id, d.vehicle_id
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            WHERE d.enterprise_id = $1
            ORDER BY d.id
            "#,
        )
        .bind(enterprise_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn get(conn: &mut PgConnection, id: i64) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(driver)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        user_id: i64,
        salary: Decimal,
        enterprise_id: i64,
        vehicle_id: Option<i64>,
    ) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (user_id, salary, enterprise_id, vehicle_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(salary)
        .bind(enterprise_id)
        .bind(vehicle_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(driver)
    }

    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        salary: Decimal,
        enterprise_id: i64,
        vehicle_id: Option<i64>,
    ) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET salary = $2, enterprise_id = $3, vehicle_id = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(salary)
        .bind(enterprise_id)
        .bind(vehicle_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(driver)
    }

    pub async fn set_vehicle(
        conn: &mut PgConnection,
        driver_id: i64,
        vehicle_id: i64,
    ) -> AppResult<()> {
        sqlx::query("UPDATE drivers SET vehicle_id = $2 WHERE id = $1")
            .bind(driver_id)
            .bind(vehicle_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn insert_user(conn: &mut PgConnection, full_name: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, created_at)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(user)
    }

    pub async fn update_user_name(
        conn: &mut PgConnection,
        user_id: i64,
        full_name: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE users SET full_name = $2 WHERE id = $1")
            .bind(user_id)
            .bind(full_name)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
