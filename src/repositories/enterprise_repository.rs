use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::models::enterprise::Enterprise;
use crate::utils::errors::AppResult;

pub struct EnterpriseRepository {
    pool: PgPool,
}

impl EnterpriseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Enterprise>> {
        let enterprise =
            sqlx::query_as::<_, Enterprise>("SELECT * FROM enterprises WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(enterprise)
    }

    /// Variante con conexión explícita, para uso dentro de la transacción
    /// de importación
    pub async fn get(conn: &mut PgConnection, id: i64) -> AppResult<Option<Enterprise>> {
        let enterprise =
            sqlx::query_as::<_, Enterprise>("SELECT * FROM enterprises WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(enterprise)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        name: &str,
        address: &str,
        time_zone_id: Option<&str>,
    ) -> AppResult<Enterprise> {
        let enterprise = sqlx::query_as::<_, Enterprise>(
            r#"
            INSERT INTO enterprises (name, address, time_zone_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(time_zone_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(enterprise)
    }

    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        name: &str,
        address: &str,
        time_zone_id: Option<&str>,
    ) -> AppResult<Enterprise> {
        let enterprise = sqlx::query_as::<_, Enterprise>(
            r#"
            UPDATE enterprises
            SET name = $2, address = $3, time_zone_id = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(time_zone_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(enterprise)
    }
}
