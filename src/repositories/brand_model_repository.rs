use sqlx::PgConnection;

use crate::utils::errors::AppResult;

/// Datos de referencia marca/modelo: el importador solo necesita comprobar
/// que la FK existe, nunca los crea
pub struct BrandModelRepository;

impl BrandModelRepository {
    pub async fn exists(conn: &mut PgConnection, id: i64) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM brand_models WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(result.0)
    }
}
