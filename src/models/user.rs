//! Modelo de User
//!
//! Identidad que respalda a cada conductor. El importador la crea bajo
//! demanda cuando el conductor no existe todavía.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}
