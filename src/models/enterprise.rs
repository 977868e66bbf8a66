//! Modelo de Enterprise
//!
//! Este módulo contiene el struct Enterprise que mapea exactamente
//! a la tabla enterprises con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Enterprise principal - dueña de vehículos y conductores.
/// `time_zone_id` es un identificador IANA opcional; NULL significa UTC.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enterprise {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub time_zone_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
