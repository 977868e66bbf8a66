//! Modelo de TrackPoint
//!
//! Muestra de telemetría de un vehículo. La clave natural es
//! `(vehicle_id, timestamp_utc)`: los duplicados se rechazan en la
//! importación, nunca se sobrescriben.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackPoint {
    pub id: i64,
    pub vehicle_id: i64,
    pub timestamp_utc: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub rpm: i32,
    pub fuel_level: f64,
}
