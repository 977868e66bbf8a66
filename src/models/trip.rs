//! Modelo de Trip y TripPoint
//!
//! Un viaje referencia opcionalmente sus puntos de inicio y fin. La dirección
//! de un punto se rellena de forma perezosa por el enriquecedor de
//! geocodificación; `address_resolved_at` se fija exactamente una vez.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub vehicle_id: i64,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub distance_km: Option<Decimal>,
    pub start_point_id: Option<i64>,
    pub end_point_id: Option<i64>,
}

impl Trip {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_utc - self.start_utc).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripPoint {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub address_resolved_at: Option<DateTime<Utc>>,
}
