//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle que mapea exactamente
//! a la tabla vehicles con primary key 'id'.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal.
///
/// `active_driver_id`, si está presente, debe referenciar un conductor de la
/// misma empresa; el par con `Driver.vehicle_id` se mantiene simétrico a
/// través del importador, no con referencias de objeto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub mileage: i64,
    pub color: String,
    pub registration_number: String,
    pub brand_model_id: i64,
    pub enterprise_id: i64,
    pub active_driver_id: Option<i64>,
    pub purchase_date: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<Utc>,
}
