//! Modelo de Driver
//!
//! Este módulo contiene el struct Driver y la proyección con nombre
//! usada por el exportador.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Driver principal. `vehicle_id` es la referencia inversa opcional,
/// simétrica con `Vehicle.active_driver_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: i64,
    pub user_id: i64,
    pub salary: Decimal,
    pub enterprise_id: i64,
    pub vehicle_id: Option<i64>,
}

/// Driver con el nombre de su usuario (JOIN users), para exportación
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverWithName {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub salary: Decimal,
    pub enterprise_id: i64,
    pub vehicle_id: Option<i64>,
}
