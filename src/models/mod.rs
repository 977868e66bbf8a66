//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod driver;
pub mod enterprise;
pub mod geo;
pub mod track_point;
pub mod trip;
pub mod user;
pub mod vehicle;
