//! DTOs del sistema
//!
//! Esquema canónico de intercambio, reporte de importación y
//! resultados de la consulta de rango.

pub mod exchange;
pub mod range;
pub mod report;
