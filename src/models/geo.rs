//! Tipos de valor geoespaciales
//!
//! Representación inmutable de coordenadas usada por los puntos de viaje
//! y los puntos de telemetría.

use serde::{Deserialize, Serialize};

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_coordinates;

/// Par latitud/longitud validado. Latitud en [-90, 90], longitud en [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        validate_coordinates(latitude, longitude).map_err(|_| {
            AppError::Validation(format!(
                "coordinates out of range: ({}, {})",
                latitude, longitude
            ))
        })?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Clave estable de coordenada para mapas de geocodificación,
    /// 6 decimales con formato invariante
    pub fn coord_key(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_bounds() {
        assert!(GeoPoint::new(55.7558, 37.6173).is_ok());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_coord_key_format() {
        let p = GeoPoint::new(55.7558, 37.6173).unwrap();
        assert_eq!(p.coord_key(), "55.755800,37.617300");
    }
}
