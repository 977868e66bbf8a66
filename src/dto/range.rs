//! DTOs de la consulta de rango
//!
//! Los timestamps de salida están convertidos a la zona horaria pedida por el
//! cliente; el almacenamiento es siempre UTC.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRangeItem {
    pub id: i64,
    pub vehicle_id: i64,
    pub start_local: NaiveDateTime,
    pub end_local: NaiveDateTime,
    pub distance_km: Option<Decimal>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPointRangeItem {
    pub timestamp_local: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRangeResult {
    pub trips: Vec<TripRangeItem>,
    pub track_points: Vec<TrackPointRangeItem>,
    pub total_distance_km: Decimal,
    pub total_duration_minutes: i64,
}

impl TripRangeResult {
    /// FeatureCollection GeoJSON con un único LineString; las coordenadas son
    /// pares [longitud, latitud] en orden de recorrido
    pub fn to_geojson(&self, vehicle_id: i64) -> Value {
        let coordinates: Vec<Value> = self
            .track_points
            .iter()
            .map(|p| json!([p.longitude, p.latitude]))
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates,
                },
                "properties": {
                    "vehicleId": vehicle_id,
                    "tripCount": self.trips.len(),
                    "pointCount": self.track_points.len(),
                    "totalDistanceKm": self.total_distance_km,
                    "totalDurationMinutes": self.total_duration_minutes,
                },
            }],
        })
    }
}
