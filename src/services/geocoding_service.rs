use std::collections::HashMap;

use serde::Deserialize;

use crate::models::geo::GeoPoint;
use crate::utils::errors::{AppError, AppResult};

/// Tamaño de lote y pausa entre lotes. La pausa es backpressure deliberado
/// para respetar el rate limit del proveedor, no un bug.
const BATCH_CONCURRENCY: usize = 8;
const RATE_LIMIT_DELAY_MS: u64 = 250;

#[derive(Debug, Deserialize)]
struct MapboxGeocodingResponse {
    features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
struct MapboxFeature {
    properties: MapboxProperties,
}

#[derive(Debug, Deserialize)]
struct MapboxProperties {
    #[serde(rename = "full_address")]
    full_address: Option<String>,
    name: Option<String>,
    #[serde(rename = "place_name")]
    place_name: Option<String>,
}

/// Cliente de geocodificación inversa best-effort.
///
/// Ninguna llamada falla hacia el llamador: un error HTTP o una respuesta
/// vacía se resuelven como `None` y el campo aguas abajo queda vacío.
pub struct GeocodingService {
    token: String,
    client: reqwest::Client,
}

impl GeocodingService {
    pub fn new(token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { token, client }
    }

    /// Resolver la dirección de una coordenada; `None` si el servicio
    /// falla o no encuentra nada
    pub async fn resolve_address(&self, point: &GeoPoint) -> Option<String> {
        match self.reverse_geocode(point.latitude, point.longitude).await {
            Ok(address) => address,
            Err(e) => {
                log::warn!(
                    "⚠️ Reverse geocoding failed for ({}, {}): {}",
                    point.latitude,
                    point.longitude,
                    e
                );
                None
            }
        }
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> AppResult<Option<String>> {
        let url = format!(
            "https://api.mapbox.com/search/geocode/v6/reverse?longitude={}&latitude={}&access_token={}&limit=1",
            longitude, latitude, self.token
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "FleetExchange/1.0")
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("❌ Geocoding failed with status {}: {}", status, error_text);
            return Ok(None);
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))?;
        let mapbox_response: MapboxGeocodingResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                AppError::ExternalApi(format!("failed to parse geocoding response: {}", e))
            })?;

        if let Some(feature) = mapbox_response.features.first() {
            let address = feature
                .properties
                .full_address
                .clone()
                .or_else(|| feature.properties.place_name.clone())
                .or_else(|| feature.properties.name.clone());

            if let Some(addr) = &address {
                log::info!(
                    "✅ Geocoding successful: ({}, {}) -> {}",
                    latitude,
                    longitude,
                    addr
                );
            }
            return Ok(address);
        }

        log::info!("⚠️ No address found for ({}, {})", latitude, longitude);
        Ok(None)
    }

    /// Resolver un lote de coordenadas, deduplicado por clave de coordenada.
    ///
    /// Los lotes se procesan con concurrencia acotada y una pausa fija entre
    /// lotes; un fallo individual resuelve `None` sin abortar el resto.
    pub async fn resolve_addresses_batch(
        &self,
        points: &[GeoPoint],
    ) -> HashMap<String, Option<String>> {
        let mut unique: Vec<GeoPoint> = Vec::new();
        let mut results: HashMap<String, Option<String>> = HashMap::new();
        for point in points {
            if !results.contains_key(&point.coord_key()) {
                results.insert(point.coord_key(), None);
                unique.push(*point);
            }
        }

        log::info!("🗺️ Batch reverse geocoding {} coordinates", unique.len());

        for chunk in unique.chunks(BATCH_CONCURRENCY) {
            let futures: Vec<_> = chunk.iter().map(|p| self.resolve_address(p)).collect();
            let chunk_results = futures::future::join_all(futures).await;

            for (point, address) in chunk.iter().zip(chunk_results) {
                results.insert(point.coord_key(), address);
            }

            // Pausa entre lotes para respetar el rate limit del proveedor
            tokio::time::sleep(std::time::Duration::from_millis(RATE_LIMIT_DELAY_MS)).await;
        }

        log::info!("✅ Batch reverse geocoding completed: {} results", results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reverse_geocoding() {
        // Este test requiere un token válido del proveedor
        let token = std::env::var("GEOCODING_TOKEN").unwrap_or_default();
        if token.is_empty() {
            println!("⚠️ Skipping test: GEOCODING_TOKEN not set");
            return;
        }

        let service = GeocodingService::new(token);
        let point = GeoPoint::new(48.8698, 2.3311).unwrap();
        let address = service.resolve_address(&point).await;
        println!("✅ Geocoding result: {:?}", address);
        assert!(address.is_some());
    }

    #[tokio::test]
    async fn test_batch_dedupes_by_coord_key() {
        let token = std::env::var("GEOCODING_TOKEN").unwrap_or_default();
        if token.is_empty() {
            println!("⚠️ Skipping test: GEOCODING_TOKEN not set");
            return;
        }

        let service = GeocodingService::new(token);
        let p = GeoPoint::new(48.8698, 2.3311).unwrap();
        let results = service.resolve_addresses_batch(&[p, p]).await;
        assert_eq!(results.len(), 1);
    }
}
