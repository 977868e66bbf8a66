//! Consulta de rango consciente de zona horaria
//!
//! El llamador pide una ventana en hora local (posiblemente la de la
//! empresa); la consulta convierte a UTC, filtra, y convierte los resultados
//! de vuelta a la zona pedida. Un identificador de zona desconocido o
//! ausente se trata como UTC, nunca como error.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::dto::range::{TrackPointRangeItem, TripRangeItem, TripRangeResult};
use crate::models::geo::GeoPoint;
use crate::models::trip::TripPoint;
use crate::repositories::track_point_repository::TrackPointRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::geocoding_service::GeocodingService;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::timezone;

pub struct TripQueryService {
    vehicles: VehicleRepository,
    trips: TripRepository,
    track_points: TrackPointRepository,
    geocoding_token: Option<String>,
}

impl TripQueryService {
    pub fn new(pool: PgPool, geocoding_token: Option<String>) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            track_points: TrackPointRepository::new(pool),
            geocoding_token,
        }
    }

    /// Viajes del vehículo contenidos por completo en la ventana local dada,
    /// con sus puntos de telemetría y los agregados de distancia y duración
    pub async fn trips_in_range(
        &self,
        vehicle_id: i64,
        from_local: NaiveDateTime,
        to_local: NaiveDateTime,
        tz_id: Option<&str>,
    ) -> AppResult<TripRangeResult> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("vehicle", vehicle_id))?;

        let from_utc = timezone::local_to_utc(from_local, tz_id);
        let to_utc = timezone::local_to_utc(to_local, tz_id);
        if to_utc < from_utc {
            return Err(AppError::Validation(
                "range end must not precede range start".to_string(),
            ));
        }

        let trips = self.trips.list_contained(vehicle_id, from_utc, to_utc).await?;
        info!(
            "🔎 Vehículo {}: {} viajes en [{}, {}] UTC",
            vehicle_id,
            trips.len(),
            from_utc,
            to_utc
        );

        let point_ids: Vec<i64> = trips
            .iter()
            .flat_map(|t| [t.start_point_id, t.end_point_id])
            .flatten()
            .collect();
        let mut points_by_id: HashMap<i64, TripPoint> = self
            .trips
            .find_points_by_ids(&point_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        self.fill_missing_addresses(&mut points_by_id).await?;

        let mut track_items = Vec::new();
        for trip in &trips {
            let points = self
                .track_points
                .list_for_vehicle_between(vehicle_id, trip.start_utc, trip.end_utc)
                .await?;
            track_items.extend(points.into_iter().map(|p| TrackPointRangeItem {
                timestamp_local: timezone::utc_to_local(p.timestamp_utc, tz_id),
                latitude: p.latitude,
                longitude: p.longitude,
                speed: p.speed,
            }));
        }

        // Los agregados salen del conjunto de viajes filtrado en UTC,
        // no de los puntos de telemetría
        let total_distance_km: Decimal = trips
            .iter()
            .map(|t| t.distance_km.unwrap_or(Decimal::ZERO))
            .sum();
        let total_duration_minutes: i64 = trips.iter().map(|t| t.duration_minutes()).sum();

        let address_of = |id: Option<i64>| {
            id.and_then(|id| points_by_id.get(&id))
                .and_then(|p| p.address.clone())
        };

        let trip_items = trips
            .iter()
            .map(|t| TripRangeItem {
                id: t.id,
                vehicle_id: t.vehicle_id,
                start_local: timezone::utc_to_local(t.start_utc, tz_id),
                end_local: timezone::utc_to_local(t.end_utc, tz_id),
                distance_km: t.distance_km,
                start_address: address_of(t.start_point_id),
                end_address: address_of(t.end_point_id),
            })
            .collect();

        Ok(TripRangeResult {
            trips: trip_items,
            track_points: track_items,
            total_distance_km,
            total_duration_minutes,
        })
    }

    pub async fn trips_in_range_geojson(
        &self,
        vehicle_id: i64,
        from_local: NaiveDateTime,
        to_local: NaiveDateTime,
        tz_id: Option<&str>,
    ) -> AppResult<serde_json::Value> {
        let result = self
            .trips_in_range(vehicle_id, from_local, to_local, tz_id)
            .await?;
        Ok(result.to_geojson(vehicle_id))
    }

    /// Relleno de huecos best-effort: resolver y persistir las direcciones
    /// de los puntos almacenados que aún no la tienen. Idempotente; un
    /// fallo del servicio externo deja el punto como estaba.
    async fn fill_missing_addresses(
        &self,
        points_by_id: &mut HashMap<i64, TripPoint>,
    ) -> AppResult<()> {
        let Some(token) = &self.geocoding_token else {
            return Ok(());
        };

        let missing: Vec<(i64, GeoPoint)> = points_by_id
            .values()
            .filter(|p| p.address.is_none())
            .filter_map(|p| GeoPoint::new(p.latitude, p.longitude).ok().map(|g| (p.id, g)))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let service = GeocodingService::new(token.clone());
        let coords: Vec<GeoPoint> = missing.iter().map(|(_, g)| *g).collect();
        let resolved = service.resolve_addresses_batch(&coords).await;

        for (id, geo) in missing {
            if let Some(Some(address)) = resolved.get(&geo.coord_key()) {
                self.trips.fill_point_address(id, address).await?;
                if let Some(point) = points_by_id.get_mut(&id) {
                    point.address = Some(address.clone());
                }
            }
        }
        Ok(())
    }
}
