//! Exportador de instantáneas
//!
//! Carga el grafo completo de una empresa filtrado por fechas y lo entrega
//! al codec del formato pedido. Solo lectura: ninguna operación de aquí
//! muta el almacén.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::dto::exchange::{
    DateRange, DriverRecord, EnterpriseRecord, ExchangeGraph, TrackPointRecord, TripPointRecord,
    TripRecord, VehicleRecord,
};
use crate::formats::{self, ExchangeFormat};
use crate::models::driver::DriverWithName;
use crate::models::enterprise::Enterprise;
use crate::models::track_point::TrackPoint;
use crate::models::trip::{Trip, TripPoint};
use crate::models::vehicle::Vehicle;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::enterprise_repository::EnterpriseRepository;
use crate::repositories::track_point_repository::TrackPointRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct ExportService {
    enterprises: EnterpriseRepository,
    vehicles: VehicleRepository,
    drivers: DriverRepository,
    trips: TripRepository,
    track_points: TrackPointRepository,
}

impl ExportService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            enterprises: EnterpriseRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            track_points: TrackPointRepository::new(pool),
        }
    }

    /// Exportar una empresa completa: devuelve contenido, content type y
    /// nombre de archivo. Los viajes incluidos son los que se solapan con
    /// `[from, to]`; un límite abierto no filtra.
    pub async fn export(
        &self,
        enterprise_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        format: ExchangeFormat,
    ) -> AppResult<(String, &'static str, String)> {
        let enterprise = self
            .enterprises
            .find_by_id(enterprise_id)
            .await?
            .ok_or_else(|| not_found_error("enterprise", enterprise_id))?;

        let vehicles = self.vehicles.list_by_enterprise(enterprise_id).await?;
        let drivers = self
            .drivers
            .list_by_enterprise_with_names(enterprise_id)
            .await?;

        let vehicle_ids: Vec<i64> = vehicles.iter().map(|v| v.id).collect();
        let trips = self.trips.list_overlapping(&vehicle_ids, from, to).await?;

        let point_ids: Vec<i64> = trips
            .iter()
            .flat_map(|t| [t.start_point_id, t.end_point_id])
            .flatten()
            .collect();
        let points_by_id: HashMap<i64, TripPoint> = self
            .trips
            .find_points_by_ids(&point_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let track_points = self
            .track_points
            .list_for_vehicles(&vehicle_ids, from, to)
            .await?;

        info!(
            "📤 Exportando empresa {}: {} vehículos, {} conductores, {} viajes, {} puntos de telemetría",
            enterprise_id,
            vehicles.len(),
            drivers.len(),
            trips.len(),
            track_points.len()
        );

        let graph = assemble_graph(
            enterprise,
            vehicles,
            drivers,
            trips,
            &points_by_id,
            track_points,
            from,
            to,
            Utc::now(),
        );

        formats::encode(format, &graph)
    }
}

#[allow(clippy::too_many_arguments)]
fn assemble_graph(
    enterprise: Enterprise,
    vehicles: Vec<Vehicle>,
    drivers: Vec<DriverWithName>,
    trips: Vec<Trip>,
    points_by_id: &HashMap<i64, TripPoint>,
    track_points: Vec<TrackPoint>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    exported_at: DateTime<Utc>,
) -> ExchangeGraph {
    let point_record = |id: Option<i64>| {
        id.and_then(|id| points_by_id.get(&id)).map(|p| TripPointRecord {
            latitude: p.latitude,
            longitude: p.longitude,
            address: p.address.clone(),
        })
    };

    ExchangeGraph {
        enterprise: EnterpriseRecord {
            id: enterprise.id,
            name: enterprise.name,
            address: enterprise.address,
            time_zone_id: enterprise.time_zone_id,
        },
        vehicles: vehicles
            .into_iter()
            .map(|v| VehicleRecord {
                id: v.id,
                name: v.name,
                price: v.price,
                mileage: v.mileage,
                color: v.color,
                registration_number: v.registration_number,
                brand_model_id: v.brand_model_id,
                enterprise_id: v.enterprise_id,
                active_driver_id: v.active_driver_id,
                purchase_date: v.purchase_date,
            })
            .collect(),
        drivers: drivers
            .into_iter()
            .map(|d| DriverRecord {
                id: d.id,
                full_name: d.full_name,
                salary: d.salary,
                enterprise_id: d.enterprise_id,
                vehicle_id: d.vehicle_id,
            })
            .collect(),
        trips: trips
            .into_iter()
            .map(|t| TripRecord {
                id: t.id,
                vehicle_id: t.vehicle_id,
                start_utc: t.start_utc,
                end_utc: t.end_utc,
                distance_km: t.distance_km,
                start_point: point_record(t.start_point_id),
                end_point: point_record(t.end_point_id),
            })
            .collect(),
        track_points: track_points
            .into_iter()
            .map(|p| TrackPointRecord {
                vehicle_id: p.vehicle_id,
                timestamp_utc: p.timestamp_utc,
                latitude: p.latitude,
                longitude: p.longitude,
                speed: p.speed,
                rpm: p.rpm,
                fuel_level: p.fuel_level,
            })
            .collect(),
        exported_at: Some(exported_at),
        date_range: Some(DateRange {
            start_date: from,
            end_date: to,
        }),
    }
}
