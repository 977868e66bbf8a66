//! Importador de reconciliación
//!
//! Orquesta decodificar → validar → upsert en orden de dependencias →
//! commit/rollback. El modelo de fallos tiene dos niveles: los fallos de
//! validación o de referencia de un registro se acumulan en el reporte y no
//! detienen los registros siguientes; cualquier fallo del almacén es fatal y
//! revierte la transacción entera sin reporte parcial. Un intercambio masivo
//! entre despliegues no debe abortar por unas filas mal formadas, pero
//! tampoco puede dejar el almacén migrado a medias si la base de datos
//! falla a mitad de camino.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::dto::exchange::{
    DriverRecord, EnterpriseRecord, TrackPointRecord, TripPointRecord, TripRecord, VehicleRecord,
};
use crate::dto::report::ImportReport;
use crate::formats::{self, ExchangeFormat};
use crate::models::geo::GeoPoint;
use crate::repositories::brand_model_repository::BrandModelRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::enterprise_repository::EnterpriseRepository;
use crate::repositories::track_point_repository::TrackPointRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::geocoding_service::GeocodingService;
use crate::utils::errors::{AppResult, RecordIssue};
use crate::utils::{timezone, validation};

pub struct ImportService {
    pool: PgPool,
}

/// Estado acumulado de una importación: reporte, tablas de remapeo de
/// identidades (id externo → id del almacén) y emparejamientos
/// vehículo-conductor pendientes de la pasada de reconciliación.
struct ImportContext {
    update_existing: bool,
    report: ImportReport,
    enterprise_map: HashMap<i64, i64>,
    vehicle_map: HashMap<i64, i64>,
    driver_map: HashMap<i64, i64>,
    pending_active_drivers: Vec<PendingActiveDriver>,
}

struct PendingActiveDriver {
    vehicle_id: i64,
    enterprise_id: i64,
    external_driver_id: i64,
}

impl ImportContext {
    fn new(update_existing: bool) -> Self {
        Self {
            update_existing,
            report: ImportReport::default(),
            enterprise_map: HashMap::new(),
            vehicle_map: HashMap::new(),
            driver_map: HashMap::new(),
            pending_active_drivers: Vec::new(),
        }
    }
}

impl ImportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Importar un grafo serializado. Un fallo de decodificación es fatal y
    /// no abre transacción; a partir de ahí toda la operación corre dentro
    /// de una única transacción.
    pub async fn import(
        &self,
        content: &str,
        format: ExchangeFormat,
        update_existing: bool,
        geocoding_token: Option<&str>,
    ) -> AppResult<ImportReport> {
        let (graph, decode_warnings) = formats::decode(format, content)?;

        info!(
            "📦 Importación iniciada: {} vehículos, {} conductores, {} viajes, {} puntos de telemetría",
            graph.vehicles.len(),
            graph.drivers.len(),
            graph.trips.len(),
            graph.track_points.len()
        );

        let mut ctx = ImportContext::new(update_existing);
        ctx.report.warnings.extend(decode_warnings);

        let enricher = geocoding_token.map(|token| GeocodingService::new(token.to_string()));

        // Si esta función retorna antes del commit (fallo del almacén o
        // cancelación del futuro), la transacción se revierte al soltarse:
        // no existe el commit parcial.
        let mut tx = self.pool.begin().await?;

        import_enterprise(&mut tx, &graph.enterprise, &mut ctx).await?;
        import_vehicles(&mut tx, &graph.vehicles, &mut ctx).await?;
        import_drivers(&mut tx, &graph.drivers, &mut ctx).await?;
        reconcile_active_drivers(&mut tx, &mut ctx).await?;
        import_trips(&mut tx, &graph.trips, enricher.as_ref(), &mut ctx).await?;
        import_track_points(&mut tx, &graph.track_points, &mut ctx).await?;

        tx.commit().await?;

        info!(
            "✅ Importación completada: {} registros, {} advertencias, {} errores",
            ctx.report.total_imported(),
            ctx.report.warnings.len(),
            ctx.report.errors.len()
        );
        Ok(ctx.report)
    }
}

async fn import_enterprise(
    conn: &mut PgConnection,
    rec: &EnterpriseRecord,
    ctx: &mut ImportContext,
) -> AppResult<()> {
    if rec.id > 0 {
        if let Some(existing) = EnterpriseRepository::get(&mut *conn, rec.id).await? {
            ctx.enterprise_map.insert(rec.id, existing.id);
            if !ctx.update_existing {
                ctx.report.record_issue(RecordIssue::Conflict {
                    entity: "enterprise",
                    external_id: rec.id,
                    message: "already exists, skipped".to_string(),
                });
                return Ok(());
            }
            if let Err(message) = validate_enterprise_record(rec) {
                ctx.report.record_issue(RecordIssue::Validation {
                    entity: "enterprise",
                    external_id: rec.id,
                    message,
                });
                return Ok(());
            }
            EnterpriseRepository::update(
                &mut *conn,
                existing.id,
                &rec.name,
                &rec.address,
                rec.time_zone_id.as_deref(),
            )
            .await?;
            ctx.report.enterprises_imported += 1;
            return Ok(());
        }
    }

    if let Err(message) = validate_enterprise_record(rec) {
        ctx.report.record_issue(RecordIssue::Validation {
            entity: "enterprise",
            external_id: rec.id,
            message,
        });
        return Ok(());
    }
    let created = EnterpriseRepository::insert(
        &mut *conn,
        &rec.name,
        &rec.address,
        rec.time_zone_id.as_deref(),
    )
    .await?;
    if rec.id > 0 {
        ctx.enterprise_map.insert(rec.id, created.id);
    } else {
        ctx.enterprise_map.insert(0, created.id);
    }
    ctx.report.enterprises_imported += 1;
    Ok(())
}

async fn import_vehicles(
    conn: &mut PgConnection,
    records: &[VehicleRecord],
    ctx: &mut ImportContext,
) -> AppResult<()> {
    for rec in records {
        let Some(enterprise_id) = resolve_enterprise(&mut *conn, ctx, rec.enterprise_id).await?
        else {
            ctx.report.record_issue(RecordIssue::Reference {
                entity: "vehicle",
                external_id: rec.id,
                message: format!("enterprise {} not found", rec.enterprise_id),
            });
            continue;
        };

        if !BrandModelRepository::exists(&mut *conn, rec.brand_model_id).await? {
            ctx.report.record_issue(RecordIssue::Reference {
                entity: "vehicle",
                external_id: rec.id,
                message: format!("brand model {} not found", rec.brand_model_id),
            });
            continue;
        }

        if rec.id > 0 {
            if let Some(existing) = VehicleRepository::get(&mut *conn, rec.id).await? {
                ctx.vehicle_map.insert(rec.id, existing.id);
                if !ctx.update_existing {
                    ctx.report.record_issue(RecordIssue::Conflict {
                        entity: "vehicle",
                        external_id: rec.id,
                        message: "already exists, skipped".to_string(),
                    });
                    continue;
                }
                if let Err(message) = validate_vehicle_record(rec) {
                    ctx.report.record_issue(RecordIssue::Validation {
                        entity: "vehicle",
                        external_id: rec.id,
                        message,
                    });
                    continue;
                }
                let updated =
                    VehicleRepository::update(&mut *conn, existing.id, rec, enterprise_id).await?;
                ctx.report.vehicles_imported += 1;
                if let Some(external_driver_id) = rec.active_driver_id {
                    ctx.pending_active_drivers.push(PendingActiveDriver {
                        vehicle_id: updated.id,
                        enterprise_id,
                        external_driver_id,
                    });
                }
                continue;
            }
        }

        if let Err(message) = validate_vehicle_record(rec) {
            ctx.report.record_issue(RecordIssue::Validation {
                entity: "vehicle",
                external_id: rec.id,
                message,
            });
            continue;
        }
        let created = VehicleRepository::insert(&mut *conn, rec, enterprise_id).await?;
        if rec.id > 0 {
            ctx.vehicle_map.insert(rec.id, created.id);
        }
        ctx.report.vehicles_imported += 1;
        if let Some(external_driver_id) = rec.active_driver_id {
            ctx.pending_active_drivers.push(PendingActiveDriver {
                vehicle_id: created.id,
                enterprise_id,
                external_driver_id,
            });
        }
    }
    Ok(())
}

async fn import_drivers(
    conn: &mut PgConnection,
    records: &[DriverRecord],
    ctx: &mut ImportContext,
) -> AppResult<()> {
    for rec in records {
        let Some(enterprise_id) = resolve_enterprise(&mut *conn, ctx, rec.enterprise_id).await?
        else {
            ctx.report.record_issue(RecordIssue::Reference {
                entity: "driver",
                external_id: rec.id,
                message: format!("enterprise {} not found", rec.enterprise_id),
            });
            continue;
        };

        let vehicle_id = match rec.vehicle_id {
            Some(external) => match resolve_vehicle(&mut *conn, ctx, external).await? {
                Some(id) => Some(id),
                None => {
                    ctx.report.record_issue(RecordIssue::Reference {
                        entity: "driver",
                        external_id: rec.id,
                        message: format!("vehicle {} not found", external),
                    });
                    continue;
                }
            },
            None => None,
        };

        if rec.id > 0 {
            if let Some(existing) = DriverRepository::get(&mut *conn, rec.id).await? {
                ctx.driver_map.insert(rec.id, existing.id);
                if !ctx.update_existing {
                    ctx.report.record_issue(RecordIssue::Conflict {
                        entity: "driver",
                        external_id: rec.id,
                        message: "already exists, skipped".to_string(),
                    });
                    continue;
                }
                if let Err(message) = validate_driver_record(rec) {
                    ctx.report.record_issue(RecordIssue::Validation {
                        entity: "driver",
                        external_id: rec.id,
                        message,
                    });
                    continue;
                }
                DriverRepository::update_user_name(&mut *conn, existing.user_id, &rec.full_name)
                    .await?;
                DriverRepository::update(
                    &mut *conn,
                    existing.id,
                    rec.salary,
                    enterprise_id,
                    vehicle_id,
                )
                .await?;
                ctx.report.drivers_imported += 1;
                continue;
            }
        }

        if let Err(message) = validate_driver_record(rec) {
            ctx.report.record_issue(RecordIssue::Validation {
                entity: "driver",
                external_id: rec.id,
                message,
            });
            continue;
        }
        // Cada conductor nuevo crea su identidad User de respaldo
        let user = DriverRepository::insert_user(&mut *conn, &rec.full_name).await?;
        let created =
            DriverRepository::insert(&mut *conn, user.id, rec.salary, enterprise_id, vehicle_id)
                .await?;
        if rec.id > 0 {
            ctx.driver_map.insert(rec.id, created.id);
        }
        ctx.report.drivers_imported += 1;
    }
    Ok(())
}

/// Pasada de reconciliación vehículo-conductor: se ejecuta cuando los
/// conductores ya existen. El par `active_driver_id` / `vehicle_id` son dos
/// FK independientes que se mantienen simétricas aquí, no referencias de
/// objeto bidireccionales. Un conductor de otra empresa no se empareja:
/// advertencia y se continúa.
async fn reconcile_active_drivers(
    conn: &mut PgConnection,
    ctx: &mut ImportContext,
) -> AppResult<()> {
    let pending = std::mem::take(&mut ctx.pending_active_drivers);
    for p in pending {
        let resolved = resolve_driver(&mut *conn, ctx, p.external_driver_id).await?;
        let Some(driver_id) = resolved else {
            ctx.report.warnings.push(format!(
                "vehicle {}: active driver {} not found, pairing skipped",
                p.vehicle_id, p.external_driver_id
            ));
            continue;
        };
        let Some(driver) = DriverRepository::get(&mut *conn, driver_id).await? else {
            ctx.report.warnings.push(format!(
                "vehicle {}: active driver {} not found, pairing skipped",
                p.vehicle_id, p.external_driver_id
            ));
            continue;
        };
        if driver.enterprise_id != p.enterprise_id {
            ctx.report.warnings.push(format!(
                "vehicle {}: driver {} belongs to another enterprise, pairing skipped",
                p.vehicle_id, driver_id
            ));
            continue;
        }

        VehicleRepository::set_active_driver(&mut *conn, p.vehicle_id, driver_id).await?;
        if driver.vehicle_id.is_none() {
            DriverRepository::set_vehicle(&mut *conn, driver_id, p.vehicle_id).await?;
        }
    }
    Ok(())
}

async fn import_trips(
    conn: &mut PgConnection,
    records: &[TripRecord],
    enricher: Option<&GeocodingService>,
    ctx: &mut ImportContext,
) -> AppResult<()> {
    // Resolver direcciones faltantes en un solo lote antes de insertar;
    // los fallos del servicio externo dejan la dirección vacía
    let resolved_addresses = match enricher {
        Some(service) => {
            let mut missing = Vec::new();
            for rec in records {
                for point in [rec.start_point.as_ref(), rec.end_point.as_ref()]
                    .into_iter()
                    .flatten()
                {
                    if point.address.is_none() {
                        if let Ok(geo) = GeoPoint::new(point.latitude, point.longitude) {
                            missing.push(geo);
                        }
                    }
                }
            }
            if missing.is_empty() {
                HashMap::new()
            } else {
                service.resolve_addresses_batch(&missing).await
            }
        }
        None => HashMap::new(),
    };

    for rec in records {
        let Some(vehicle_id) = resolve_vehicle(&mut *conn, ctx, rec.vehicle_id).await? else {
            ctx.report.record_issue(RecordIssue::Reference {
                entity: "trip",
                external_id: rec.id,
                message: format!("vehicle {} not found", rec.vehicle_id),
            });
            continue;
        };

        if rec.id > 0 {
            if let Some(existing) = TripRepository::get(&mut *conn, rec.id).await? {
                if !ctx.update_existing {
                    ctx.report.record_issue(RecordIssue::Conflict {
                        entity: "trip",
                        external_id: rec.id,
                        message: "already exists, skipped".to_string(),
                    });
                    continue;
                }
                if let Err(message) = validate_trip_record(rec) {
                    ctx.report.record_issue(RecordIssue::Validation {
                        entity: "trip",
                        external_id: rec.id,
                        message,
                    });
                    continue;
                }
                let start_point_id = upsert_trip_point(
                    &mut *conn,
                    existing.start_point_id,
                    rec.start_point.as_ref(),
                    &resolved_addresses,
                )
                .await?;
                let end_point_id = upsert_trip_point(
                    &mut *conn,
                    existing.end_point_id,
                    rec.end_point.as_ref(),
                    &resolved_addresses,
                )
                .await?;
                TripRepository::update(
                    &mut *conn,
                    existing.id,
                    rec,
                    vehicle_id,
                    start_point_id,
                    end_point_id,
                )
                .await?;
                ctx.report.trips_imported += 1;
                continue;
            }
        }

        if let Err(message) = validate_trip_record(rec) {
            ctx.report.record_issue(RecordIssue::Validation {
                entity: "trip",
                external_id: rec.id,
                message,
            });
            continue;
        }
        let start_point_id =
            upsert_trip_point(&mut *conn, None, rec.start_point.as_ref(), &resolved_addresses)
                .await?;
        let end_point_id =
            upsert_trip_point(&mut *conn, None, rec.end_point.as_ref(), &resolved_addresses)
                .await?;
        TripRepository::insert(&mut *conn, rec, vehicle_id, start_point_id, end_point_id).await?;
        ctx.report.trips_imported += 1;
    }
    Ok(())
}

async fn upsert_trip_point(
    conn: &mut PgConnection,
    existing_id: Option<i64>,
    record: Option<&TripPointRecord>,
    resolved: &HashMap<String, Option<String>>,
) -> AppResult<Option<i64>> {
    let Some(rec) = record else {
        return Ok(existing_id);
    };

    let address = rec.address.clone().or_else(|| {
        GeoPoint::new(rec.latitude, rec.longitude)
            .ok()
            .and_then(|geo| resolved.get(&geo.coord_key()).cloned().flatten())
    });

    let point = match existing_id {
        Some(id) => {
            TripRepository::update_point(&mut *conn, id, rec.latitude, rec.longitude, address.as_deref())
                .await?
        }
        None => {
            TripRepository::insert_point(&mut *conn, rec.latitude, rec.longitude, address.as_deref())
                .await?
        }
    };
    Ok(Some(point.id))
}

async fn import_track_points(
    conn: &mut PgConnection,
    records: &[TrackPointRecord],
    ctx: &mut ImportContext,
) -> AppResult<()> {
    for rec in records {
        let Some(vehicle_id) = resolve_vehicle(&mut *conn, ctx, rec.vehicle_id).await? else {
            ctx.report.record_issue(RecordIssue::Reference {
                entity: "track_point",
                external_id: rec.vehicle_id,
                message: format!("vehicle {} not found", rec.vehicle_id),
            });
            continue;
        };

        // La clave natural manda: una muestra duplicada nunca se
        // sobrescribe, ni siquiera con update_existing
        if TrackPointRepository::exists(&mut *conn, vehicle_id, rec.timestamp_utc).await? {
            ctx.report.record_issue(RecordIssue::Conflict {
                entity: "track_point",
                external_id: rec.vehicle_id,
                message: format!(
                    "sample at {} already exists, skipped",
                    rec.timestamp_utc.to_rfc3339()
                ),
            });
            continue;
        }

        if let Err(message) = validate_track_point_record(rec) {
            ctx.report.record_issue(RecordIssue::Validation {
                entity: "track_point",
                external_id: rec.vehicle_id,
                message,
            });
            continue;
        }
        TrackPointRepository::insert(&mut *conn, rec, vehicle_id).await?;
        ctx.report.track_points_imported += 1;
    }
    Ok(())
}

async fn resolve_enterprise(
    conn: &mut PgConnection,
    ctx: &mut ImportContext,
    external_id: i64,
) -> AppResult<Option<i64>> {
    if let Some(id) = ctx.enterprise_map.get(&external_id) {
        return Ok(Some(*id));
    }
    if external_id <= 0 {
        return Ok(None);
    }
    match EnterpriseRepository::get(conn, external_id).await? {
        Some(enterprise) => {
            ctx.enterprise_map.insert(external_id, enterprise.id);
            Ok(Some(enterprise.id))
        }
        None => Ok(None),
    }
}

async fn resolve_vehicle(
    conn: &mut PgConnection,
    ctx: &mut ImportContext,
    external_id: i64,
) -> AppResult<Option<i64>> {
    if let Some(id) = ctx.vehicle_map.get(&external_id) {
        return Ok(Some(*id));
    }
    if external_id <= 0 {
        return Ok(None);
    }
    match VehicleRepository::get(conn, external_id).await? {
        Some(vehicle) => {
            ctx.vehicle_map.insert(external_id, vehicle.id);
            Ok(Some(vehicle.id))
        }
        None => Ok(None),
    }
}

async fn resolve_driver(
    conn: &mut PgConnection,
    ctx: &mut ImportContext,
    external_id: i64,
) -> AppResult<Option<i64>> {
    if let Some(id) = ctx.driver_map.get(&external_id) {
        return Ok(Some(*id));
    }
    if external_id <= 0 {
        return Ok(None);
    }
    match DriverRepository::get(conn, external_id).await? {
        Some(driver) => {
            ctx.driver_map.insert(external_id, driver.id);
            Ok(Some(driver.id))
        }
        None => Ok(None),
    }
}

fn validate_enterprise_record(rec: &EnterpriseRecord) -> Result<(), String> {
    validation::validate_enterprise_name(&rec.name)
        .map_err(|_| format!("invalid enterprise name '{}'", rec.name))?;
    if let Some(tz) = rec.time_zone_id.as_deref() {
        if timezone::resolve_tz(Some(tz)).is_none() {
            return Err(format!("unknown time zone id '{}'", tz));
        }
    }
    Ok(())
}

fn validate_vehicle_record(rec: &VehicleRecord) -> Result<(), String> {
    validation::validate_not_empty(&rec.name).map_err(|_| "name must not be empty".to_string())?;
    validation::validate_non_negative(rec.price)
        .map_err(|_| format!("price must be non-negative, got {}", rec.price))?;
    if rec.mileage < 0 {
        return Err(format!("mileage must be non-negative, got {}", rec.mileage));
    }
    validation::validate_registration_number(&rec.registration_number)
        .map_err(|_| format!("invalid registration number '{}'", rec.registration_number))?;
    Ok(())
}

fn validate_driver_record(rec: &DriverRecord) -> Result<(), String> {
    validation::validate_not_empty(&rec.full_name)
        .map_err(|_| "full name must not be empty".to_string())?;
    validation::validate_length(&rec.full_name, 1, 255)
        .map_err(|_| "full name too long".to_string())?;
    validation::validate_non_negative(rec.salary)
        .map_err(|_| format!("salary must be non-negative, got {}", rec.salary))?;
    Ok(())
}

fn validate_trip_record(rec: &TripRecord) -> Result<(), String> {
    if rec.end_utc < rec.start_utc {
        return Err("trip end must not precede trip start".to_string());
    }
    if let Some(distance) = rec.distance_km {
        validation::validate_non_negative(distance)
            .map_err(|_| format!("distance must be non-negative, got {}", distance))?;
    }
    for (label, point) in [("start", &rec.start_point), ("end", &rec.end_point)] {
        if let Some(p) = point {
            validation::validate_coordinates(p.latitude, p.longitude)
                .map_err(|_| format!("{} point coordinates out of range", label))?;
        }
    }
    Ok(())
}

fn validate_track_point_record(rec: &TrackPointRecord) -> Result<(), String> {
    validation::validate_coordinates(rec.latitude, rec.longitude)
        .map_err(|_| "coordinates out of range".to_string())?;
    if rec.speed < 0.0 {
        return Err(format!("speed must be non-negative, got {}", rec.speed));
    }
    validation::validate_range(rec.fuel_level, 0.0, 100.0)
        .map_err(|_| format!("fuel level must be between 0 and 100, got {}", rec.fuel_level))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn vehicle_record() -> VehicleRecord {
        VehicleRecord {
            id: 1,
            name: "Truck 7".to_string(),
            price: Decimal::new(2_500_000, 2),
            mileage: 120_000,
            color: "red".to_string(),
            registration_number: "AB-123-CD".to_string(),
            brand_model_id: 1,
            enterprise_id: 1,
            active_driver_id: None,
            purchase_date: None,
        }
    }

    fn trip_record() -> TripRecord {
        TripRecord {
            id: 1,
            vehicle_id: 1,
            start_utc: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            end_utc: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            distance_km: Some(Decimal::new(425, 1)),
            start_point: Some(TripPointRecord {
                latitude: 55.75,
                longitude: 37.61,
                address: None,
            }),
            end_point: None,
        }
    }

    #[test]
    fn test_valid_vehicle_record() {
        assert!(validate_vehicle_record(&vehicle_record()).is_ok());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut rec = vehicle_record();
        rec.price = Decimal::new(-1, 0);
        let message = validate_vehicle_record(&rec).unwrap_err();
        assert!(message.contains("price"), "{}", message);
    }

    #[test]
    fn test_bad_registration_number_is_rejected() {
        let mut rec = vehicle_record();
        rec.registration_number = "12345".to_string();
        assert!(validate_vehicle_record(&rec).is_err());
    }

    #[test]
    fn test_trip_end_before_start_is_rejected() {
        let mut rec = trip_record();
        rec.end_utc = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
        let message = validate_trip_record(&rec).unwrap_err();
        assert!(message.contains("precede"), "{}", message);
    }

    #[test]
    fn test_trip_point_out_of_range_is_rejected() {
        let mut rec = trip_record();
        rec.start_point = Some(TripPointRecord {
            latitude: 95.0,
            longitude: 37.61,
            address: None,
        });
        assert!(validate_trip_record(&rec).is_err());
    }

    #[test]
    fn test_track_point_fuel_level_bounds() {
        let mut rec = TrackPointRecord {
            vehicle_id: 1,
            timestamp_utc: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            latitude: 55.75,
            longitude: 37.61,
            speed: 42.0,
            rpm: 2100,
            fuel_level: 55.0,
        };
        assert!(validate_track_point_record(&rec).is_ok());
        rec.fuel_level = 150.0;
        assert!(validate_track_point_record(&rec).is_err());
        rec.fuel_level = 55.0;
        rec.speed = -1.0;
        assert!(validate_track_point_record(&rec).is_err());
    }

    #[test]
    fn test_enterprise_unknown_time_zone_is_rejected() {
        let rec = EnterpriseRecord {
            id: 1,
            name: "Acme".to_string(),
            address: "HQ".to_string(),
            time_zone_id: Some("Not/AZone".to_string()),
        };
        let message = validate_enterprise_record(&rec).unwrap_err();
        assert!(message.contains("time zone"), "{}", message);
    }
}
