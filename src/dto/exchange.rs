//! Esquema canónico de intercambio
//!
//! Representación en memoria, agnóstica de formato, del grafo exportable de
//! una empresa. Tanto el codec JSON como el CSV producen y consumen estas
//! estructuras. Las claves JSON son camelCase; los alias toleran PascalCase
//! en datos editados a mano.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn is_zero(id: &i64) -> bool {
    *id == 0
}

/// Grafo canónico completo de una empresa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeGraph {
    #[serde(alias = "Enterprise")]
    pub enterprise: EnterpriseRecord,
    #[serde(default, alias = "Vehicles")]
    pub vehicles: Vec<VehicleRecord>,
    #[serde(default, alias = "Drivers")]
    pub drivers: Vec<DriverRecord>,
    #[serde(default, alias = "Trips")]
    pub trips: Vec<TripRecord>,
    #[serde(default, alias = "TrackPoints")]
    pub track_points: Vec<TrackPointRecord>,
    #[serde(default, alias = "ExportedAt", skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "DateRange", skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Rango de fechas cubierto por una exportación; límites abiertos = sin filtro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, alias = "StartDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "EndDate")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Identidad externa 0 o ausente = registro nuevo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseRecord {
    #[serde(default, alias = "Id", skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Address")]
    pub address: String,
    #[serde(default, alias = "TimeZoneId")]
    pub time_zone_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    #[serde(default, alias = "Id", skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Price")]
    pub price: Decimal,
    #[serde(default, alias = "Mileage")]
    pub mileage: i64,
    #[serde(default, alias = "Color")]
    pub color: String,
    #[serde(alias = "RegistrationNumber")]
    pub registration_number: String,
    #[serde(alias = "BrandModelId")]
    pub brand_model_id: i64,
    #[serde(alias = "EnterpriseId")]
    pub enterprise_id: i64,
    #[serde(default, alias = "ActiveDriverId")]
    pub active_driver_id: Option<i64>,
    #[serde(default, alias = "PurchaseDate")]
    pub purchase_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    #[serde(default, alias = "Id", skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(alias = "FullName")]
    pub full_name: String,
    #[serde(alias = "Salary")]
    pub salary: Decimal,
    #[serde(alias = "EnterpriseId")]
    pub enterprise_id: i64,
    #[serde(default, alias = "VehicleId")]
    pub vehicle_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(default, alias = "Id", skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(alias = "VehicleId")]
    pub vehicle_id: i64,
    #[serde(alias = "StartUtc")]
    pub start_utc: DateTime<Utc>,
    #[serde(alias = "EndUtc")]
    pub end_utc: DateTime<Utc>,
    #[serde(default, alias = "DistanceKm")]
    pub distance_km: Option<Decimal>,
    #[serde(default, alias = "StartPoint")]
    pub start_point: Option<TripPointRecord>,
    #[serde(default, alias = "EndPoint")]
    pub end_point: Option<TripPointRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPointRecord {
    #[serde(alias = "Latitude")]
    pub latitude: f64,
    #[serde(alias = "Longitude")]
    pub longitude: f64,
    #[serde(default, alias = "Address")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPointRecord {
    #[serde(alias = "VehicleId")]
    pub vehicle_id: i64,
    #[serde(alias = "TimestampUtc")]
    pub timestamp_utc: DateTime<Utc>,
    #[serde(alias = "Latitude")]
    pub latitude: f64,
    #[serde(alias = "Longitude")]
    pub longitude: f64,
    #[serde(default, alias = "Speed")]
    pub speed: f64,
    #[serde(default, alias = "Rpm")]
    pub rpm: i32,
    #[serde(default, alias = "FuelLevel")]
    pub fuel_level: f64,
}
