//! Codec CSV del grafo canónico
//!
//! Dialecto propio por secciones: cinco bloques marcados con líneas
//! `=== NOMBRE ===`, cada uno con un encabezado de columnas fijo. El parser
//! de campos es un splitter a mano consciente de comillas estilo RFC4180.
//! A diferencia del JSON, una línea rota no aborta la decodificación: se
//! registra una advertencia y la línea se salta, porque el CSV se edita a
//! mano con más frecuencia.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::dto::exchange::{
    DriverRecord, EnterpriseRecord, ExchangeGraph, TrackPointRecord, TripPointRecord, TripRecord,
    VehicleRecord,
};
use crate::utils::errors::{AppError, AppResult};

const SECTION_ENTERPRISE: &str = "=== ENTERPRISE ===";
const SECTION_VEHICLES: &str = "=== VEHICLES ===";
const SECTION_DRIVERS: &str = "=== DRIVERS ===";
const SECTION_TRIPS: &str = "=== TRIPS ===";
const SECTION_TRACK_POINTS: &str = "=== TRACK_POINTS ===";

const HEADER_ENTERPRISE: &str = "Id,Name,Address,TimeZoneId";
const HEADER_VEHICLES: &str =
    "Id,Name,Price,Mileage,Color,RegistrationNumber,BrandModelId,EnterpriseId,ActiveDriverId,PurchaseDate";
const HEADER_DRIVERS: &str = "Id,FullName,Salary,EnterpriseId,VehicleId";
const HEADER_TRIPS: &str =
    "Id,VehicleId,StartUtc,EndUtc,DistanceKm,StartLatitude,StartLongitude,StartAddress,EndLatitude,EndLongitude,EndAddress";
const HEADER_TRACK_POINTS: &str = "VehicleId,TimestampUtc,Latitude,Longitude,Speed,Rpm,FuelLevel";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Enterprise,
    Vehicles,
    Drivers,
    Trips,
    TrackPoints,
    Unknown,
}

impl Section {
    fn from_marker(line: &str) -> Option<Section> {
        match line {
            SECTION_ENTERPRISE => Some(Section::Enterprise),
            SECTION_VEHICLES => Some(Section::Vehicles),
            SECTION_DRIVERS => Some(Section::Drivers),
            SECTION_TRIPS => Some(Section::Trips),
            SECTION_TRACK_POINTS => Some(Section::TrackPoints),
            _ if line.starts_with("===") && line.ends_with("===") => Some(Section::Unknown),
            _ => None,
        }
    }

    /// Primera columna del encabezado, para saltarlo por firma
    fn header_signature(&self) -> &'static str {
        match self {
            Section::TrackPoints => "vehicleid",
            _ => "id",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Section::Enterprise => "ENTERPRISE",
            Section::Vehicles => "VEHICLES",
            Section::Drivers => "DRIVERS",
            Section::Trips => "TRIPS",
            Section::TrackPoints => "TRACK_POINTS",
            Section::Unknown => "UNKNOWN",
        }
    }
}

pub fn decode(text: &str) -> AppResult<(ExchangeGraph, Vec<String>)> {
    let mut warnings = Vec::new();
    let mut enterprise: Option<EnterpriseRecord> = None;
    let mut vehicles = Vec::new();
    let mut drivers = Vec::new();
    let mut trips = Vec::new();
    let mut track_points = Vec::new();

    let mut section: Option<Section> = None;
    let mut awaiting_first_line = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(next) = Section::from_marker(line) {
            if next == Section::Unknown {
                warnings.push(format!("line {}: unknown section '{}' ignored", line_no, line));
            }
            section = Some(next);
            awaiting_first_line = true;
            continue;
        }

        let current = match section {
            Some(s) => s,
            None => {
                warnings.push(format!(
                    "line {}: data before any section marker, skipped",
                    line_no
                ));
                continue;
            }
        };

        if current == Section::Unknown {
            continue;
        }

        let fields = split_line(line);

        // La primera línea de una sección puede ser el encabezado
        if awaiting_first_line {
            awaiting_first_line = false;
            if fields
                .first()
                .map(|f| f.trim().eq_ignore_ascii_case(current.header_signature()))
                .unwrap_or(false)
            {
                continue;
            }
        }

        let parsed = match current {
            Section::Enterprise => parse_enterprise(&fields).map(|rec| {
                if enterprise.is_some() {
                    warnings.push(format!(
                        "line {}: extra ENTERPRISE row ignored",
                        line_no
                    ));
                } else {
                    enterprise = Some(rec);
                }
            }),
            Section::Vehicles => parse_vehicle(&fields).map(|rec| vehicles.push(rec)),
            Section::Drivers => parse_driver(&fields).map(|rec| drivers.push(rec)),
            Section::Trips => parse_trip(&fields).map(|rec| trips.push(rec)),
            Section::TrackPoints => parse_track_point(&fields).map(|rec| track_points.push(rec)),
            Section::Unknown => Ok(()),
        };

        if let Err(message) = parsed {
            warnings.push(format!(
                "{} line {}: {}, line skipped",
                current.name(),
                line_no,
                message
            ));
        }
    }

    let enterprise = enterprise
        .ok_or_else(|| AppError::Parse("missing ENTERPRISE section".to_string()))?;

    Ok((
        ExchangeGraph {
            enterprise,
            vehicles,
            drivers,
            trips,
            track_points,
            exported_at: None,
            date_range: None,
        },
        warnings,
    ))
}

pub fn encode(graph: &ExchangeGraph) -> String {
    let mut out = String::new();

    out.push_str(SECTION_ENTERPRISE);
    out.push('\n');
    out.push_str(HEADER_ENTERPRISE);
    out.push('\n');
    let e = &graph.enterprise;
    push_row(
        &mut out,
        &[
            e.id.to_string(),
            escape(&e.name),
            escape(&e.address),
            escape(e.time_zone_id.as_deref().unwrap_or("")),
        ],
    );

    out.push('\n');
    out.push_str(SECTION_VEHICLES);
    out.push('\n');
    out.push_str(HEADER_VEHICLES);
    out.push('\n');
    for v in &graph.vehicles {
        push_row(
            &mut out,
            &[
                v.id.to_string(),
                escape(&v.name),
                v.price.to_string(),
                v.mileage.to_string(),
                escape(&v.color),
                escape(&v.registration_number),
                v.brand_model_id.to_string(),
                v.enterprise_id.to_string(),
                opt_to_string(v.active_driver_id),
                v.purchase_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            ],
        );
    }

    out.push('\n');
    out.push_str(SECTION_DRIVERS);
    out.push('\n');
    out.push_str(HEADER_DRIVERS);
    out.push('\n');
    for d in &graph.drivers {
        push_row(
            &mut out,
            &[
                d.id.to_string(),
                escape(&d.full_name),
                d.salary.to_string(),
                d.enterprise_id.to_string(),
                opt_to_string(d.vehicle_id),
            ],
        );
    }

    out.push('\n');
    out.push_str(SECTION_TRIPS);
    out.push('\n');
    out.push_str(HEADER_TRIPS);
    out.push('\n');
    for t in &graph.trips {
        let (start_lat, start_lon, start_addr) = point_cells(t.start_point.as_ref());
        let (end_lat, end_lon, end_addr) = point_cells(t.end_point.as_ref());
        push_row(
            &mut out,
            &[
                t.id.to_string(),
                t.vehicle_id.to_string(),
                t.start_utc.to_rfc3339(),
                t.end_utc.to_rfc3339(),
                t.distance_km.map(|d| d.to_string()).unwrap_or_default(),
                start_lat,
                start_lon,
                start_addr,
                end_lat,
                end_lon,
                end_addr,
            ],
        );
    }

    out.push('\n');
    out.push_str(SECTION_TRACK_POINTS);
    out.push('\n');
    out.push_str(HEADER_TRACK_POINTS);
    out.push('\n');
    for p in &graph.track_points {
        push_row(
            &mut out,
            &[
                p.vehicle_id.to_string(),
                p.timestamp_utc.to_rfc3339(),
                p.latitude.to_string(),
                p.longitude.to_string(),
                p.speed.to_string(),
                p.rpm.to_string(),
                p.fuel_level.to_string(),
            ],
        );
    }

    out
}

/// Separar una línea en campos. Una comilla doble alterna el estado
/// "dentro de comillas"; las comas dentro de comillas no separan y `""`
/// dentro de comillas es una comilla escapada.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str(&cells.join(","));
    out.push('\n');
}

fn opt_to_string(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn point_cells(point: Option<&TripPointRecord>) -> (String, String, String) {
    match point {
        Some(p) => (
            p.latitude.to_string(),
            p.longitude.to_string(),
            escape(p.address.as_deref().unwrap_or("")),
        ),
        None => (String::new(), String::new(), String::new()),
    }
}

fn cell<'a>(fields: &'a [String], idx: usize, name: &str) -> Result<&'a str, String> {
    fields
        .get(idx)
        .map(|f| f.trim())
        .ok_or_else(|| format!("missing field '{}'", name))
}

fn req_i64(fields: &[String], idx: usize, name: &str) -> Result<i64, String> {
    let raw = cell(fields, idx, name)?;
    raw.parse::<i64>()
        .map_err(|_| format!("invalid integer '{}' in field '{}'", raw, name))
}

fn opt_i64(fields: &[String], idx: usize, name: &str) -> Result<Option<i64>, String> {
    let raw = cell(fields, idx, name)?;
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| format!("invalid integer '{}' in field '{}'", raw, name))
}

fn req_i32(fields: &[String], idx: usize, name: &str) -> Result<i32, String> {
    let raw = cell(fields, idx, name)?;
    raw.parse::<i32>()
        .map_err(|_| format!("invalid integer '{}' in field '{}'", raw, name))
}

fn req_f64(fields: &[String], idx: usize, name: &str) -> Result<f64, String> {
    let raw = cell(fields, idx, name)?;
    raw.parse::<f64>()
        .map_err(|_| format!("invalid number '{}' in field '{}'", raw, name))
}

fn opt_f64(fields: &[String], idx: usize, name: &str) -> Result<Option<f64>, String> {
    let raw = cell(fields, idx, name)?;
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid number '{}' in field '{}'", raw, name))
}

fn req_decimal(fields: &[String], idx: usize, name: &str) -> Result<Decimal, String> {
    let raw = cell(fields, idx, name)?;
    raw.parse::<Decimal>()
        .map_err(|_| format!("invalid decimal '{}' in field '{}'", raw, name))
}

fn opt_decimal(fields: &[String], idx: usize, name: &str) -> Result<Option<Decimal>, String> {
    let raw = cell(fields, idx, name)?;
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Decimal>()
        .map(Some)
        .map_err(|_| format!("invalid decimal '{}' in field '{}'", raw, name))
}

fn req_datetime_utc(fields: &[String], idx: usize, name: &str) -> Result<DateTime<Utc>, String> {
    let raw = cell(fields, idx, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid timestamp '{}' in field '{}'", raw, name))
}

fn opt_datetime_fixed(
    fields: &[String],
    idx: usize,
    name: &str,
) -> Result<Option<DateTime<FixedOffset>>, String> {
    let raw = cell(fields, idx, name)?;
    if raw.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(Some)
        .map_err(|_| format!("invalid timestamp '{}' in field '{}'", raw, name))
}

fn opt_string(fields: &[String], idx: usize, name: &str) -> Result<Option<String>, String> {
    let raw = cell(fields, idx, name)?;
    Ok(if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    })
}

fn parse_enterprise(fields: &[String]) -> Result<EnterpriseRecord, String> {
    Ok(EnterpriseRecord {
        id: req_i64(fields, 0, "Id")?,
        name: cell(fields, 1, "Name")?.to_string(),
        address: cell(fields, 2, "Address")?.to_string(),
        time_zone_id: opt_string(fields, 3, "TimeZoneId")?,
    })
}

fn parse_vehicle(fields: &[String]) -> Result<VehicleRecord, String> {
    Ok(VehicleRecord {
        id: req_i64(fields, 0, "Id")?,
        name: cell(fields, 1, "Name")?.to_string(),
        price: req_decimal(fields, 2, "Price")?,
        mileage: req_i64(fields, 3, "Mileage")?,
        color: cell(fields, 4, "Color")?.to_string(),
        registration_number: cell(fields, 5, "RegistrationNumber")?.to_string(),
        brand_model_id: req_i64(fields, 6, "BrandModelId")?,
        enterprise_id: req_i64(fields, 7, "EnterpriseId")?,
        active_driver_id: opt_i64(fields, 8, "ActiveDriverId")?,
        purchase_date: opt_datetime_fixed(fields, 9, "PurchaseDate")?,
    })
}

fn parse_driver(fields: &[String]) -> Result<DriverRecord, String> {
    Ok(DriverRecord {
        id: req_i64(fields, 0, "Id")?,
        full_name: cell(fields, 1, "FullName")?.to_string(),
        salary: req_decimal(fields, 2, "Salary")?,
        enterprise_id: req_i64(fields, 3, "EnterpriseId")?,
        vehicle_id: opt_i64(fields, 4, "VehicleId")?,
    })
}

fn parse_trip(fields: &[String]) -> Result<TripRecord, String> {
    let start_point = parse_point(fields, 5, 6, 7)?;
    let end_point = parse_point(fields, 8, 9, 10)?;
    Ok(TripRecord {
        id: req_i64(fields, 0, "Id")?,
        vehicle_id: req_i64(fields, 1, "VehicleId")?,
        start_utc: req_datetime_utc(fields, 2, "StartUtc")?,
        end_utc: req_datetime_utc(fields, 3, "EndUtc")?,
        distance_km: opt_decimal(fields, 4, "DistanceKm")?,
        start_point,
        end_point,
    })
}

/// Un punto existe cuando latitud y longitud están presentes; una sola de
/// las dos es un error de línea
fn parse_point(
    fields: &[String],
    lat_idx: usize,
    lon_idx: usize,
    addr_idx: usize,
) -> Result<Option<TripPointRecord>, String> {
    let lat = opt_f64(fields, lat_idx, "Latitude")?;
    let lon = opt_f64(fields, lon_idx, "Longitude")?;
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(Some(TripPointRecord {
            latitude,
            longitude,
            address: opt_string(fields, addr_idx, "Address")?,
        })),
        (None, None) => Ok(None),
        _ => Err("point requires both latitude and longitude".to_string()),
    }
}

fn parse_track_point(fields: &[String]) -> Result<TrackPointRecord, String> {
    Ok(TrackPointRecord {
        vehicle_id: req_i64(fields, 0, "VehicleId")?,
        timestamp_utc: req_datetime_utc(fields, 1, "TimestampUtc")?,
        latitude: req_f64(fields, 2, "Latitude")?,
        longitude: req_f64(fields, 3, "Longitude")?,
        speed: req_f64(fields, 4, "Speed")?,
        rpm: req_i32(fields, 5, "Rpm")?,
        fuel_level: req_f64(fields, 6, "FuelLevel")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_plain() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_line("a,,c"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_split_line_quoted_comma() {
        // Una coma entre comillas no separa campos
        assert_eq!(
            split_line("1,\"Sedan, Deluxe\",red"),
            vec!["1", "Sedan, Deluxe", "red"]
        );
    }

    #[test]
    fn test_split_line_escaped_quote() {
        assert_eq!(
            split_line("\"say \"\"hi\"\"\",x"),
            vec!["say \"hi\"", "x"]
        );
    }

    #[test]
    fn test_escape_round_trip() {
        for value in ["plain", "with, comma", "with \"quotes\"", ""] {
            let escaped = escape(value);
            assert_eq!(split_line(&escaped), vec![value]);
        }
    }

    #[test]
    fn test_decode_minimal() {
        let text = "=== ENTERPRISE ===\nId,Name,Address,TimeZoneId\n3,Acme,\"1 Main St, Springfield\",Europe/Moscow\n";
        let (graph, warnings) = decode(text).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(graph.enterprise.id, 3);
        assert_eq!(graph.enterprise.address, "1 Main St, Springfield");
        assert_eq!(graph.enterprise.time_zone_id.as_deref(), Some("Europe/Moscow"));
    }

    #[test]
    fn test_decode_without_header_line() {
        // El encabezado es opcional: se detecta por firma de la primera columna
        let text = "=== ENTERPRISE ===\n3,Acme,Somewhere,\n";
        let (graph, warnings) = decode(text).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(graph.enterprise.name, "Acme");
        assert!(graph.enterprise.time_zone_id.is_none());
    }

    #[test]
    fn test_bad_line_is_warning_not_fatal() {
        let text = concat!(
            "=== ENTERPRISE ===\n",
            "1,Acme,HQ,\n",
            "=== VEHICLES ===\n",
            "Id,Name,Price,Mileage,Color,RegistrationNumber,BrandModelId,EnterpriseId,ActiveDriverId,PurchaseDate\n",
            "10,Truck,not-a-price,0,red,AB-123-CD,1,1,,\n",
            "11,Van,5000.50,120,blue,CD-456-EF,1,1,,\n",
        );
        let (graph, warnings) = decode(text).unwrap();
        assert_eq!(graph.vehicles.len(), 1);
        assert_eq!(graph.vehicles[0].id, 11);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("VEHICLES line 5"), "{}", warnings[0]);
        assert!(warnings[0].contains("not-a-price"));
    }

    #[test]
    fn test_missing_enterprise_section_is_fatal() {
        let err = decode("=== VEHICLES ===\n").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_unknown_section_warns_and_skips() {
        let text = "=== ENTERPRISE ===\n1,Acme,HQ,\n=== MANAGERS ===\n9,nobody\n";
        let (graph, warnings) = decode(text).unwrap();
        assert_eq!(graph.enterprise.id, 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown section"));
    }

    #[test]
    fn test_encode_emits_literal_headers() {
        let graph = ExchangeGraph {
            enterprise: EnterpriseRecord {
                id: 1,
                name: "Acme".to_string(),
                address: "HQ".to_string(),
                time_zone_id: None,
            },
            vehicles: vec![],
            drivers: vec![],
            trips: vec![],
            track_points: vec![],
            exported_at: None,
            date_range: None,
        };
        let text = encode(&graph);
        assert!(text.contains("=== ENTERPRISE ===\nId,Name,Address,TimeZoneId\n"));
        assert!(text.contains("=== VEHICLES ===\nId,Name,Price,Mileage,Color,RegistrationNumber,BrandModelId,EnterpriseId,ActiveDriverId,PurchaseDate\n"));
        assert!(text.contains("=== DRIVERS ===\nId,FullName,Salary,EnterpriseId,VehicleId\n"));
        assert!(text.contains("=== TRIPS ===\n"));
        assert!(text.contains("=== TRACK_POINTS ===\nVehicleId,TimestampUtc,Latitude,Longitude,Speed,Rpm,FuelLevel\n"));
    }
}
