//! Propiedades de ida y vuelta del codec: para todo grafo bien formado,
//! decode(encode(G)) == G en ambos formatos (el CSV no transporta los
//! metadatos de exportación).

use chrono::{FixedOffset, TimeZone, Utc};
use rust_decimal::Decimal;

use fleet_exchange::dto::exchange::{
    DateRange, DriverRecord, EnterpriseRecord, ExchangeGraph, TrackPointRecord, TripPointRecord,
    TripRecord, VehicleRecord,
};
use fleet_exchange::formats::{self, ExchangeFormat};

fn sample_graph() -> ExchangeGraph {
    let offset = FixedOffset::east_opt(3 * 3600).unwrap();
    ExchangeGraph {
        enterprise: EnterpriseRecord {
            id: 3,
            name: "Acme Logistics".to_string(),
            address: "1 Main St, Springfield".to_string(),
            time_zone_id: Some("Europe/Moscow".to_string()),
        },
        vehicles: vec![VehicleRecord {
            id: 10,
            name: "Sedan, Deluxe".to_string(),
            price: Decimal::new(250_000_000, 2),
            mileage: 120_000,
            color: "red".to_string(),
            registration_number: "AB-123-CD".to_string(),
            brand_model_id: 2,
            enterprise_id: 3,
            active_driver_id: Some(7),
            purchase_date: Some(offset.with_ymd_and_hms(2023, 3, 15, 10, 0, 0).unwrap()),
        }],
        drivers: vec![DriverRecord {
            id: 7,
            full_name: "Ivan Petrov".to_string(),
            salary: Decimal::new(7_500_000, 2),
            enterprise_id: 3,
            vehicle_id: Some(10),
        }],
        trips: vec![TripRecord {
            id: 21,
            vehicle_id: 10,
            start_utc: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            end_utc: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            distance_km: Some(Decimal::new(425, 1)),
            start_point: Some(TripPointRecord {
                latitude: 55.7558,
                longitude: 37.6173,
                address: Some("Red Square, Moscow".to_string()),
            }),
            end_point: Some(TripPointRecord {
                latitude: 55.5815,
                longitude: 36.8251,
                address: None,
            }),
        }],
        track_points: vec![
            TrackPointRecord {
                vehicle_id: 10,
                timestamp_utc: Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap(),
                latitude: 55.7001,
                longitude: 37.5002,
                speed: 42.5,
                rpm: 2100,
                fuel_level: 55.5,
            },
            TrackPointRecord {
                vehicle_id: 10,
                timestamp_utc: Utc.with_ymd_and_hms(2024, 5, 1, 8, 16, 0).unwrap(),
                latitude: 55.7012,
                longitude: 37.5101,
                speed: 38.0,
                rpm: 1900,
                fuel_level: 55.1,
            },
        ],
        exported_at: Some(Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()),
        date_range: Some(DateRange {
            start_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            end_date: None,
        }),
    }
}

#[test]
fn json_round_trip_preserves_graph() {
    let graph = sample_graph();
    let (content, content_type, file_name) =
        formats::encode(ExchangeFormat::Json, &graph).unwrap();

    assert_eq!(content_type, "application/json");
    assert_eq!(file_name, "enterprise_3_export_20240502_120000.json");

    let (decoded, warnings) = formats::decode(ExchangeFormat::Json, &content).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(decoded, graph);
}

#[test]
fn csv_round_trip_preserves_records() {
    let graph = sample_graph();
    let (content, content_type, file_name) =
        formats::encode(ExchangeFormat::Csv, &graph).unwrap();

    assert_eq!(content_type, "text/csv");
    assert_eq!(file_name, "enterprise_3_export_20240502_120000.csv");

    let (decoded, warnings) = formats::decode(ExchangeFormat::Csv, &content).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);

    // El CSV no transporta los metadatos de exportación
    let mut expected = graph;
    expected.exported_at = None;
    expected.date_range = None;
    assert_eq!(decoded, expected);
}

#[test]
fn csv_quotes_fields_with_commas() {
    let graph = sample_graph();
    let (content, _, _) = formats::encode(ExchangeFormat::Csv, &graph).unwrap();

    assert!(content.contains("\"Sedan, Deluxe\""));
    assert!(content.contains("\"1 Main St, Springfield\""));

    let (decoded, _) = formats::decode(ExchangeFormat::Csv, &content).unwrap();
    assert_eq!(decoded.vehicles[0].name, "Sedan, Deluxe");
    assert_eq!(decoded.enterprise.address, "1 Main St, Springfield");
}

#[test]
fn json_export_uses_camel_case_schema() {
    let graph = sample_graph();
    let (content, _, _) = formats::encode(ExchangeFormat::Json, &graph).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert!(value["enterprise"]["timeZoneId"].is_string());
    assert!(value["vehicles"][0]["registrationNumber"].is_string());
    assert!(value["trackPoints"][0]["timestampUtc"].is_string());
    assert!(value["dateRange"]["startDate"].is_string());
    assert!(value["exportedAt"].is_string());
}
