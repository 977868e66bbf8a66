use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use dotenvy::dotenv;
use tracing::{error, info};

use fleet_exchange::config::environment::EnvironmentConfig;
use fleet_exchange::database::{create_pool, mask_database_url};
use fleet_exchange::formats::ExchangeFormat;
use fleet_exchange::services::{ExportService, ImportService, TripQueryService};
use fleet_exchange::utils::validation;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚚 Fleet Exchange - intercambio de datos de empresa");

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("import") => run_import(&args[2..]).await,
        Some("export") => run_export(&args[2..]).await,
        Some("range") => run_range(&args[2..]).await,
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("Uso:");
    println!("  fleet_exchange import <archivo> <json|csv> [--update]");
    println!("  fleet_exchange export <enterprise_id> <json|csv> [desde] [hasta]");
    println!("  fleet_exchange range <vehicle_id> <desde> <hasta> [zona] [json|geojson]");
    println!();
    println!("Fechas de export en RFC3339; fechas de range en hora local YYYY-MM-DDTHH:MM:SS");
}

async fn connect() -> Result<(sqlx::PgPool, EnvironmentConfig)> {
    let config = EnvironmentConfig::default();
    info!("🗄️ Conectando a {}", mask_database_url(&config.database_url));
    let pool = create_pool(Some(&config.database_url)).await?;
    Ok((pool, config))
}

async fn run_import(args: &[String]) -> Result<()> {
    let path = args
        .first()
        .ok_or_else(|| anyhow!("usage: import <archivo> <json|csv> [--update]"))?;
    let format: ExchangeFormat = args.get(1).map(String::as_str).unwrap_or("json").parse()?;
    let update_existing = args.iter().any(|a| a == "--update");

    let content = std::fs::read_to_string(path)?;
    let (pool, config) = connect().await?;
    let service = ImportService::new(pool);

    match service
        .import(&content, format, update_existing, config.geocoding_token.as_deref())
        .await
    {
        Ok(report) => {
            info!(
                "✅ Importados {} registros ({} advertencias, {} errores)",
                report.total_imported(),
                report.warnings.len(),
                report.errors.len()
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            error!("❌ Importación fallida: {}", e);
            Err(e.into())
        }
    }
}

async fn run_export(args: &[String]) -> Result<()> {
    let enterprise_id: i64 = args
        .first()
        .ok_or_else(|| anyhow!("usage: export <enterprise_id> <json|csv> [desde] [hasta]"))?
        .parse()?;
    let format: ExchangeFormat = args.get(1).map(String::as_str).unwrap_or("json").parse()?;
    let from = args.get(2).map(|s| parse_utc(s)).transpose()?;
    let to = args.get(3).map(|s| parse_utc(s)).transpose()?;

    let (pool, _config) = connect().await?;
    let service = ExportService::new(pool);
    let (content, content_type, file_name) = service.export(enterprise_id, from, to, format).await?;

    std::fs::write(&file_name, &content)?;
    info!(
        "✅ Exportado {} ({}, {} bytes)",
        file_name,
        content_type,
        content.len()
    );
    Ok(())
}

async fn run_range(args: &[String]) -> Result<()> {
    let usage = "usage: range <vehicle_id> <desde> <hasta> [zona] [json|geojson]";
    let vehicle_id: i64 = args.first().ok_or_else(|| anyhow!(usage))?.parse()?;
    let from_local = parse_local(args.get(1).ok_or_else(|| anyhow!(usage))?)?;
    let to_local = parse_local(args.get(2).ok_or_else(|| anyhow!(usage))?)?;
    let tz_id = args.get(3).filter(|s| !s.is_empty()).cloned();
    let output = args.get(4).map(String::as_str).unwrap_or("json");

    let (pool, config) = connect().await?;
    let service = TripQueryService::new(pool, config.geocoding_token.clone());

    match output {
        "geojson" => {
            let geojson = service
                .trips_in_range_geojson(vehicle_id, from_local, to_local, tz_id.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&geojson)?);
        }
        _ => {
            let result = service
                .trips_in_range(vehicle_id, from_local, to_local, tz_id.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    validation::validate_datetime(value)
        .map_err(|_| anyhow!("fecha inválida '{}', se espera RFC3339", value))
}

fn parse_local(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| anyhow!("fecha local inválida '{}', se espera YYYY-MM-DDTHH:MM:SS", value))
}
