//! Codec de formatos de intercambio
//!
//! Codificador/decodificador bidireccional del grafo canónico: JSON
//! estructural y un dialecto CSV propio por secciones. El contrato de cable
//! es fijo; los tests comprueban los encabezados literales.

pub mod csv;
pub mod json;

use chrono::{DateTime, Utc};

use crate::dto::exchange::ExchangeGraph;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeFormat {
    Json,
    Csv,
}

impl ExchangeFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExchangeFormat::Json => "application/json",
            ExchangeFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExchangeFormat::Json => "json",
            ExchangeFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExchangeFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExchangeFormat::Json),
            "csv" => Ok(ExchangeFormat::Csv),
            other => Err(AppError::Validation(format!(
                "unsupported format '{}', expected 'json' or 'csv'",
                other
            ))),
        }
    }
}

/// Decodificar texto crudo al grafo canónico.
///
/// JSON mal formado es fatal; el CSV tolera líneas rotas y las reporta
/// como advertencias.
pub fn decode(format: ExchangeFormat, text: &str) -> AppResult<(ExchangeGraph, Vec<String>)> {
    match format {
        ExchangeFormat::Json => json::decode(text).map(|graph| (graph, Vec::new())),
        ExchangeFormat::Csv => csv::decode(text),
    }
}

/// Codificar el grafo canónico: devuelve contenido, content type y
/// nombre de archivo
pub fn encode(
    format: ExchangeFormat,
    graph: &ExchangeGraph,
) -> AppResult<(String, &'static str, String)> {
    let content = match format {
        ExchangeFormat::Json => json::encode(graph)?,
        ExchangeFormat::Csv => csv::encode(graph),
    };
    let stamp = graph.exported_at.unwrap_or_else(Utc::now);
    let file_name = export_file_name(graph.enterprise.id, stamp, format.extension());
    Ok((content, format.content_type(), file_name))
}

/// `enterprise_{id}_export_{YYYYMMDD_HHMMSS}.{ext}`, timestamp en UTC
fn export_file_name(enterprise_id: i64, stamp: DateTime<Utc>, ext: &str) -> String {
    format!(
        "enterprise_{}_export_{}.{}",
        enterprise_id,
        stamp.format("%Y%m%d_%H%M%S"),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ExchangeFormat>().unwrap(), ExchangeFormat::Json);
        assert_eq!(" CSV ".parse::<ExchangeFormat>().unwrap(), ExchangeFormat::Csv);
        assert!("xml".parse::<ExchangeFormat>().is_err());
    }

    #[test]
    fn test_export_file_name() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 9).unwrap();
        assert_eq!(
            export_file_name(7, stamp, "csv"),
            "enterprise_7_export_20240501_134509.csv"
        );
    }
}
