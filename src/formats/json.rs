//! Codec JSON del grafo canónico
//!
//! Deserialización estructural vía serde; un fallo de sintaxis es fatal y
//! corta toda la importación. La tolerancia de nombres de campo
//! (camelCase/PascalCase) vive en los alias de los DTOs.

use crate::dto::exchange::ExchangeGraph;
use crate::utils::errors::{AppError, AppResult};

pub fn decode(text: &str) -> AppResult<ExchangeGraph> {
    serde_json::from_str(text).map_err(|e| AppError::Parse(format!("invalid JSON: {}", e)))
}

pub fn encode(graph: &ExchangeGraph) -> AppResult<String> {
    serde_json::to_string_pretty(graph)
        .map_err(|e| AppError::Parse(format!("JSON encoding failed: {}", e)))
}
