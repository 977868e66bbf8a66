//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema: errores fatales de la
//! aplicación y los fallos locales por registro que acumula el importador.

use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Fallo local de un registro durante la importación.
///
/// Estos fallos nunca abortan la transacción: se acumulan en el reporte y el
/// importador continúa con el siguiente registro. `Validation` y `Reference`
/// terminan en la lista de errores, `Conflict` en la de advertencias.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordIssue {
    Validation {
        entity: &'static str,
        external_id: i64,
        message: String,
    },
    Reference {
        entity: &'static str,
        external_id: i64,
        message: String,
    },
    Conflict {
        entity: &'static str,
        external_id: i64,
        message: String,
    },
}

impl RecordIssue {
    pub fn is_warning(&self) -> bool {
        matches!(self, RecordIssue::Conflict { .. })
    }
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordIssue::Validation {
                entity,
                external_id,
                message,
            } => write!(f, "{} {}: {}", entity, external_id, message),
            RecordIssue::Reference {
                entity,
                external_id,
                message,
            } => write!(f, "{} {}: broken reference: {}", entity, external_id, message),
            RecordIssue::Conflict {
                entity,
                external_id,
                message,
            } => write!(f, "{} {}: {}", entity, external_id, message),
        }
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_issue_display() {
        let issue = RecordIssue::Validation {
            entity: "vehicle",
            external_id: 7,
            message: "price must be non-negative".to_string(),
        };
        assert_eq!(issue.to_string(), "vehicle 7: price must be non-negative");
        assert!(!issue.is_warning());

        let conflict = RecordIssue::Conflict {
            entity: "driver",
            external_id: 3,
            message: "already exists, skipped".to_string(),
        };
        assert!(conflict.is_warning());
    }

    #[test]
    fn test_not_found_error() {
        let err = not_found_error("enterprise", 42);
        assert_eq!(err.to_string(), "Not found: enterprise with id '42' not found");
    }
}
