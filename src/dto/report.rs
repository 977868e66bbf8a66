//! Reporte de importación
//!
//! Resultado granular de una importación: contadores por tipo de entidad más
//! las listas de errores y advertencias por registro. Las listas se entregan
//! al llamador tal cual, nunca se descartan.

use serde::Serialize;

use crate::utils::errors::RecordIssue;

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub enterprises_imported: u32,
    pub vehicles_imported: u32,
    pub drivers_imported: u32,
    pub trips_imported: u32,
    pub track_points_imported: u32,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Registrar un fallo local: los conflictos son advertencias,
    /// el resto errores
    pub fn record_issue(&mut self, issue: RecordIssue) {
        if issue.is_warning() {
            self.warnings.push(issue.to_string());
        } else {
            self.errors.push(issue.to_string());
        }
    }

    pub fn total_imported(&self) -> u32 {
        self.enterprises_imported
            + self.vehicles_imported
            + self.drivers_imported
            + self.trips_imported
            + self.track_points_imported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_issue_routing() {
        let mut report = ImportReport::default();
        report.record_issue(RecordIssue::Conflict {
            entity: "vehicle",
            external_id: 1,
            message: "already exists, skipped".to_string(),
        });
        report.record_issue(RecordIssue::Validation {
            entity: "vehicle",
            external_id: 2,
            message: "price must be non-negative".to_string(),
        });
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.total_imported(), 0);
    }
}
