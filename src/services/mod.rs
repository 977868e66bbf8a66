//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan operaciones complejas que pueden involucrar
//! múltiples modelos o integraciones externas.

pub mod export_service;
pub mod geocoding_service;
pub mod import_service;
pub mod trip_query_service;

pub use export_service::ExportService;
pub use geocoding_service::GeocodingService;
pub use import_service::ImportService;
pub use trip_query_service::TripQueryService;
