//! Repositorios de acceso a datos
//!
//! Un repositorio por agregado sobre PostgreSQL. Los métodos de lectura
//! trabajan sobre el pool; las escrituras del importador reciben la conexión
//! de la transacción abierta.

pub mod brand_model_repository;
pub mod driver_repository;
pub mod enterprise_repository;
pub mod track_point_repository;
pub mod trip_repository;
pub mod vehicle_repository;
