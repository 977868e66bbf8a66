//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub database_url: String,
    /// Token del proveedor de geocodificación; sin token el enriquecedor
    /// queda desactivado
    pub geocoding_token: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            geocoding_token: env::var("GEOCODING_TOKEN").ok(),
        }
    }
}
