//! Motor de intercambio y reconciliación de datos de empresa
//!
//! Serializa el grafo operativo completo de una empresa (vehículos,
//! conductores, viajes, puntos geolocalizados) a JSON o CSV y lo reimporta
//! con garantías de integridad referencial, semántica de upsert, tolerancia
//! a fallos parciales y enriquecimiento de direcciones best-effort.
//! Incluye la consulta de rango consciente de zona horaria que comparte el
//! mismo modelo de entidades.

pub mod config;
pub mod database;
pub mod dto;
pub mod formats;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
