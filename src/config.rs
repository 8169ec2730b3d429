//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
use once_cell::sync::Lazy;
use std::env;

use label_maps::MapConfig;

use crate::errors::AppError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ajustes de la capa de mapeo (paralelismo, tamaño del pool).
    pub maps: MapConfig,
    /// Filtro de logging con la sintaxis de `RUST_LOG`.
    pub log_filter: String,
}

/// Instancia global perezosa de configuración, evaluada una sola vez. Un
/// valor mal formado queda registrado como error y se reporta en cada acceso.
pub static CONFIG: Lazy<Result<AppConfig, String>> = Lazy::new(|| {
    label_maps::config::init_dotenv();
    AppConfig::from_lookup(|var| env::var(var).ok())
});

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let maps = MapConfig::from_lookup(&lookup).map_err(|e| e.to_string())?;
        let log_filter = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "info".to_string());
        Ok(Self { maps, log_filter })
    }

    /// Acceso a `CONFIG`.
    pub fn global() -> Result<&'static AppConfig, AppError> {
        CONFIG.as_ref().map_err(|e| AppError::Config(e.clone()))
    }
}
