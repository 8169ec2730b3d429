use label_core::LabelError;
use label_maps::MapError;
use thiserror::Error;

/// Errores de la aplicación (binario y clientes de la librería).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error en pipeline: {0}")]
    Label(#[from] LabelError),
    #[error("Error en mapeo: {0}")]
    Map(#[from] MapError),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
}
