//! Errores de la capa de mapeo.

use label_core::LabelError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// Error de la función mapeada (o de su firma).
    #[error(transparent)]
    Label(#[from] LabelError),
    /// Columnas de distinta longitud en un recorrido paralelo (zip).
    #[error("column {column} has {found} values, expected {expected}")]
    LengthMismatch { column: String, expected: usize, found: usize },
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
    #[error("invalid value for {var}: {value:?}")]
    InvalidConfig { var: String, value: String },
}
