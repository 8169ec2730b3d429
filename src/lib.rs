//! labelflow: funciones etiquetadas, pipelines y mapeos.
//!
//! Este crate agrupa los crates del workspace:
//! - `label_core`: callables etiquetados, resolución y ejecución de pipelines.
//! - `label_maps`: mapeos sobre rangos de inputs y resultados tabulares.
//!
//! Expone además `config` (configuración desde el entorno) y `errors`.

pub mod config;
pub mod errors;

pub use errors::AppError;
pub use label_core;
pub use label_core::namespace;
pub use label_maps;
