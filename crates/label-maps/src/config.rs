//! Configuración de la capa de mapeo desde variables de entorno.
//!
//! - `LABELFLOW_PARALLEL`: `1`/`true` para mapear en paralelo (default: no).
//! - `LABELFLOW_MAX_WORKERS`: hilos del pool (default: los de rayon).
//! - `LABELFLOW_CHUNK_SIZE`: mínimo de llamadas por tarea (default: 1).
//!
//! Los contadores deben ser enteros positivos.

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::MapError;

const PARALLEL: &str = "LABELFLOW_PARALLEL";
const MAX_WORKERS: &str = "LABELFLOW_MAX_WORKERS";
const CHUNK_SIZE: &str = "LABELFLOW_CHUNK_SIZE";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    pub parallel: bool,
    pub max_workers: Option<usize>,
    pub chunk_size: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

impl MapConfig {
    /// Lee la configuración con `lookup` (normalmente `std::env::var`, tras
    /// `init_dotenv`). Un valor presente pero mal formado es error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MapError> {
        let parallel = lookup(PARALLEL).map(|v| parse_flag(PARALLEL, &v)).transpose()?.unwrap_or(false);
        let max_workers = lookup(MAX_WORKERS).map(|v| parse_count(MAX_WORKERS, &v)).transpose()?;
        let chunk_size = lookup(CHUNK_SIZE).map(|v| parse_count(CHUNK_SIZE, &v)).transpose()?.unwrap_or(1);
        Ok(Self { parallel,
                  max_workers,
                  chunk_size })
    }

    pub fn sequential() -> Self {
        Self { parallel: false,
               max_workers: None,
               chunk_size: 1 }
    }

    pub fn parallel(max_workers: Option<usize>) -> Self {
        Self { parallel: true,
               max_workers,
               chunk_size: 1 }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, MapError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, raw)),
    }
}

fn parse_count(var: &str, raw: &str) -> Result<usize, MapError> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| invalid(var, raw))
}

fn invalid(var: &str, raw: &str) -> MapError {
    MapError::InvalidConfig { var: var.to_string(),
                              value: raw.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var: &str| pairs.iter().find(|(k, _)| *k == var).map(|(_, v)| v.to_string())
    }

    #[test]
    fn unset_variables_mean_sequential() {
        assert_eq!(MapConfig::from_lookup(lookup(&[])).unwrap(), MapConfig::sequential());
    }

    #[test]
    fn reads_all_variables() {
        let vars = [(PARALLEL, "True"), (MAX_WORKERS, " 4 "), (CHUNK_SIZE, "16")];
        let config = MapConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config,
                   MapConfig { parallel: true,
                               max_workers: Some(4),
                               chunk_size: 16 });
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = MapConfig::from_lookup(lookup(&[(MAX_WORKERS, "many")])).unwrap_err();
        assert_eq!(err,
                   MapError::InvalidConfig { var: MAX_WORKERS.into(),
                                             value: "many".into() });

        let err = MapConfig::from_lookup(lookup(&[(CHUNK_SIZE, "0")])).unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig { ref var, .. } if var == CHUNK_SIZE));

        assert!(MapConfig::from_lookup(lookup(&[(PARALLEL, "maybe")])).is_err());
    }
}
