//! Mapeo de callables etiquetados sobre columnas de valores.
//!
//! Cada fila de entrada produce una llamada independiente. En modo paralelo
//! las llamadas se reparten en un pool de rayon dimensionado según
//! `MapConfig`; el orden de los resultados siempre sigue al de las filas.

use std::borrow::Cow;

use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use label_core::{keeping_inputs, label, IntoStep, Labelled, Namespace, Step, Value};

use crate::config::MapConfig;
use crate::errors::MapError;
use crate::iter::{columns_from_positional, lproduct, lzip, Columns};
use crate::table::Table;

/// Origen de los valores a recorrer en un mapeo.
#[derive(Debug, Clone)]
pub enum MapInput<'a> {
    /// Columnas keyword.
    Columns(&'a Columns),
    /// Vectores asignados a los inputs del callable en orden, más columnas
    /// keyword para el resto.
    Positional { positional: Vec<Vec<Value>>, keyword: Columns },
    /// Resultado previo: se toman las columnas que son inputs del callable.
    Table(&'a Table),
}

impl<'a> MapInput<'a> {
    pub fn positional(positional: Vec<Vec<Value>>) -> Self {
        MapInput::Positional { positional,
                               keyword: Columns::new() }
    }

    fn into_columns(self, step: &Step) -> Result<Cow<'a, Columns>, MapError> {
        match self {
            MapInput::Columns(columns) => Ok(Cow::Borrowed(columns)),
            MapInput::Positional { positional, keyword } => {
                columns_from_positional(step.name(), step.input_names(), positional, keyword).map(Cow::Owned)
            }
            MapInput::Table(table) => Ok(Cow::Owned(table.to_columns(step.input_names()))),
        }
    }
}

impl<'a> From<&'a Columns> for MapInput<'a> {
    fn from(columns: &'a Columns) -> Self {
        MapInput::Columns(columns)
    }
}

impl<'a> From<&'a Table> for MapInput<'a> {
    fn from(table: &'a Table) -> Self {
        MapInput::Table(table)
    }
}

/// Aplica `step` a cada fila (argumentos keyword) y devuelve sus outputs.
pub fn map_rows(step: &Step, rows: &[Namespace], config: &MapConfig) -> Result<Vec<Namespace>, MapError> {
    if !config.parallel || rows.len() < 2 {
        return rows.iter().map(|r| step.call_kwargs(r.clone()).map_err(MapError::from)).collect();
    }

    let mut builder = ThreadPoolBuilder::new();
    if let Some(n) = config.max_workers {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().map_err(|e| MapError::ThreadPool(e.to_string()))?;
    debug!("{}: {} llamadas en {} hilos", step.name(), rows.len(), pool.current_num_threads());

    pool.install(|| {
            rows.par_iter()
                .with_min_len(config.chunk_size)
                .map(|r| step.call_kwargs(r.clone()).map_err(MapError::from))
                .collect()
        })
}

/// `map` keyword: una llamada por fila de `lzip` sobre las columnas.
pub fn lmap<'a>(callable: impl IntoStep,
                input: impl Into<MapInput<'a>>,
                config: &MapConfig)
                -> Result<Vec<Namespace>, MapError> {
    let step = label(callable);
    let columns = input.into().into_columns(&step)?;
    map_rows(&step, &lzip(&columns)?, config)
}

/// Una llamada por cada combinación de `lproduct` sobre las columnas.
pub fn lcartesian_map<'a>(callable: impl IntoStep,
                          input: impl Into<MapInput<'a>>,
                          config: &MapConfig)
                          -> Result<Vec<Namespace>, MapError> {
    let step = label(callable);
    let columns = input.into().into_columns(&step)?;
    map_rows(&step, &lproduct(&columns), config)
}

/// Como [`lmap`] pero cada resultado es el registro completo de la llamada
/// (inputs resueltos + outputs).
pub fn recorded_map<'a>(callable: impl IntoStep,
                        input: impl Into<MapInput<'a>>,
                        config: &MapConfig)
                        -> Result<Vec<Namespace>, MapError> {
    lmap(keeping_inputs(callable)?, input, config)
}

/// Tabla con una fila por llamada, indexada por los inputs del callable.
pub fn table_map<'a>(callable: impl IntoStep,
                     input: impl Into<MapInput<'a>>,
                     config: &MapConfig)
                     -> Result<Table, MapError> {
    let step = label(callable);
    let records = recorded_map(&step, input, config)?;
    indexed_table(&step, records)
}

/// Estudio paramétrico completo: tabla sobre el producto cartesiano.
pub fn table_cartesian_product<'a>(callable: impl IntoStep,
                                   input: impl Into<MapInput<'a>>,
                                   config: &MapConfig)
                                   -> Result<Table, MapError> {
    let step = label(callable);
    let records = lcartesian_map(keeping_inputs(&step)?, input, config)?;
    indexed_table(&step, records)
}

pub fn full_parametric_study<'a>(callable: impl IntoStep,
                                 input: impl Into<MapInput<'a>>,
                                 config: &MapConfig)
                                 -> Result<Table, MapError> {
    table_cartesian_product(callable, input, config)
}

// Los inputs ocultos o fijados ya no figuran en `input_names`.
fn indexed_table(step: &Step, records: Vec<Namespace>) -> Result<Table, MapError> {
    let table = Table::from_records(records);
    if step.input_names().is_empty() || table.is_empty() {
        return Ok(table);
    }
    table.set_index(step.input_names())
}
