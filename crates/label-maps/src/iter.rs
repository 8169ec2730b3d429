//! Iteradores keyword: `zip` y producto cartesiano sobre columnas con nombre.

use indexmap::IndexMap;
use label_core::{LabelError, Namespace, Value};

use crate::errors::MapError;

/// Columnas con nombre: nombre de variable -> valores a recorrer.
pub type Columns = IndexMap<String, Vec<Value>>;

/// `zip` por nombre: la fila `i` toma el valor `i` de cada columna.
/// Todas las columnas deben tener la misma longitud.
pub fn lzip(columns: &Columns) -> Result<Vec<Namespace>, MapError> {
    let Some((_, head)) = columns.first() else {
        return Ok(vec![]);
    };
    let len = head.len();
    if let Some((name, col)) = columns.iter().find(|(_, c)| c.len() != len) {
        return Err(MapError::LengthMismatch { column: name.clone(),
                                              expected: len,
                                              found: col.len() });
    }

    Ok((0..len).map(|i| columns.iter().map(|(k, c)| (k.clone(), c[i].clone())).collect())
               .collect())
}

/// Producto cartesiano por nombre; la última columna varía más rápido.
pub fn lproduct(columns: &Columns) -> Vec<Namespace> {
    let mut rows = vec![Namespace::new()];
    for (name, values) in columns {
        let mut next = Vec::with_capacity(rows.len() * values.len());
        for row in &rows {
            for v in values {
                let mut r = row.clone();
                r.insert(name.clone(), v.clone());
                next.push(r);
            }
        }
        rows = next;
    }
    rows
}

/// Arma columnas a partir de vectores posicionales (asignados a
/// `input_names` en orden) y columnas keyword.
pub fn columns_from_positional(callable: &str,
                               input_names: &[String],
                               positional: Vec<Vec<Value>>,
                               keyword: Columns)
                               -> Result<Columns, MapError> {
    if positional.len() > input_names.len() {
        return Err(LabelError::TooManyPositional { callable: callable.to_string(),
                                                   expected: input_names.len(),
                                                   found: positional.len() }.into());
    }
    let repeated: Vec<String> = input_names[..positional.len()].iter()
                                                                .filter(|n| keyword.contains_key(*n))
                                                                .cloned()
                                                                .collect();
    if !repeated.is_empty() {
        return Err(LabelError::MultipleValues { callable: callable.to_string(),
                                                names: repeated }.into());
    }

    let mut columns: Columns = input_names.iter().cloned().zip(positional).collect();
    columns.extend(keyword);
    Ok(columns)
}
