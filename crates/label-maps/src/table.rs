//! Resultado tabular de un mapeo: una fila por llamada, columnas en orden de
//! aparición y un conjunto de columnas índice (los inputs variados).

use indexmap::IndexSet;
use label_core::{Namespace, Value};
use serde::Serialize;

use crate::errors::MapError;
use crate::iter::Columns;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Namespace>,
}

impl Table {
    /// Las columnas son la unión ordenada de las claves de los registros.
    pub fn from_records(rows: Vec<Namespace>) -> Self {
        let columns: IndexSet<&String> = rows.iter().flat_map(|r| r.keys()).collect();
        let columns = columns.into_iter().cloned().collect();
        Self { columns,
               index: vec![],
               rows }
    }

    /// Marca columnas como índice; deben existir.
    pub fn set_index<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, MapError> {
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        if let Some(unknown) = names.iter().find(|n| !self.columns.iter().any(|c| c == *n)) {
            return Err(MapError::UnknownColumn(unknown.to_string()));
        }
        self.index = names.into_iter().map(String::from).collect();
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn rows(&self) -> &[Namespace] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Valores de una columna; `Null` donde una fila no la tiene.
    pub fn column(&self, name: &str) -> Result<Vec<Value>, MapError> {
        if !self.columns.iter().any(|c| c == name) {
            return Err(MapError::UnknownColumn(name.to_string()));
        }
        Ok(self.rows.iter().map(|r| r.get(name).cloned().unwrap_or(Value::Null)).collect())
    }

    /// Primera fila cuyo índice coincide con `key`.
    pub fn find(&self, key: &Namespace) -> Option<&Namespace> {
        self.rows.iter().find(|r| self.index.iter().all(|i| key.get(i) == r.get(i)))
    }

    /// Columnas de la tabla restringidas a `names` (las ausentes se omiten),
    /// listas para volver a mapear.
    pub fn to_columns<S: AsRef<str>>(&self, names: &[S]) -> Columns {
        names.iter()
             .map(AsRef::as_ref)
             .filter(|n| self.columns.iter().any(|c| c == n))
             .map(|n| (n.to_string(), self.rows.iter().map(|r| r.get(n).cloned().unwrap_or(Value::Null)).collect()))
             .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_core::namespace;
    use serde_json::json;

    #[test]
    fn columns_are_union_of_keys() {
        let t = Table::from_records(vec![namespace! { "x" => 1, "y" => 2 }, namespace! { "x" => 2, "z" => 0 }]);
        assert_eq!(t.columns(), ["x", "y", "z"]);
        assert_eq!(t.column("y").unwrap(), vec![json!(2), Value::Null]);
        assert!(matches!(t.column("w"), Err(MapError::UnknownColumn(_))));
    }

    #[test]
    fn index_lookup() {
        let t = Table::from_records(vec![namespace! { "x" => 1, "y" => 10 }, namespace! { "x" => 2, "y" => 20 }])
            .set_index(&["x"])
            .unwrap();
        assert_eq!(t.find(&namespace! { "x" => 2 }).unwrap()["y"], 20);
        assert!(t.clone().set_index(&["nope"]).is_err());
        assert_eq!(t.to_columns(&["x", "nope"]).len(), 1);
    }
}
