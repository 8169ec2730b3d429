use crate::errors::LabelError;
use crate::value::{Namespace, Output};

/// Infiere output names a partir de la forma del primer resultado.
pub(crate) fn guess_output_names(name: &str, result: &Output) -> Vec<String> {
    match result {
        Output::None => vec![],
        Output::Named(map) => map.keys().cloned().collect(),
        Output::Tuple(items) if items.len() > 1 => (0..items.len()).map(|i| format!("{name}[{i}]")).collect(),
        Output::Single(_) | Output::Tuple(_) => vec![name.to_string()],
    }
}

/// Convierte un resultado a mapeo etiquetado, verificando que sea compatible
/// con `names` (misma aridad, o mismo conjunto de claves para `Named`).
/// El mapeo devuelto sigue el orden de `names`.
pub(crate) fn output_as_namespace(callable: &str, names: &[String], result: Output) -> Result<Namespace, LabelError> {
    let mismatch = |found: String| LabelError::OutputShapeInconsistency { callable: callable.to_string(),
                                                                         expected: names.to_vec(),
                                                                         found };
    let mut produced: Namespace = match result {
        Output::None => Namespace::new(),
        Output::Named(map) => map,
        Output::Single(value) => match names {
            [only] => Namespace::from([(only.clone(), value)]),
            _ => return Err(mismatch("a single value".to_string())),
        },
        Output::Tuple(items) => {
            if items.len() != names.len() {
                return Err(mismatch(format!("{} values", items.len())));
            }
            names.iter().cloned().zip(items).collect()
        }
    };

    if produced.len() != names.len() || names.iter().any(|n| !produced.contains_key(n)) {
        let keys: Vec<&str> = produced.keys().map(String::as_str).collect();
        return Err(mismatch(format!("({})", keys.join(", "))));
    }
    Ok(names.iter().filter_map(|n| produced.shift_remove_entry(n)).collect())
}
