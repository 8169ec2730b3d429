//! Planes de experimentos (design of experiments).
//!
//! Un plan es una lista de experimentos; cada experimento es un `Namespace`
//! parcial. Los planes se combinan por zip, por producto o en cruz alrededor
//! de un pivote, y el resultado se fusiona experimento a experimento (las
//! claves de planes posteriores pisan a las anteriores).

use label_core::{merge_namespaces, Namespace};

use crate::errors::MapError;
use crate::iter::Columns;

pub type Plan = Vec<Namespace>;

/// Un experimento por valor: primero todos los de la primera columna, luego
/// los de la segunda, etc.
pub fn from_sequence(columns: &Columns) -> Plan {
    columns.iter()
           .flat_map(|(name, values)| values.iter().map(move |v| Namespace::from([(name.clone(), v.clone())])))
           .collect()
}

fn combine(plans: Vec<Plan>, sequences: &Columns) -> Vec<Plan> {
    let mut all = plans;
    for (name, values) in sequences {
        let single: Columns = Columns::from([(name.clone(), values.clone())]);
        all.push(from_sequence(&single));
    }
    all
}

fn merge_all<'a>(parts: impl IntoIterator<Item = &'a Namespace>) -> Namespace {
    parts.into_iter().fold(Namespace::new(), |acc, p| merge_namespaces(&acc, p))
}

/// El experimento `i` fusiona el `i`-ésimo de cada plan. Todos los planes
/// deben tener la misma longitud.
pub fn zip_plans(plans: Vec<Plan>, sequences: &Columns) -> Result<Plan, MapError> {
    let all = combine(plans, sequences);
    let Some(len) = all.first().map(Vec::len) else {
        return Ok(vec![]);
    };
    if let Some((i, plan)) = all.iter().enumerate().find(|(_, p)| p.len() != len) {
        return Err(MapError::LengthMismatch { column: format!("plan {i}"),
                                              expected: len,
                                              found: plan.len() });
    }
    Ok((0..len).map(|row| merge_all(all.iter().map(|p| &p[row]))).collect())
}

/// Todas las combinaciones de un experimento por plan; el último plan varía
/// más rápido.
pub fn product_of_plans(plans: Vec<Plan>, sequences: &Columns) -> Plan {
    let all = combine(plans, sequences);
    let mut rows: Vec<Vec<&Namespace>> = vec![vec![]];
    for plan in &all {
        rows = rows.into_iter()
                   .flat_map(|prefix| {
                       plan.iter().map(move |exp| {
                                      let mut r = prefix.clone();
                                      r.push(exp);
                                      r
                                  })
                   })
                   .collect();
    }
    rows.into_iter().map(merge_all).collect()
}

/// Plan en cruz: el pivote y luego, para cada experimento de cada plan, el
/// pivote modificado por ese experimento (solo si difiere del pivote).
pub fn cross_plans(plans: Vec<Plan>, pivot: &Namespace, sequences: &Columns) -> Plan {
    let mut out = vec![pivot.clone()];
    for plan in combine(plans, sequences) {
        for experiment in &plan {
            let current = merge_namespaces(pivot, experiment);
            if &current != pivot {
                out.push(current);
            }
        }
    }
    out
}
