//! Resolución de nombres de un pipeline.
//!
//! Una única pasada hacia adelante sobre los pasos:
//! `inputs += I_i - disponibles`, `disponibles += O_i`. Los outputs del
//! pipeline son los nombres producidos menos los consumidos por algún paso
//! (salvo que se pidan los intermedios).

use indexmap::{IndexMap, IndexSet};

use crate::errors::LabelError;
use crate::labelled::{OutputNames, Step};
use crate::value::Namespace;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub input_names: Vec<String>,
    pub output_names: Vec<String>,
    /// Producidos por un paso y consumidos por uno posterior.
    pub intermediate_names: Vec<String>,
    pub produced_names: Vec<String>,
    /// Por paso y en el orden de sus inputs, el índice del paso que produjo
    /// ese valor (`None` si viene de fuera del pipeline).
    pub input_sources: Vec<Vec<Option<usize>>>,
    /// Variable -> índice del último paso que la produjo.
    pub last_producer: IndexMap<String, usize>,
    /// Output names (resueltos) de cada paso.
    pub step_outputs: Vec<Vec<String>>,
    /// Por paso, los inputs que le llegan directamente desde fuera del pipeline.
    pub external_inputs: Vec<Vec<String>>,
    /// Defaults aportados por los pasos (regla del primer consumidor).
    pub default_values: Namespace,
}

/// Analiza la lista de pasos. Falla si algún paso no tiene output names
/// resueltos.
pub fn resolve(pipeline_name: &str, steps: &[Step], return_intermediate_outputs: bool) -> Result<Resolution, LabelError> {
    let mut inputs: IndexSet<String> = IndexSet::new();
    let mut available: IndexSet<String> = IndexSet::new();
    let mut consumed: IndexSet<String> = IndexSet::new();
    let mut intermediates: IndexSet<String> = IndexSet::new();
    let mut res = Resolution::default();

    for (i, step) in steps.iter().enumerate() {
        let outputs = match step.output_names() {
            OutputNames::Resolved(names) => names,
            OutputNames::Unresolved => {
                return Err(LabelError::UnresolvedOutputNames { callable: format!("{} (step {} of {})",
                                                                                 step.name(),
                                                                                 i,
                                                                                 pipeline_name) })
            }
        };

        let mut external = vec![];
        let mut sources = vec![];
        for name in step.input_names() {
            consumed.insert(name.clone());
            sources.push(res.last_producer.get(name).copied());
            if available.contains(name) {
                intermediates.insert(name.clone());
                continue;
            }
            external.push(name.clone());
            if inputs.insert(name.clone()) {
                if let Some(default) = step.default_values().get(name) {
                    res.default_values.insert(name.clone(), default.clone());
                }
            }
        }
        for name in &outputs {
            available.insert(name.clone());
            res.last_producer.insert(name.clone(), i);
        }
        res.external_inputs.push(external);
        res.input_sources.push(sources);
        res.step_outputs.push(outputs);
    }

    res.output_names = available.iter()
                                .filter(|n| return_intermediate_outputs || !consumed.contains(*n))
                                .cloned()
                                .collect();
    res.intermediate_names = intermediates.into_iter().filter(|n| !inputs.contains(n)).collect();
    res.produced_names = available.into_iter().collect();
    res.input_names = inputs.into_iter().collect();
    Ok(res)
}
