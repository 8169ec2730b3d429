//! Envolturas de orden superior sobre callables etiquetados.

use std::time::Instant;

use indexmap::IndexSet;

use crate::errors::LabelError;
use crate::labelled::{IntoStep, LabelledFunction, OutputNames};
use crate::namespace::merge_namespaces;
use crate::value::{Output, Value};

/// Variante de `callable` cuyo resultado es el registro completo de la
/// llamada: inputs resueltos + outputs (los outputs ganan ante colisión).
/// Es la forma que usa la capa de mapeo para construir tablas.
pub fn keeping_inputs(callable: impl IntoStep) -> Result<LabelledFunction, LabelError> {
    let inner = callable.into_step();
    let output_names = match inner.output_names() {
        OutputNames::Resolved(outputs) => {
            let names: IndexSet<String> = inner.input_names().iter().cloned().chain(outputs).collect();
            OutputNames::Resolved(names.into_iter().collect())
        }
        OutputNames::Unresolved => OutputNames::Unresolved,
    };

    let mut builder = LabelledFunction::builder(inner.name()).inputs(inner.input_names().iter().cloned())
                                                             .output_names(output_names);
    for (k, v) in inner.default_values() {
        builder = builder.default_value(k.clone(), v.clone());
    }
    builder.build(move |args| {
               let outputs = inner.call_kwargs(args.values().clone())?;
               Ok(Output::Named(merge_namespaces(args.values(), &outputs)))
           })
}

/// Agrega el output `"{name}_execution_time"` con la duración de la llamada
/// en segundos.
pub fn timed(callable: impl IntoStep) -> Result<LabelledFunction, LabelError> {
    let inner = callable.into_step();
    let time_name = format!("{}_execution_time", inner.name());
    let output_names = match inner.output_names() {
        OutputNames::Resolved(mut outputs) => {
            outputs.push(time_name.clone());
            OutputNames::Resolved(outputs)
        }
        OutputNames::Unresolved => OutputNames::Unresolved,
    };

    let inputs = inner.input_names().to_vec();
    let mut builder = LabelledFunction::builder(format!("time({})", inner.name())).inputs(inputs)
                                                                                   .output_names(output_names);
    for (k, v) in inner.default_values() {
        builder = builder.default_value(k.clone(), v.clone());
    }
    builder.build(move |args| {
               let start = Instant::now();
               let mut outputs = inner.call_kwargs(args.values().clone())?;
               outputs.insert(time_name.clone(), Value::from(start.elapsed().as_secs_f64()));
               Ok(Output::Named(outputs))
           })
}
