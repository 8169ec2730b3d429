//! Funciones etiquetadas utilitarias para armar pipelines.

use log::info;

use crate::errors::LabelError;
use crate::labelled::LabelledFunction;
use crate::namespace::restrict;
use crate::value::{Namespace, Output};

/// Sin inputs; produce las constantes dadas con sus nombres.
pub fn let_values(values: Namespace) -> Result<LabelledFunction, LabelError> {
    let name = format!("let {}",
                       values.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(", "));
    let constants: Vec<_> = values.values().cloned().collect();
    LabelledFunction::builder(name).outputs(values.keys().cloned())
                                   .build(move |_| Ok(Output::Tuple(constants.clone())))
}

/// Renombra una variable del namespace.
pub fn relabel(old: &str, new: &str) -> Result<LabelledFunction, LabelError> {
    let (from, to) = (old.to_string(), new.to_string());
    let builder = LabelledFunction::builder(format!("relabel {old} as {new}")).input(old).output(new);
    builder.build(move |args| Ok(Output::named([(to.clone(), args.value(&from)?.clone())])))
}

/// Registra los valores indicados con `info!` y los devuelve sin cambios.
pub fn show<S: AsRef<str>>(names: &[S]) -> Result<LabelledFunction, LabelError> {
    let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    let builder = LabelledFunction::builder(format!("showing {}", names.join(" "))).inputs(names.iter().cloned())
                                                                                    .outputs(names.iter().cloned());
    builder.build(move |args| {
               let values = restrict(args.values(), &names);
               info!("{}: {:?}", args.callable(), values);
               Ok(Output::Named(values))
           })
}
