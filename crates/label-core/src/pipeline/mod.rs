//! Pipeline: composición secuencial de callables etiquetados.
//!
//! La resolución de inputs/outputs se hace una única vez al construir (ver
//! `resolver`). En cada llamada se siembra un namespace con los defaults
//! bajo los argumentos del llamador, se aplica cada paso en orden y se
//! filtra el resultado a los outputs resueltos.

mod compose;
pub mod graph;
pub mod resolver;

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde_json::json;

use crate::errors::LabelError;
use crate::hashing::hash_value;
use crate::labelled::{IntoStep, Labelled, OutputNames, Step};
use crate::namespace::{apply_in_namespace, merge_namespaces, restrict};
use crate::value::Namespace;

pub use compose::{compose, pipeline};
pub use graph::{Edge, GraphInput, PipelineGraph};
pub use resolver::Resolution;

/// Opciones de construcción de un pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Si es `None` se usa `pipeline_of_{n}_functions`.
    pub name: Option<String>,
    pub return_intermediate_outputs: bool,
    /// Defaults explícitos; ganan sobre los aportados por los pasos.
    pub default_values: Namespace,
}

impl PipelineOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()),
               ..Self::default() }
    }

    pub fn return_intermediate_outputs(mut self, keep: bool) -> Self {
        self.return_intermediate_outputs = keep;
        self
    }

    pub fn default_values(mut self, values: Namespace) -> Self {
        self.default_values = values;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Pipeline {
    name: String,
    steps: Vec<Step>,
    return_intermediate_outputs: bool,
    explicit_defaults: Namespace,
    resolution: Resolution,
    default_values: Namespace,
}

impl Pipeline {
    pub fn new<I, S>(steps: I) -> Result<Self, LabelError>
        where I: IntoIterator<Item = S>,
              S: IntoStep
    {
        Self::with_options(steps, PipelineOptions::default())
    }

    pub fn with_options<I, S>(steps: I, options: PipelineOptions) -> Result<Self, LabelError>
        where I: IntoIterator<Item = S>,
              S: IntoStep
    {
        let steps: Vec<Step> = steps.into_iter().map(IntoStep::into_step).collect();
        Self::assemble(options.name, steps, options.return_intermediate_outputs, options.default_values)
    }

    pub(crate) fn assemble(name: Option<String>,
                           steps: Vec<Step>,
                           return_intermediate_outputs: bool,
                           explicit_defaults: Namespace)
                           -> Result<Self, LabelError> {
        let name = name.unwrap_or_else(|| default_pipeline_name(steps.len()));
        let resolution = resolver::resolve(&name, &steps, return_intermediate_outputs)?;

        let unknown: Vec<String> = explicit_defaults.keys()
                                                    .filter(|k| !resolution.input_names.contains(k))
                                                    .cloned()
                                                    .collect();
        if !unknown.is_empty() {
            return Err(LabelError::DefaultForUnknownInput { callable: name, names: unknown });
        }
        let default_values = merge_namespaces(&resolution.default_values, &explicit_defaults);

        debug!("pipeline {}: {} pasos, inputs {:?}, outputs {:?}",
               name,
               steps.len(),
               resolution.input_names,
               resolution.output_names);
        Ok(Self { name,
                  steps,
                  return_intermediate_outputs,
                  explicit_defaults,
                  resolution,
                  default_values })
    }

    /// Reconstruye con los mismos ajustes y otros pasos/defaults.
    fn reassemble(&self, steps: Vec<Step>, explicit_defaults: Namespace) -> Result<Self, LabelError> {
        Self::assemble(Some(self.name.clone()), steps, self.return_intermediate_outputs, explicit_defaults)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn input_names(&self) -> &[String] {
        &self.resolution.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.resolution.output_names
    }

    pub fn intermediate_names(&self) -> &[String] {
        &self.resolution.intermediate_names
    }

    pub fn default_values(&self) -> &Namespace {
        &self.default_values
    }

    /// Defaults pasados explícitamente al construir (sin los de los pasos).
    pub fn explicit_defaults(&self) -> &Namespace {
        &self.explicit_defaults
    }

    pub fn returns_intermediate_outputs(&self) -> bool {
        self.return_intermediate_outputs
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Ejecuta el pipeline con argumentos keyword.
    pub fn call(&self, kwargs: Namespace) -> Result<Namespace, LabelError> {
        let unexpected: Vec<String> = kwargs.keys().filter(|k| !self.input_names().contains(k)).cloned().collect();
        if !unexpected.is_empty() {
            return Err(LabelError::UnexpectedArgument { callable: self.name.clone(),
                                                        names: unexpected });
        }

        let mut namespace = merge_namespaces(&self.default_values, &kwargs);
        let missing: Vec<String> = self.input_names().iter().filter(|n| !namespace.contains_key(*n)).cloned().collect();
        if !missing.is_empty() {
            return Err(LabelError::MissingArgument { callable: self.name.clone(),
                                                     names: missing });
        }

        for (i, step) in self.steps.iter().enumerate() {
            debug!("pipeline {}: paso {} ({})", self.name, i, step.name());
            apply_in_namespace(step.as_ref(), &mut namespace)?;
        }
        Ok(restrict(&namespace, self.output_names()))
    }

    pub fn rename(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..self.clone() }
    }

    pub fn set_default(&self, values: Namespace) -> Result<Self, LabelError> {
        let explicit = merge_namespaces(&self.explicit_defaults, &values);
        self.reassemble(self.steps.clone(), explicit)
    }

    /// Quita defaults, tanto explícitos como los aportados por los pasos que
    /// consumen el nombre desde fuera.
    pub fn reset_default<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, LabelError> {
        let missing: Vec<String> = names.iter()
                                        .map(AsRef::as_ref)
                                        .filter(|n| !self.default_values.contains_key(*n))
                                        .map(String::from)
                                        .collect();
        if !missing.is_empty() {
            return Err(LabelError::NoDefaultToReset { callable: self.name.clone(),
                                                      names: missing });
        }

        let mut explicit = self.explicit_defaults.clone();
        let mut steps = Vec::with_capacity(self.steps.len());
        for (step, external) in self.steps.iter().zip(&self.resolution.external_inputs) {
            let to_reset: Vec<String> = names.iter()
                                             .map(|n| n.as_ref().to_string())
                                             .filter(|n| external.contains(n) && step.default_values().contains_key(n))
                                             .collect();
            if to_reset.is_empty() {
                steps.push(Arc::clone(step));
            } else {
                steps.push(step.reset_default_step(&to_reset)?);
            }
        }
        for name in names {
            explicit.shift_remove(name.as_ref());
        }
        self.reassemble(steps, explicit)
    }

    /// Fija inputs del pipeline: cada paso que consume el nombre desde fuera
    /// recibe el valor por aplicación parcial y el nombre deja de ser input.
    pub fn fix(&self, values: Namespace) -> Result<Self, LabelError> {
        let unexpected: Vec<String> = values.keys().filter(|k| !self.input_names().contains(k)).cloned().collect();
        if !unexpected.is_empty() {
            return Err(LabelError::UnexpectedArgument { callable: self.name.clone(),
                                                        names: unexpected });
        }

        let mut steps = Vec::with_capacity(self.steps.len());
        for (step, external) in self.steps.iter().zip(&self.resolution.external_inputs) {
            let fixed = restrict(&values, external);
            if fixed.is_empty() {
                steps.push(Arc::clone(step));
            } else {
                steps.push(step.fix_step(fixed)?);
            }
        }
        let mut explicit = self.explicit_defaults.clone();
        explicit.retain(|k, _| !values.contains_key(k));
        self.reassemble(steps, explicit)
    }

    pub fn hide<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, LabelError> {
        let unhidable: Vec<String> = names.iter()
                                          .map(AsRef::as_ref)
                                          .filter(|n| !self.default_values.contains_key(*n))
                                          .map(String::from)
                                          .collect();
        if !unhidable.is_empty() {
            return Err(LabelError::UnhidableInput { callable: self.name.clone(),
                                                    names: unhidable });
        }
        self.fix(restrict(&self.default_values, names))
    }

    pub fn hide_all_but<S: AsRef<str>>(&self, visible: &[S]) -> Result<Self, LabelError> {
        let hidden: Vec<&str> = self.input_names()
                                    .iter()
                                    .map(String::as_str)
                                    .filter(|n| !visible.iter().any(|v| v.as_ref() == *n))
                                    .collect();
        self.hide(&hidden)
    }

    /// Hash estable de la definición: nombres de pasos, inputs, outputs y
    /// si se devuelven los intermedios.
    pub fn definition_hash(&self) -> String {
        let steps: Vec<_> = self.steps
                                .iter()
                                .zip(&self.resolution.step_outputs)
                                .map(|(s, outputs)| json!({ "name": s.name(), "inputs": s.input_names(), "outputs": outputs }))
                                .collect();
        hash_value(&json!({
            "name": self.name,
            "steps": steps,
            "return_intermediate_outputs": self.return_intermediate_outputs,
        }))
    }
}

fn default_pipeline_name(n: usize) -> String {
    format!("pipeline_of_{n}_functions")
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for step in &self.steps {
            write!(f, "\n\t{}", step)?;
        }
        Ok(())
    }
}

impl Labelled for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_names(&self) -> &[String] {
        &self.resolution.input_names
    }

    fn output_names(&self) -> OutputNames {
        OutputNames::Resolved(self.resolution.output_names.clone())
    }

    fn default_values(&self) -> &Namespace {
        &self.default_values
    }

    fn call_kwargs(&self, kwargs: Namespace) -> Result<Namespace, LabelError> {
        self.call(kwargs)
    }

    fn fix_step(&self, values: Namespace) -> Result<Step, LabelError> {
        Ok(Arc::new(self.fix(values)?))
    }

    fn reset_default_step(&self, names: &[String]) -> Result<Step, LabelError> {
        Ok(Arc::new(self.reset_default(names)?))
    }
}

impl IntoStep for Pipeline {
    fn into_step(self) -> Step {
        Arc::new(self)
    }
}

impl IntoStep for &Pipeline {
    fn into_step(self) -> Step {
        Arc::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labelled::LabelledFunction;
    use crate::namespace;
    use crate::value::Output;

    fn add() -> LabelledFunction {
        LabelledFunction::builder("add").inputs(["x", "y"])
                                        .output("s")
                                        .build(|a| Ok(Output::single(a.f64("x")? + a.f64("y")?)))
                                        .unwrap()
    }

    #[test]
    fn default_name_counts_steps() {
        let p = Pipeline::new([add()]).unwrap();
        assert_eq!(p.name(), "pipeline_of_1_functions");
        assert_eq!(p.to_string(), "pipeline_of_1_functions:\n\tadd(x, y) -> (s)");
    }

    #[test]
    fn missing_inputs_are_all_listed_before_running() {
        let p = Pipeline::new([add()]).unwrap();
        let err = p.call(Namespace::new()).unwrap_err();
        assert_eq!(err, LabelError::MissingArgument { callable: p.name().to_string(),
                                                      names: vec!["x".into(), "y".into()] });
    }

    #[test]
    fn explicit_default_must_name_an_input() {
        let opts = PipelineOptions::named("p").default_values(namespace! { "z" => 1 });
        let err = Pipeline::with_options([add()], opts).unwrap_err();
        assert!(matches!(err, LabelError::DefaultForUnknownInput { ref names, .. } if names == &["z"]));
    }

    #[test]
    fn recorded_call_includes_inputs() {
        let p = Pipeline::with_options([add()], PipelineOptions::default().default_values(namespace! { "y" => 1.0 }))
            .unwrap();
        let rec = p.recorded_call(namespace! { "x" => 2.0 }).unwrap();
        assert_eq!(rec, namespace! { "x" => 2.0, "y" => 1.0, "s" => 3.0 });
    }

    #[test]
    fn hash_depends_on_structure() {
        let p = Pipeline::new([add()]).unwrap();
        let q = Pipeline::new([add()]).unwrap();
        assert_eq!(p.definition_hash(), q.definition_hash());
        assert_ne!(p.definition_hash(), p.rename("other").definition_hash());
    }
}
