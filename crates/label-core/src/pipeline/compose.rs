//! Construcción y concatenación de pipelines.

use std::ops::BitOr;

use log::warn;

use super::{Pipeline, PipelineOptions};
use crate::errors::LabelError;
use crate::labelled::{IntoStep, LabelledFunction, Step};
use crate::value::Namespace;

/// Pipeline que ejecuta `steps` en el orden dado.
pub fn pipeline<I, S>(steps: I, options: PipelineOptions) -> Result<Pipeline, LabelError>
    where I: IntoIterator<Item = S>,
          S: IntoStep
{
    Pipeline::with_options(steps, options)
}

/// Composición matemática: `compose([f, g])` aplica primero `g` y luego `f`.
pub fn compose<I, S>(steps: I, options: PipelineOptions) -> Result<Pipeline, LabelError>
    where I: IntoIterator<Item = S>,
          S: IntoStep
{
    let mut steps: Vec<Step> = steps.into_iter().map(IntoStep::into_step).collect();
    steps.reverse();
    Pipeline::with_options(steps, options)
}

impl Pipeline {
    /// Nuevo pipeline con `step` agregado al final. Los defaults de `step`
    /// ganan, salvo para nombres que el pipeline ya produce.
    pub fn then(&self, step: impl IntoStep) -> Result<Pipeline, LabelError> {
        let step = step.into_step();
        let defaults = joined_defaults(&self.default_values,
                                       &self.resolution.produced_names,
                                       step.default_values(),
                                       step.name());

        let mut steps = self.steps.clone();
        steps.push(step);
        Pipeline::assemble(None, steps, self.return_intermediate_outputs, defaults)
    }

    /// Nuevo pipeline con `step` agregado al principio. Los defaults del
    /// pipeline ganan sobre los de `step`; los que ahora produce `step` se
    /// descartan.
    pub fn before(&self, step: impl IntoStep) -> Result<Pipeline, LabelError> {
        let step = step.into_step();
        let produced = step.output_names().names().map(<[String]>::to_vec).unwrap_or_default();
        let defaults = joined_defaults(step.default_values(), &produced, &self.default_values, &self.name);

        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.push(step);
        steps.extend(self.steps.iter().cloned());
        Pipeline::assemble(None, steps, self.return_intermediate_outputs, defaults)
    }

    /// Concatena dos pipelines aplanando sus pasos. Los defaults de `other`
    /// ganan, salvo para nombres que `self` ya produce.
    pub fn concat(&self, other: &Pipeline) -> Result<Pipeline, LabelError> {
        let defaults = joined_defaults(&self.default_values,
                                       &self.resolution.produced_names,
                                       &other.default_values,
                                       &other.name);

        let mut steps = self.steps.clone();
        steps.extend(other.steps.iter().cloned());
        Pipeline::assemble(None, steps, self.return_intermediate_outputs, defaults)
    }
}

// Defaults del resultado de unir `left | right`: los de la derecha pisan a
// los de la izquierda excepto sobre nombres que la izquierda produce.
fn joined_defaults(left: &Namespace, left_produced: &[String], right: &Namespace, right_name: &str) -> Namespace {
    let mut merged = left.clone();
    for (k, v) in right {
        if left_produced.contains(k) {
            warn!("{right_name}: default de {k} descartado, el lado izquierdo ya lo produce");
            continue;
        }
        merged.insert(k.clone(), v.clone());
    }
    merged
}

impl BitOr for LabelledFunction {
    type Output = Result<Pipeline, LabelError>;

    fn bitor(self, rhs: LabelledFunction) -> Self::Output {
        Pipeline::new([self])?.then(rhs)
    }
}

impl BitOr<Pipeline> for LabelledFunction {
    type Output = Result<Pipeline, LabelError>;

    fn bitor(self, rhs: Pipeline) -> Self::Output {
        rhs.before(self)
    }
}

impl BitOr<LabelledFunction> for Pipeline {
    type Output = Result<Pipeline, LabelError>;

    fn bitor(self, rhs: LabelledFunction) -> Self::Output {
        self.then(rhs)
    }
}

impl BitOr for Pipeline {
    type Output = Result<Pipeline, LabelError>;

    fn bitor(self, rhs: Pipeline) -> Self::Output {
        self.concat(&rhs)
    }
}

// Encadenado: `(f | g)? | h` o directamente `f | g | h`.
impl BitOr<LabelledFunction> for Result<Pipeline, LabelError> {
    type Output = Result<Pipeline, LabelError>;

    fn bitor(self, rhs: LabelledFunction) -> Self::Output {
        self?.then(rhs)
    }
}

impl BitOr<Pipeline> for Result<Pipeline, LabelError> {
    type Output = Result<Pipeline, LabelError>;

    fn bitor(self, rhs: Pipeline) -> Self::Output {
        self?.concat(&rhs)
    }
}
