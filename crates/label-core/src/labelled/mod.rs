//! Callables etiquetados.
//!
//! Un callable etiquetado es una función con nombres estables para sus inputs
//! y outputs. Este módulo define:
//! - `Labelled`: interfaz neutra usada por el pipeline (implementada por
//!   `LabelledFunction` y por `Pipeline`).
//! - `LabelledFunction`: implementación respaldada por una función de usuario.
//! - `OutputNames`: estado explícito de los output names (sin resolver o
//!   resueltos), con transición única en la primera llamada.
//! - `IntoStep` / `label`: envoltura idempotente.

mod function;
mod shape;

use std::fmt;
use std::sync::Arc;

use crate::errors::LabelError;
use crate::namespace::{merge_namespaces, restrict};
use crate::value::Namespace;

pub use function::{FunctionBody, LabelledFunction, LabelledFunctionBuilder};

/// Estado de los output names de un callable.
///
/// La única transición válida es `Unresolved` -> `Resolved`, en la primera
/// invocación de un callable sin outputs declarados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNames {
    Unresolved,
    Resolved(Vec<String>),
}

impl OutputNames {
    pub fn names(&self) -> Option<&[String]> {
        match self {
            OutputNames::Resolved(names) => Some(names),
            OutputNames::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, OutputNames::Resolved(_))
    }
}

/// Interfaz que el pipeline usa para cablear y ejecutar sus pasos.
pub trait Labelled: fmt::Debug + fmt::Display + Send + Sync {
    /// Nombre para diagnósticos y para nombrar outputs por defecto.
    fn name(&self) -> &str;

    /// Inputs en orden posicional.
    fn input_names(&self) -> &[String];

    fn output_names(&self) -> OutputNames;

    fn default_values(&self) -> &Namespace;

    /// Invoca con argumentos keyword y devuelve los outputs etiquetados.
    fn call_kwargs(&self, kwargs: Namespace) -> Result<Namespace, LabelError>;

    /// Inputs del llamador + defaults usados + outputs, en un único registro
    /// (los outputs ganan ante colisión).
    fn recorded_call(&self, kwargs: Namespace) -> Result<Namespace, LabelError> {
        let inputs = restrict(&merge_namespaces(self.default_values(), &kwargs), self.input_names());
        let outputs = self.call_kwargs(kwargs)?;
        Ok(merge_namespaces(&inputs, &outputs))
    }

    /// Variante con `values` fijados (aplicación parcial).
    fn fix_step(&self, values: Namespace) -> Result<Step, LabelError>;

    /// Variante sin los defaults indicados.
    fn reset_default_step(&self, names: &[String]) -> Result<Step, LabelError>;
}

/// Paso de pipeline compartido.
pub type Step = Arc<dyn Labelled>;

/// Conversión a `Step`. Un `Step` ya etiquetado se devuelve tal cual.
pub trait IntoStep {
    fn into_step(self) -> Step;
}

impl IntoStep for Step {
    fn into_step(self) -> Step {
        self
    }
}

impl IntoStep for &Step {
    fn into_step(self) -> Step {
        Arc::clone(self)
    }
}

impl IntoStep for LabelledFunction {
    fn into_step(self) -> Step {
        Arc::new(self)
    }
}

impl IntoStep for &LabelledFunction {
    fn into_step(self) -> Step {
        Arc::new(self.clone())
    }
}

/// Etiqueta un callable. Idempotente: `label(label(f))` es el mismo `Step`.
pub fn label<S: IntoStep>(callable: S) -> Step {
    callable.into_step()
}

pub(crate) fn display_signature(f: &mut fmt::Formatter<'_>,
                                name: &str,
                                inputs: &[String],
                                outputs: &OutputNames)
                                -> fmt::Result {
    let outputs = match outputs {
        OutputNames::Resolved(names) => names.join(", "),
        OutputNames::Unresolved => "?".to_string(),
    };
    write!(f, "{}({}) -> ({})", name, inputs.join(", "), outputs)
}
