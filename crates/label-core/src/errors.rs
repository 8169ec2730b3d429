//! Errores del núcleo de funciones etiquetadas.
//!
//! Todos los errores se reportan de forma síncrona en el punto de uso
//! incorrecto y llevan el nombre del callable (o pipeline) implicado junto con
//! los nombres ofensivos, para que el mensaje sea diagnóstico por sí solo.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LabelError {
    /// Input requerido sin valor ni default.
    #[error("{callable} is missing argument(s): {}", .names.join(", "))]
    MissingArgument { callable: String, names: Vec<String> },
    /// Nombres suministrados que no son inputs (se listan todos).
    #[error("{callable} got unexpected argument(s): {}", .names.join(", "))]
    UnexpectedArgument { callable: String, names: Vec<String> },
    #[error("{callable} got multiple values for argument(s): {}", .names.join(", "))]
    MultipleValues { callable: String, names: Vec<String> },
    #[error("{callable} takes at most {expected} positional argument(s) but {found} were given")]
    TooManyPositional { callable: String, expected: usize, found: usize },
    /// El resultado no coincide con los output names congelados.
    #[error("inconsistent output in {callable}: expected ({}), got {found}", .expected.join(", "))]
    OutputShapeInconsistency { callable: String, expected: Vec<String>, found: String },
    #[error("output names of {callable} are unknown and cannot be wired into a pipeline")]
    UnresolvedOutputNames { callable: String },
    #[error("{callable}: trying to hide input(s) with no default value: {}", .names.join(", "))]
    UnhidableInput { callable: String, names: Vec<String> },
    #[error("{callable}: no default value to reset for: {}", .names.join(", "))]
    NoDefaultToReset { callable: String, names: Vec<String> },
    #[error("{callable}: duplicate input name {name}")]
    DuplicateInput { callable: String, name: String },
    #[error("{callable}: duplicate output name {name}")]
    DuplicateOutput { callable: String, name: String },
    #[error("{callable}: default value(s) given for unknown input(s): {}", .names.join(", "))]
    DefaultForUnknownInput { callable: String, names: Vec<String> },
    #[error("{callable}: argument {name} has an unexpected type: {message}")]
    ArgumentType { callable: String, name: String, message: String },
    /// Fallo reportado por la función envuelta.
    #[error("{callable} failed: {message}")]
    Function { callable: String, message: String },
}

impl LabelError {
    /// Nombre del callable o pipeline que originó el error.
    pub fn callable(&self) -> &str {
        match self {
            LabelError::MissingArgument { callable, .. }
            | LabelError::UnexpectedArgument { callable, .. }
            | LabelError::MultipleValues { callable, .. }
            | LabelError::TooManyPositional { callable, .. }
            | LabelError::OutputShapeInconsistency { callable, .. }
            | LabelError::UnresolvedOutputNames { callable }
            | LabelError::UnhidableInput { callable, .. }
            | LabelError::NoDefaultToReset { callable, .. }
            | LabelError::DuplicateInput { callable, .. }
            | LabelError::DuplicateOutput { callable, .. }
            | LabelError::DefaultForUnknownInput { callable, .. }
            | LabelError::ArgumentType { callable, .. }
            | LabelError::Function { callable, .. } => callable,
        }
    }
}
