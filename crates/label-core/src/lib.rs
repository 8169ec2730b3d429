//! label-core: funciones etiquetadas y composición en pipelines.
pub mod decorators;
pub mod errors;
pub mod hashing;
pub mod labelled;
pub mod namespace;
pub mod pipeline;
pub mod special;
pub mod value;

// usado por la macro `namespace!`
pub use serde_json;

pub use decorators::{keeping_inputs, timed};
pub use errors::LabelError;
pub use labelled::{label, FunctionBody, IntoStep, Labelled, LabelledFunction, LabelledFunctionBuilder, OutputNames, Step};
pub use namespace::{applied_in_namespace, apply_in_namespace, merge_namespaces, restrict};
pub use pipeline::{compose, pipeline, Edge, GraphInput, Pipeline, PipelineGraph, PipelineOptions, Resolution};
pub use special::{let_values, relabel, show};
pub use value::{Args, Namespace, Output, Value};
