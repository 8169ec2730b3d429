//! `LabelledFunction`: callable etiquetado respaldado por una función de usuario.
//!
//! Los nombres de los parámetros y sus defaults se declaran explícitamente al
//! envolver la función (no hay reflexión en runtime). Los output names pueden
//! declararse o quedar sin resolver hasta la primera llamada, en la que se
//! infieren de la forma del resultado y quedan congelados.
//!
//! Las variantes derivadas (`rename`, `set_default`, `reset_default`, `fix`,
//! `hide`, `hide_all_but`) devuelven un callable nuevo que comparte la función
//! subyacente; el receptor no se modifica.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use indexmap::IndexSet;
use log::debug;

use super::shape::{guess_output_names, output_as_namespace};
use super::{display_signature, Labelled, OutputNames, Step};
use crate::errors::LabelError;
use crate::namespace::merge_namespaces;
use crate::value::{Args, Namespace, Output, Value};

/// Firma de la función envuelta.
pub type FunctionBody = dyn Fn(&Args<'_>) -> Result<Output, LabelError> + Send + Sync;

#[derive(Clone)]
pub struct LabelledFunction {
    function: Arc<FunctionBody>,
    name: String,
    input_names: Vec<String>,
    default_values: Namespace,
    /// Valores fijados por aplicación parcial; ya no forman parte de los inputs.
    fixed_values: Namespace,
    /// Compartido entre clones de la misma identidad; una variante derivada
    /// recibe su propia copia.
    output_names: Arc<RwLock<OutputNames>>,
}

/// Builder de `LabelledFunction`.
///
/// ```
/// use label_core::{LabelledFunction, Output};
///
/// let g = LabelledFunction::builder("g")
///     .input("b")
///     .optional("c", 3)
///     .output("output")
///     .build(|args| Ok(Output::single(args.f64("c")? - args.f64("b")?)))
///     .unwrap();
/// assert_eq!(g.input_names(), ["b", "c"]);
/// ```
#[derive(Debug)]
pub struct LabelledFunctionBuilder {
    name: String,
    input_names: Vec<String>,
    default_values: Namespace,
    output_names: OutputNames,
}

impl LabelledFunctionBuilder {
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.input_names.push(name.into());
        self
    }

    pub fn inputs<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.input_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Input con valor por defecto.
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        let name = name.into();
        self.input_names.push(name.clone());
        self.default_values.insert(name, default.into());
        self
    }

    /// Default para un input ya declarado.
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_values.insert(name.into(), value.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        match &mut self.output_names {
            OutputNames::Resolved(names) => names.push(name.into()),
            OutputNames::Unresolved => self.output_names = OutputNames::Resolved(vec![name.into()]),
        }
        self
    }

    pub fn outputs<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let mut declared = match std::mem::replace(&mut self.output_names, OutputNames::Unresolved) {
            OutputNames::Resolved(names) => names,
            OutputNames::Unresolved => vec![],
        };
        declared.extend(names.into_iter().map(Into::into));
        self.output_names = OutputNames::Resolved(declared);
        self
    }

    pub fn output_names(mut self, names: OutputNames) -> Self {
        self.output_names = names;
        self
    }

    pub fn build<F>(self, function: F) -> Result<LabelledFunction, LabelError>
        where F: Fn(&Args<'_>) -> Result<Output, LabelError> + Send + Sync + 'static
    {
        LabelledFunction::from_parts(self.name,
                                     self.input_names,
                                     self.default_values,
                                     self.output_names,
                                     Arc::new(function))
    }
}

impl LabelledFunction {
    pub fn builder(name: impl Into<String>) -> LabelledFunctionBuilder {
        LabelledFunctionBuilder { name: name.into(),
                                  input_names: vec![],
                                  default_values: Namespace::new(),
                                  output_names: OutputNames::Unresolved }
    }

    /// Atajo: inputs sin defaults y outputs a inferir.
    pub fn new<F>(name: impl Into<String>, input_names: &[&str], function: F) -> Result<Self, LabelError>
        where F: Fn(&Args<'_>) -> Result<Output, LabelError> + Send + Sync + 'static
    {
        Self::builder(name).inputs(input_names.iter().copied()).build(function)
    }

    fn from_parts(name: String,
                  input_names: Vec<String>,
                  default_values: Namespace,
                  output_names: OutputNames,
                  function: Arc<FunctionBody>)
                  -> Result<Self, LabelError> {
        let mut seen = IndexSet::new();
        for input in &input_names {
            if !seen.insert(input.as_str()) {
                return Err(LabelError::DuplicateInput { callable: name, name: input.clone() });
            }
        }
        if let OutputNames::Resolved(outputs) = &output_names {
            let mut seen = IndexSet::new();
            for output in outputs {
                if !seen.insert(output.as_str()) {
                    return Err(LabelError::DuplicateOutput { callable: name, name: output.clone() });
                }
            }
        }
        let unknown: Vec<String> = default_values.keys().filter(|k| !input_names.contains(k)).cloned().collect();
        if !unknown.is_empty() {
            return Err(LabelError::DefaultForUnknownInput { callable: name, names: unknown });
        }

        Ok(Self { function,
                  name,
                  input_names,
                  default_values,
                  fixed_values: Namespace::new(),
                  output_names: Arc::new(RwLock::new(output_names)) })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn default_values(&self) -> &Namespace {
        &self.default_values
    }

    pub fn fixed_values(&self) -> &Namespace {
        &self.fixed_values
    }

    pub fn output_names(&self) -> OutputNames {
        self.read_output_names().clone()
    }

    /// `true` si ambos valores son la misma identidad etiquetada (clones
    /// incluidos), no variantes derivadas.
    pub fn is_same(&self, other: &LabelledFunction) -> bool {
        Arc::ptr_eq(&self.output_names, &other.output_names)
    }

    fn read_output_names(&self) -> RwLockReadGuard<'_, OutputNames> {
        self.output_names.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resuelve el valor de cada input: posicional > keyword > default.
    pub fn resolve_inputs(&self, args: &[Value], kwargs: &Namespace) -> Result<Namespace, LabelError> {
        if args.len() > self.input_names.len() {
            return Err(LabelError::TooManyPositional { callable: self.name.clone(),
                                                       expected: self.input_names.len(),
                                                       found: args.len() });
        }
        let positional = &self.input_names[..args.len()];

        let repeated: Vec<String> = positional.iter().filter(|n| kwargs.contains_key(*n)).cloned().collect();
        if !repeated.is_empty() {
            return Err(LabelError::MultipleValues { callable: self.name.clone(),
                                                    names: repeated });
        }

        let mut resolved = Namespace::with_capacity(self.input_names.len());
        let mut missing = vec![];
        for (i, name) in self.input_names.iter().enumerate() {
            let value = args.get(i).or_else(|| kwargs.get(name)).or_else(|| self.default_values.get(name));
            match value {
                Some(v) => {
                    resolved.insert(name.clone(), v.clone());
                }
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(LabelError::MissingArgument { callable: self.name.clone(),
                                                     names: missing });
        }

        let unexpected: Vec<String> = kwargs.keys().filter(|k| !self.input_names.contains(k)).cloned().collect();
        if !unexpected.is_empty() {
            return Err(LabelError::UnexpectedArgument { callable: self.name.clone(),
                                                        names: unexpected });
        }
        Ok(resolved)
    }

    /// Llama a la función y devuelve sus outputs etiquetados.
    pub fn call(&self, args: &[Value], kwargs: Namespace) -> Result<Namespace, LabelError> {
        let inputs = self.resolve_inputs(args, &kwargs)?;
        self.invoke(&inputs)
    }

    /// Llama a la función y devuelve inputs resueltos + outputs en un único
    /// registro plano (los outputs ganan ante colisión).
    pub fn recorded_call(&self, args: &[Value], kwargs: Namespace) -> Result<Namespace, LabelError> {
        let inputs = self.resolve_inputs(args, &kwargs)?;
        let outputs = self.invoke(&inputs)?;
        Ok(merge_namespaces(&inputs, &outputs))
    }

    fn invoke(&self, inputs: &Namespace) -> Result<Namespace, LabelError> {
        let all: Cow<'_, Namespace> = if self.fixed_values.is_empty() {
            Cow::Borrowed(inputs)
        } else {
            Cow::Owned(merge_namespaces(inputs, &self.fixed_values))
        };
        let result = (self.function)(&Args::new(&self.name, &all))?;
        self.label_result(result)
    }

    fn label_result(&self, result: Output) -> Result<Namespace, LabelError> {
        if let OutputNames::Resolved(names) = &*self.read_output_names() {
            return output_as_namespace(&self.name, names, result);
        }

        let mut state = self.output_names.write().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            // otra llamada concurrente ya resolvió los nombres
            OutputNames::Resolved(names) => output_as_namespace(&self.name, names, result),
            OutputNames::Unresolved => {
                let names = guess_output_names(&self.name, &result);
                let outputs = output_as_namespace(&self.name, &names, result)?;
                debug!("{}: output names inferidos en la primera llamada: {:?}", self.name, names);
                *state = OutputNames::Resolved(names);
                Ok(outputs)
            }
        }
    }

    fn derive(&self) -> Self {
        Self { output_names: Arc::new(RwLock::new(self.output_names())),
               ..self.clone() }
    }

    pub fn rename(&self, name: impl Into<String>) -> Self {
        let mut f = self.derive();
        f.name = name.into();
        f
    }

    /// Agrega o reemplaza defaults de inputs existentes.
    pub fn set_default(&self, values: Namespace) -> Result<Self, LabelError> {
        let unknown: Vec<String> = values.keys().filter(|k| !self.input_names.contains(k)).cloned().collect();
        if !unknown.is_empty() {
            return Err(LabelError::DefaultForUnknownInput { callable: self.name.clone(),
                                                            names: unknown });
        }
        let mut f = self.derive();
        f.default_values.extend(values);
        Ok(f)
    }

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
        let mut f = self.derive();
        for name in names {
            f.default_values.shift_remove(name.as_ref());
        }
        Ok(f)
    }

    /// Aplicación parcial: los nombres fijados salen de los inputs y de los
    /// defaults, y la función los recibe siempre con el valor dado.
    pub fn fix(&self, values: Namespace) -> Result<Self, LabelError> {
        let unexpected: Vec<String> = values.keys().filter(|k| !self.input_names.contains(k)).cloned().collect();
        if !unexpected.is_empty() {
            return Err(LabelError::UnexpectedArgument { callable: self.name.clone(),
                                                        names: unexpected });
        }
        let mut f = self.derive();
        f.input_names.retain(|n| !values.contains_key(n));
        f.default_values.retain(|k, _| !values.contains_key(k));
        f.fixed_values.extend(values);
        Ok(f)
    }

    /// Oculta inputs con default: quedan fijados a su valor por defecto.
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
        let values: Namespace = names.iter()
                                     .filter_map(|n| self.default_values.get_key_value(n.as_ref()))
                                     .map(|(k, v)| (k.clone(), v.clone()))
                                     .collect();
        self.fix(values)
    }

    pub fn hide_all_but<S: AsRef<str>>(&self, visible: &[S]) -> Result<Self, LabelError> {
        let hidden: Vec<&str> = self.input_names
                                    .iter()
                                    .map(String::as_str)
                                    .filter(|n| !visible.iter().any(|v| v.as_ref() == *n))
                                    .collect();
        self.hide(&hidden)
    }
}

impl fmt::Debug for LabelledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelledFunction")
         .field("name", &self.name)
         .field("input_names", &self.input_names)
         .field("output_names", &*self.read_output_names())
         .field("default_values", &self.default_values)
         .field("fixed_values", &self.fixed_values)
         .finish()
    }
}

impl fmt::Display for LabelledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_signature(f, &self.name, &self.input_names, &self.read_output_names())
    }
}

impl Labelled for LabelledFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> OutputNames {
        LabelledFunction::output_names(self)
    }

    fn default_values(&self) -> &Namespace {
        &self.default_values
    }

    fn call_kwargs(&self, kwargs: Namespace) -> Result<Namespace, LabelError> {
        self.call(&[], kwargs)
    }

    fn fix_step(&self, values: Namespace) -> Result<Step, LabelError> {
        Ok(Arc::new(self.fix(values)?))
    }

    fn reset_default_step(&self, names: &[String]) -> Result<Step, LabelError> {
        Ok(Arc::new(self.reset_default(names)?))
    }
}
