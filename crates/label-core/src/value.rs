//! Valores neutrales intercambiados entre funciones etiquetadas.
//!
//! El núcleo no interpreta los valores: usa `serde_json::Value` como payload
//! genérico y un `Namespace` ordenado por inserción para asociar nombres de
//! variables a valores. El resultado de una función de usuario se declara de
//! forma explícita con `Output` (ninguno | único | tupla | mapeo con nombres),
//! de modo que la inferencia de output names no depende de inspección en
//! runtime.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::errors::LabelError;

pub use serde_json::Value;

/// Mapeo nombre -> valor, ordenado por inserción.
pub type Namespace = IndexMap<String, Value>;

/// Construye un `Namespace` con literales JSON.
///
/// ```
/// use label_core::namespace;
/// let ns = namespace! { "x" => 1.0, "label" => "a" };
/// assert_eq!(ns.len(), 2);
/// ```
#[macro_export]
macro_rules! namespace {
    () => { $crate::value::Namespace::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut ns = $crate::value::Namespace::new();
        $( ns.insert(::std::string::String::from($key), $crate::serde_json::json!($value)); )+
        ns
    }};
}

/// Resultado devuelto por una función envuelta.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Sin resultado: cero outputs.
    None,
    /// Un único valor.
    Single(Value),
    /// Secuencia ordenada de valores (se asocia posicionalmente a los nombres).
    Tuple(Vec<Value>),
    /// Valores ya etiquetados.
    Named(Namespace),
}

impl Output {
    pub fn single(value: impl Into<Value>) -> Self {
        Output::Single(value.into())
    }

    pub fn tuple<I, V>(values: I) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<Value>
    {
        Output::Tuple(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<Value>
    {
        Output::Named(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Vista de los argumentos resueltos que recibe la función envuelta.
///
/// Contiene todos los inputs (posicionales, keyword, defaults y valores
/// fijados por `fix`) indexados por nombre.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    callable: &'a str,
    values: &'a Namespace,
}

impl<'a> Args<'a> {
    pub fn new(callable: &'a str, values: &'a Namespace) -> Self {
        Self { callable, values }
    }

    pub fn callable(&self) -> &'a str {
        self.callable
    }

    pub fn values(&self) -> &'a Namespace {
        self.values
    }

    pub fn value(&self, name: &str) -> Result<&'a Value, LabelError> {
        self.values.get(name).ok_or_else(|| LabelError::MissingArgument { callable: self.callable.to_string(),
                                                                           names: vec![name.to_string()] })
    }

    /// Decodifica un argumento al tipo pedido vía serde.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, LabelError> {
        let value = self.value(name)?;
        serde_json::from_value(value.clone()).map_err(|e| LabelError::ArgumentType { callable: self.callable.to_string(),
                                                                                      name: name.to_string(),
                                                                                      message: e.to_string() })
    }

    pub fn f64(&self, name: &str) -> Result<f64, LabelError> {
        self.get(name)
    }

    /// Error de la función de usuario, etiquetado con el nombre del callable.
    pub fn fail(&self, message: impl Into<String>) -> LabelError {
        LabelError::Function { callable: self.callable.to_string(),
                               message: message.into() }
    }
}
