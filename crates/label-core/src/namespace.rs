//! Operaciones sobre namespaces: fusión, restricción y aplicación de un
//! callable etiquetado sobre un namespace compartido.

use log::trace;

use crate::errors::LabelError;
use crate::labelled::Labelled;
use crate::value::Namespace;

/// Merge shallow: las claves de `b` reemplazan a las de `a`. El orden de `a`
/// se conserva y las claves nuevas de `b` se agregan al final.
pub fn merge_namespaces(a: &Namespace, b: &Namespace) -> Namespace {
    let mut out = a.clone();
    for (k, v) in b {
        out.insert(k.clone(), v.clone());
    }
    out
}

/// Subconjunto de `namespace` con las claves de `names` presentes, en el
/// orden de `names`.
pub fn restrict<S: AsRef<str>>(namespace: &Namespace, names: &[S]) -> Namespace {
    names.iter()
         .filter_map(|n| namespace.get_key_value(n.as_ref()))
         .map(|(k, v)| (k.clone(), v.clone()))
         .collect()
}

/// Aplica `callable` sobre `namespace` en el lugar: extrae sus inputs,
/// lo invoca por keyword y fusiona los outputs (que pisan valores previos
/// con el mismo nombre). Si la llamada falla, el namespace queda intacto.
pub fn apply_in_namespace(callable: &dyn Labelled, namespace: &mut Namespace) -> Result<(), LabelError> {
    let inputs = restrict(namespace, callable.input_names());
    trace!("{}: inputs {:?}", callable.name(), inputs);
    let outputs = callable.call_kwargs(inputs)?;
    trace!("{}: outputs {:?}", callable.name(), outputs);
    namespace.extend(outputs);
    Ok(())
}

/// Variante funcional de [`apply_in_namespace`].
pub fn applied_in_namespace(callable: &dyn Labelled, namespace: &Namespace) -> Result<Namespace, LabelError> {
    let mut out = namespace.clone();
    apply_in_namespace(callable, &mut out)?;
    Ok(out)
}
