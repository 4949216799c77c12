//! Namespace resolution per stylesheet.

use crate::error::NamespaceError;
use crate::options::Namespace;
use camino::Utf8Path;

/// Resolves the namespace for a stylesheet read from `file`.
///
/// Returns `Ok(None)` when there is nothing to apply: the function returned
/// nothing, or the namespace is empty.
pub fn resolve(namespace: &Namespace, file: Option<&Utf8Path>) -> Result<Option<String>, NamespaceError> {
    let resolved = match namespace {
        Namespace::Static(namespace) => Some(namespace.clone()),
        Namespace::PerFile(f) => f(file).map_err(|source| NamespaceError::Resolve {
            file: file.map(Utf8Path::to_path_buf),
            source,
        })?,
    };
    Ok(resolved.filter(|namespace| !namespace.is_empty()))
}
