//! Plugin options.

use crate::error::BoxError;
use crate::pattern::SelectorPattern;
use camino::Utf8Path;
use std::fmt;
use std::sync::Arc;

/// Signature of a per-file namespace function.
///
/// Receives the stylesheet's source file (absent for in-memory input).
/// `Ok(None)` or an empty string leaves the stylesheet untouched.
pub type NamespaceFn = dyn Fn(Option<&Utf8Path>) -> Result<Option<String>, BoxError> + Send + Sync;

/// Where the namespace comes from.
#[derive(Clone)]
pub enum Namespace {
    /// The same namespace for every stylesheet.
    Static(String),
    /// Computed once per stylesheet from its source file.
    PerFile(Arc<NamespaceFn>),
}

impl Namespace {
    /// A per-file namespace from a closure.
    pub fn per_file<F>(f: F) -> Self
    where
        F: Fn(Option<&Utf8Path>) -> Result<Option<String>, BoxError> + Send + Sync + 'static,
    {
        Namespace::PerFile(Arc::new(f))
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace::Static(".self".to_string())
    }
}

impl From<&str> for Namespace {
    fn from(namespace: &str) -> Self {
        Namespace::Static(namespace.to_string())
    }
}

impl From<String> for Namespace {
    fn from(namespace: String) -> Self {
        Namespace::Static(namespace)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Static(namespace) => f.debug_tuple("Static").field(namespace).finish(),
            Namespace::PerFile(_) => f.write_str("PerFile(..)"),
        }
    }
}

/// Options for [`selector_namespace`](crate::selector_namespace).
#[derive(Debug, Clone)]
pub struct NamespaceOptions {
    /// The namespace selector. May hold comma-separated alternatives.
    pub namespace: Namespace,
    /// Token replaced by the namespace. Defaults to `:--namespace`.
    pub self_selector: SelectorPattern,
    /// Token recognised as the document root. Defaults to `:root`.
    pub root_selector: SelectorPattern,
    /// Selectors starting with the root token are not prefixed.
    pub ignore_root: bool,
    /// Strip the root token from such selectors.
    pub drop_root: bool,
    /// Qualify a bare `html` type selector instead of prefixing.
    pub process_html_tag_specifically: bool,
}

impl Default for NamespaceOptions {
    fn default() -> Self {
        Self {
            namespace: Namespace::default(),
            self_selector: SelectorPattern::literal(":--namespace"),
            root_selector: SelectorPattern::literal(":root"),
            ignore_root: true,
            drop_root: true,
            process_html_tag_specifically: false,
        }
    }
}

impl NamespaceOptions {
    /// Default options with the given namespace.
    pub fn with_namespace(namespace: impl Into<Namespace>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}
