//! Error types for namespacing.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Boxed error returned by per-file namespace functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid options, reported when the plugin is built.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// A selector pattern is not a valid regular expression.
    #[error("invalid {option} pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The option name (`selfSelector` or `rootSelector`).
        option: &'static str,
        /// The pattern as given.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// A failure while namespacing one stylesheet.
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// The per-file namespace function returned an error.
    #[error(
        "failed to compute namespace for {}: {source}",
        .file.as_deref().map_or("<input>", |f| f.as_str())
    )]
    Resolve {
        /// The stylesheet's source file.
        file: Option<Utf8PathBuf>,
        /// The function's error.
        #[source]
        source: BoxError,
    },
}
