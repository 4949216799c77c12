//! Plugin pipeline: parse, transform, print.

use crate::ast::Stylesheet;
use crate::error::{ParseError, ProcessError};
use crate::printer::print;
use crate::source_map::SourceMap;
use crate::{parse_with_options, ParseOptions};
use camino::Utf8PathBuf;

/// Error type returned by plugins.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// A transformation over a parsed stylesheet.
pub trait Plugin: Send + Sync {
    /// Stable name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Mutates the stylesheet in place.
    fn run(&self, sheet: &mut Stylesheet) -> Result<(), PluginError>;
}

/// Options for a single [`Processor::process`] call.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// The file the CSS was read from.
    pub from: Option<Utf8PathBuf>,
}

/// Output of a successful pipeline run.
#[derive(Debug)]
pub struct ProcessResult {
    /// The printed CSS.
    pub css: String,
    /// Generated to original offsets.
    pub source_map: SourceMap,
    /// The transformed tree.
    pub stylesheet: Stylesheet,
    /// Errors the parser recovered from.
    pub errors: Vec<ParseError>,
}

/// An ordered list of plugins.
#[derive(Default)]
pub struct Processor {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Processor {
    /// Creates an empty processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin.
    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Names of the registered plugins, in run order.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Parses `css`, runs every plugin in order, and prints the result.
    ///
    /// A failing plugin aborts the run; earlier plugins' changes are
    /// discarded with the tree.
    pub fn process(
        &self,
        css: &str,
        options: ProcessOptions,
    ) -> Result<ProcessResult, ProcessError> {
        let parsed = parse_with_options(css, ParseOptions { from: options.from });
        let mut stylesheet = parsed.stylesheet;

        for plugin in &self.plugins {
            tracing::trace!(plugin = plugin.name(), file = ?stylesheet.file(), "running plugin");
            plugin
                .run(&mut stylesheet)
                .map_err(|source| ProcessError::Plugin {
                    plugin: plugin.name(),
                    source,
                })?;
        }

        let printed = print(&stylesheet);
        Ok(ProcessResult {
            css: printed.css,
            source_map: printed.source_map,
            stylesheet,
            errors: parsed.errors,
        })
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Upper;

    impl Plugin for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn run(&self, sheet: &mut Stylesheet) -> Result<(), PluginError> {
            let ids: Vec<_> = sheet.rules().map(|(id, _)| id).collect();
            for id in ids {
                if let Some(rule) = sheet.rule_mut(id) {
                    let upper = rule.selector().to_uppercase();
                    rule.set_selector(upper);
                }
            }
            Ok(())
        }
    }

    struct Fails;

    impl Plugin for Fails {
        fn name(&self) -> &'static str {
            "fails"
        }

        fn run(&self, _sheet: &mut Stylesheet) -> Result<(), PluginError> {
            Err("nope".into())
        }
    }

    #[test]
    fn test_empty_processor_is_identity() {
        let css = "a { b: c }\n/* x */";
        let result = Processor::new().process(css, ProcessOptions::default()).unwrap();
        assert_eq!(result.css, css);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_plugins_run_in_order() {
        let result = Processor::new()
            .with(Upper)
            .process(".a { color: red }", ProcessOptions::default())
            .unwrap();
        assert_eq!(result.css, ".A { color: red }");
    }

    #[test]
    fn test_plugin_failure_aborts() {
        let err = Processor::new()
            .with(Upper)
            .with(Fails)
            .process(".a {}", ProcessOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "plugin `fails` failed: nope");
    }

    #[test]
    fn test_from_reaches_plugins() {
        let result = Processor::new()
            .process(
                ".a {}",
                ProcessOptions {
                    from: Some("a/b.css".into()),
                },
            )
            .unwrap();
        assert_eq!(result.stylesheet.file().map(|f| f.as_str()), Some("a/b.css"));
    }
}
