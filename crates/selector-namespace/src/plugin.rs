//! The namespacing plugin.

use crate::eligibility::is_eligible;
use crate::error::{NamespaceError, OptionsError};
use crate::html_tag::qualify_html;
use crate::options::{Namespace, NamespaceOptions};
use crate::resolver::resolve;
use crate::rewrite::Rewriter;
use css_parser::{NodeId, Plugin, PluginError, Stylesheet};
use tracing::{debug, trace};

/// What happened to one stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceReport {
    /// The namespace applied, `None` if the stylesheet was left alone.
    pub namespace: Option<String>,
    /// Rules whose selectors were rewritten.
    pub rewritten: usize,
    /// Rules skipped as nested or inside a disallowed at-rule.
    pub skipped: usize,
}

/// Scopes every eligible rule of a stylesheet under a namespace.
///
/// Built once from [`NamespaceOptions`] and immutable afterwards, so one
/// instance can be shared across threads and documents.
#[derive(Debug, Clone)]
pub struct SelectorNamespace {
    namespace: Namespace,
    rewriter: Rewriter,
    html_tag: bool,
}

/// Builds a [`SelectorNamespace`] plugin.
pub fn selector_namespace(options: NamespaceOptions) -> Result<SelectorNamespace, OptionsError> {
    SelectorNamespace::new(options)
}

impl SelectorNamespace {
    /// Compiles the options. Invalid patterns are rejected here.
    pub fn new(options: NamespaceOptions) -> Result<Self, OptionsError> {
        let rewriter = Rewriter {
            self_selector: options.self_selector.compile("selfSelector")?,
            root_selector: options.root_selector.compile("rootSelector")?,
            ignore_root: options.ignore_root,
            drop_root: options.drop_root,
        };
        Ok(Self {
            namespace: options.namespace,
            rewriter,
            html_tag: options.process_html_tag_specifically,
        })
    }

    /// Rewrites one selector under an already resolved namespace.
    pub fn rewrite_selector(&self, selector: &str, namespace: &str) -> String {
        if self.html_tag {
            if let Some(qualified) = qualify_html(selector, namespace) {
                return qualified;
            }
        }
        self.rewriter.rewrite(selector, namespace)
    }

    /// Namespaces a stylesheet in place.
    ///
    /// On error the stylesheet is unchanged.
    pub fn apply(&self, sheet: &mut Stylesheet) -> Result<NamespaceReport, NamespaceError> {
        let Some(namespace) = resolve(&self.namespace, sheet.file())? else {
            debug!(file = ?sheet.file(), "no namespace, leaving stylesheet unchanged");
            return Ok(NamespaceReport::default());
        };

        let mut skipped = 0;
        let mut updates: Vec<(NodeId, Vec<String>)> = Vec::new();
        for (id, rule) in sheet.rules() {
            if !is_eligible(sheet, id) {
                trace!(selector = rule.selector(), "skipping nested rule");
                skipped += 1;
                continue;
            }

            let selectors = rule
                .selectors()
                .iter()
                .map(|selector| self.rewrite_selector(selector, &namespace))
                .collect();
            updates.push((id, selectors));
        }

        let rewritten = updates.len();
        for (id, selectors) in updates {
            if let Some(rule) = sheet.rule_mut(id) {
                rule.set_selectors(&selectors);
            }
        }

        debug!(
            file = ?sheet.file(),
            namespace = %namespace,
            rewritten,
            skipped,
            "namespaced stylesheet"
        );
        Ok(NamespaceReport {
            namespace: Some(namespace),
            rewritten,
            skipped,
        })
    }
}

impl Plugin for SelectorNamespace {
    fn name(&self) -> &'static str {
        "selector-namespace"
    }

    fn run(&self, sheet: &mut Stylesheet) -> Result<(), PluginError> {
        self.apply(sheet)?;
        Ok(())
    }
}
