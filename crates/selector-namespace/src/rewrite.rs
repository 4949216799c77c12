//! Rewriting a single selector.

use crate::pattern::Matcher;

/// The compiled selector rewrite policy.
#[derive(Debug, Clone)]
pub(crate) struct Rewriter {
    pub(crate) self_selector: Matcher,
    pub(crate) root_selector: Matcher,
    pub(crate) ignore_root: bool,
    pub(crate) drop_root: bool,
}

impl Rewriter {
    /// Rewrites one selector under `namespace`. First matching case wins:
    ///
    /// 1. the selector references itself: each self token becomes the
    ///    namespace;
    /// 2. the selector starts with the root token (with `ignore_root`): the
    ///    token is dropped (with `drop_root`) and nothing is prefixed;
    /// 3. otherwise the namespace is prefixed with a single space.
    ///
    /// Cases 1 and 3 produce one variant per comma-separated namespace
    /// alternative, joined with commas.
    pub(crate) fn rewrite(&self, selector: &str, namespace: &str) -> String {
        if self.self_selector.is_match(selector) {
            return alternatives(namespace)
                .map(|ns| self.self_selector.replace_all(selector, ns))
                .collect::<Vec<_>>()
                .join(",");
        }

        if self.ignore_root && self.root_selector.first_match_at_start(selector) {
            return self.drop_root(selector);
        }

        alternatives(namespace)
            .map(|ns| format!("{ns} {selector}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn drop_root(&self, selector: &str) -> String {
        if !self.drop_root {
            return selector.to_string();
        }

        let dropped = self.root_selector.replace_first(selector, "");
        match dropped.trim() {
            "" => selector.to_string(),
            rest => rest.to_string(),
        }
    }
}

/// Splits a namespace on commas, keeping each part as written.
pub(crate) fn alternatives(namespace: &str) -> impl Iterator<Item = &str> {
    namespace.split(',')
}
