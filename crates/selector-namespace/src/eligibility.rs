//! Which rules may be namespaced.

use css_parser::{NodeId, NodeKind, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;

/// At-rules whose rules are namespaced as if they were top level.
static ALLOWED_AT_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:media|supports|for)$").unwrap());

/// Whether the rule `id` may be namespaced.
///
/// A rule is skipped when any ancestor is a style rule, or when its direct
/// parent is an at-rule other than `@media`, `@supports` or `@for`.
pub fn is_eligible(sheet: &Stylesheet, id: NodeId) -> bool {
    let mut ancestors = sheet.ancestors(id);

    let Some((_, parent)) = ancestors.next() else {
        return true;
    };
    match &parent.kind {
        NodeKind::Rule(_) => return false,
        NodeKind::AtRule(at_rule) if !ALLOWED_AT_RULE.is_match(&at_rule.name) => return false,
        _ => {}
    }

    !ancestors.any(|(_, node)| node.kind.is_rule())
}
