//! Rule tree types.
//!
//! Nodes live in an arena owned by [`Stylesheet`] and refer to their parent by
//! [`NodeId`], so ancestor walks need no back-pointers. Node ids are allocated
//! in document order.

use crate::span::Span;
use camino::{Utf8Path, Utf8PathBuf};
use smol_str::SmolStr;

/// Index of a node in a [`Stylesheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// The arena index of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parsed stylesheet together with its source text.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub(crate) source: String,
    pub(crate) file: Option<Utf8PathBuf>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) children: Vec<NodeId>,
}

impl Stylesheet {
    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The file this stylesheet was read from, if any.
    pub fn file(&self) -> Option<&Utf8Path> {
        self.file.as_deref()
    }

    /// Sets the file identifier of this stylesheet.
    pub fn set_file(&mut self, file: Option<Utf8PathBuf>) {
        self.file = file;
    }

    /// Top-level nodes in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the stylesheet has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this stylesheet.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the parent of a node, `None` at the top level.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|node| node.parent)
    }

    /// Iterates the strict ancestors of a node, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            sheet: self,
            next: self.parent(id),
        }
    }

    /// Returns the style rule with the given id.
    pub fn rule(&self, id: NodeId) -> Option<&Rule> {
        match &self.nodes.get(id.index())?.kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// Returns the style rule with the given id for modification.
    pub fn rule_mut(&mut self, id: NodeId) -> Option<&mut Rule> {
        match &mut self.nodes.get_mut(id.index())?.kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// Returns the at-rule with the given id.
    pub fn at_rule(&self, id: NodeId) -> Option<&AtRule> {
        match &self.nodes.get(id.index())?.kind {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    /// Iterates every style rule in document order.
    pub fn rules(&self) -> impl Iterator<Item = (NodeId, &Rule)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match &node.kind {
                NodeKind::Rule(rule) => Some((NodeId::new(index), rule)),
                _ => None,
            })
    }

    /// Serializes the stylesheet, keeping everything but rewritten selectors
    /// byte-identical to the source.
    pub fn to_css(&self) -> String {
        crate::printer::print(self).css
    }
}

/// Iterator over a node's ancestors. See [`Stylesheet::ancestors`].
pub struct Ancestors<'a> {
    sheet: &'a Stylesheet,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.sheet.node(id);
        self.next = node.parent;
        Some((id, node))
    }
}

/// A node in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node is.
    pub kind: NodeKind,
    /// The enclosing node, `None` for top-level nodes.
    pub parent: Option<NodeId>,
    /// The span of the whole node.
    pub span: Span,
}

/// The node variants.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A style rule, `.a { ... }`.
    Rule(Rule),
    /// An at-rule, `@media print { ... }` or `@import "x";`.
    AtRule(AtRule),
    /// A declaration, `color: red`.
    Declaration(Declaration),
    /// A comment outside any prelude.
    Comment(Comment),
}

impl NodeKind {
    /// Returns true for style rules.
    pub fn is_rule(&self) -> bool {
        matches!(self, NodeKind::Rule(_))
    }

    /// Returns the at-rule, if this is one.
    pub fn as_at_rule(&self) -> Option<&AtRule> {
        match self {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }
}

/// A style rule.
#[derive(Debug, Clone)]
pub struct Rule {
    selector: String,
    /// Span of the selector in the source (trimmed).
    pub selector_span: Span,
    /// Raw text between the selector and `{`.
    pub between: String,
    /// Child nodes in document order.
    pub children: Vec<NodeId>,
}

impl Rule {
    pub(crate) fn new(selector: String, selector_span: Span, between: String) -> Self {
        Self {
            selector,
            selector_span,
            between,
            children: Vec::new(),
        }
    }

    /// The current selector text.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Replaces the selector text.
    pub fn set_selector(&mut self, selector: impl Into<String>) {
        self.selector = selector.into();
    }

    /// The comma-separated selectors of this rule, trimmed.
    pub fn selectors(&self) -> Vec<String> {
        split_selector_list(&self.selector)
    }

    /// Replaces the selector list wholesale.
    ///
    /// Items are joined with the separator that follows the first comma of
    /// the current selector, or with `,` plus the whitespace before `{`.
    pub fn set_selectors<S: AsRef<str>>(&mut self, selectors: &[S]) {
        let separator = match self.selector.find(',') {
            Some(comma) => {
                let rest = &self.selector[comma + 1..];
                let ws = rest.len() - rest.trim_start().len();
                self.selector[comma..comma + 1 + ws].to_string()
            }
            None => format!(",{}", self.between),
        };

        self.selector = selectors
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&separator);
    }
}

/// An at-rule.
#[derive(Debug, Clone)]
pub struct AtRule {
    /// The name without `@`, as written (`-webkit-keyframes`).
    pub name: SmolStr,
    /// The prelude after the name, trimmed.
    pub params: String,
    /// Child nodes, `None` for statement at-rules ending in `;`.
    pub body: Option<Vec<NodeId>>,
}

/// A declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// The property name.
    pub property: SmolStr,
    /// The value without `!important`.
    pub value: String,
    /// Whether the declaration is `!important`.
    pub important: bool,
}

/// A comment.
#[derive(Debug, Clone)]
pub struct Comment {
    /// The text between `/*` and `*/`.
    pub text: String,
}

/// Splits a selector list on top-level commas.
///
/// Commas inside strings, parentheses, brackets or after a backslash do not
/// split. Items are trimmed and empty items dropped.
pub fn split_selector_list(selector: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in selector.chars() {
        if escaped {
            escaped = false;
            current.push(c);
            continue;
        }

        match c {
            '\\' => escaped = true,
            _ if quote == Some(c) => quote = None,
            _ if quote.is_some() => {}
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let item = current.trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    let item = current.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_list() {
        assert_eq!(split_selector_list(".a, .b,.c"), vec![".a", ".b", ".c"]);
    }

    #[test]
    fn test_split_ignores_nested_commas() {
        assert_eq!(
            split_selector_list(r#":is(.a, .b) > [data-x=","], .c\,d"#),
            vec![r#":is(.a, .b) > [data-x=","]"#, r".c\,d"]
        );
    }

    #[test]
    fn test_split_drops_empty_items() {
        assert_eq!(split_selector_list(" , .a ,"), vec![".a"]);
        assert!(split_selector_list("").is_empty());
    }

    #[test]
    fn test_set_selectors_reuses_separator() {
        let mut rule = Rule::new(".a,\n.b".to_string(), Span::default(), " ".to_string());
        rule.set_selectors(&[".x .a", ".x .b"]);
        assert_eq!(rule.selector(), ".x .a,\n.x .b");
    }

    #[test]
    fn test_set_selectors_without_comma_uses_between() {
        let mut rule = Rule::new(".a".to_string(), Span::default(), " ".to_string());
        rule.set_selectors(&[".x .a", ".y .a"]);
        assert_eq!(rule.selector(), ".x .a, .y .a");
    }
}
