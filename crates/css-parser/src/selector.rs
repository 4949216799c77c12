//! Splitting a single selector into its components.
//!
//! This is a lexical split, not a full selector grammar: each component keeps
//! its exact source text so a selector can be rebuilt with one component
//! replaced. Functional pseudo-classes such as `:not(...)` are one component
//! including their argument.

use crate::span::Span;

/// The kind of a selector component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// A type selector, `div` or `svg|rect`.
    Type,
    /// `*` or `ns|*`.
    Universal,
    /// `.name`
    Class,
    /// `#name`
    Id,
    /// `[attr=value]`
    Attribute,
    /// `:hover`, `:not(.a)`
    PseudoClass,
    /// `::before`
    PseudoElement,
    /// `&`
    Nesting,
    /// A combinator with its surrounding whitespace: ` `, ` > `, `+`, `~`.
    Combinator,
    /// Leading or trailing whitespace.
    Whitespace,
    /// `/* ... */`
    Comment,
    /// A `,` between complex selectors.
    Comma,
    /// Anything unrecognised.
    Other,
}

/// One component of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// What the component is.
    pub kind: ComponentKind,
    /// Where it sits in the selector.
    pub span: Span,
}

impl Component {
    /// The component's text within `selector`.
    pub fn text<'a>(&self, selector: &'a str) -> &'a str {
        self.span.slice(selector)
    }

    /// Whether this is a bare type selector with exactly the given name.
    pub fn is_type_named(&self, selector: &str, name: &str) -> bool {
        self.kind == ComponentKind::Type && self.text(selector) == name
    }
}

/// Splits a selector into components, in order, covering every byte.
pub fn split_components(selector: &str) -> Vec<Component> {
    let mut scanner = Scanner {
        src: selector,
        pos: 0,
    };
    let mut components = Vec::new();

    while let Some(c) = scanner.peek() {
        let start = scanner.pos;
        let kind = match c {
            c if is_whitespace(c) => scanner.whitespace_or_combinator(),
            '>' | '+' | '~' => {
                scanner.bump();
                scanner.skip_whitespace();
                ComponentKind::Combinator
            }
            '|' if scanner.peek_nth(1) == Some('|') => {
                scanner.bump();
                scanner.bump();
                scanner.skip_whitespace();
                ComponentKind::Combinator
            }
            '.' => {
                scanner.bump();
                scanner.ident();
                ComponentKind::Class
            }
            '#' => {
                scanner.bump();
                scanner.ident();
                ComponentKind::Id
            }
            '[' => {
                scanner.balanced('[', ']');
                ComponentKind::Attribute
            }
            ':' => {
                scanner.bump();
                let kind = if scanner.peek() == Some(':') {
                    scanner.bump();
                    ComponentKind::PseudoElement
                } else {
                    ComponentKind::PseudoClass
                };
                scanner.ident();
                if scanner.peek() == Some('(') {
                    scanner.balanced('(', ')');
                }
                kind
            }
            '&' => {
                scanner.bump();
                ComponentKind::Nesting
            }
            ',' => {
                scanner.bump();
                ComponentKind::Comma
            }
            '/' if scanner.peek_nth(1) == Some('*') => {
                scanner.comment();
                ComponentKind::Comment
            }
            '*' => {
                scanner.bump();
                if scanner.namespace_bar() && !scanner.ident() {
                    scanner.eat('*');
                }
                ComponentKind::Universal
            }
            _ => {
                if scanner.ident() {
                    if scanner.namespace_bar() {
                        if scanner.eat('*') {
                            ComponentKind::Universal
                        } else {
                            scanner.ident();
                            ComponentKind::Type
                        }
                    } else {
                        ComponentKind::Type
                    }
                } else {
                    scanner.bump();
                    ComponentKind::Other
                }
            }
        };

        let kind = if kind == ComponentKind::Combinator
            && (start == 0 || scanner.pos == selector.len())
            && selector[start..scanner.pos].trim().is_empty()
        {
            ComponentKind::Whitespace
        } else {
            kind
        };
        components.push(Component {
            kind,
            span: Span::from_usize(start, scanner.pos),
        });
    }

    components
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.bump();
        }
    }

    /// Whitespace is a descendant combinator unless an explicit combinator
    /// follows it, in which case it belongs to that combinator.
    fn whitespace_or_combinator(&mut self) -> ComponentKind {
        self.skip_whitespace();
        match self.peek() {
            Some('>' | '+' | '~') => {
                self.bump();
                self.skip_whitespace();
            }
            Some('|') if self.peek_nth(1) == Some('|') => {
                self.bump();
                self.bump();
                self.skip_whitespace();
            }
            Some(',') => return ComponentKind::Whitespace,
            _ => {}
        }
        ComponentKind::Combinator
    }

    /// Consumes an identifier, including escapes. Returns whether anything
    /// was consumed.
    fn ident(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                self.bump();
            } else if is_ident_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        self.pos > start
    }

    /// Consumes a single `|` namespace separator.
    fn namespace_bar(&mut self) -> bool {
        if self.peek() == Some('|') && self.peek_nth(1) != Some('|') {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes from `open` through its matching `close`, skipping strings
    /// and escapes.
    fn balanced(&mut self, open: char, close: char) {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(c) = self.peek() {
            self.bump();
            match c {
                '\\' => self.bump(),
                _ if quote == Some(c) => quote = None,
                _ if quote.is_some() => {}
                '"' | '\'' => quote = Some(c),
                c if c == open => depth += 1,
                c if c == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn comment(&mut self) {
        match self.src[self.pos + 2..].find("*/") {
            Some(end) => self.pos += end + 4,
            None => self.pos = self.src.len(),
        }
    }
}
