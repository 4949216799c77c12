//! Recursive descent parser for stylesheets.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{is_closed_string, Lexer, Token, TokenKind};
use crate::span::Span;
use crate::{ParseOptions, ParseResult};
use smol_str::SmolStr;
use text_size::TextSize;

/// How a prelude (the text before `{` or `;`) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreludeEnd {
    /// `{`, not consumed.
    Block,
    /// `;`, not consumed.
    Semicolon,
    /// `}` or end of file, not consumed.
    Close,
}

/// A scanned prelude.
#[derive(Debug, Clone, Copy)]
struct Prelude {
    /// First to last significant token, trimmed of trivia.
    content: Span,
    /// Everything up to the terminator, including trailing trivia.
    full: Span,
    end: PreludeEnd,
}

/// The stylesheet parser.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
    nodes: Vec<Node>,
    options: ParseOptions,
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::empty(TextSize::from(source.len() as u32)),
        };
        Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            nodes: Vec::new(),
            options,
            eof_token,
        }
    }

    /// Parses the source into a stylesheet.
    pub fn parse(mut self) -> ParseResult {
        let (children, _) = self.parse_block(None);
        let stylesheet = Stylesheet {
            source: self.source.to_string(),
            file: self.options.from.take(),
            nodes: self.nodes,
            children,
        };
        ParseResult {
            stylesheet,
            errors: self.errors,
        }
    }

    // === Token helpers ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    fn skip_whitespace(&mut self) {
        while self.check(TokenKind::Whitespace) {
            self.advance();
        }
    }

    fn text(&self, span: Span) -> &'src str {
        span.slice(self.source)
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { kind, parent, span });
        id
    }

    // === Grammar ===

    /// Parses nodes until `}` (when `parent` is set) or end of file.
    ///
    /// Returns the children and the end offset of the closing brace if one
    /// was consumed.
    fn parse_block(&mut self, parent: Option<NodeId>) -> (Vec<NodeId>, Option<TextSize>) {
        let mut children = Vec::new();

        loop {
            self.skip_whitespace();
            let token = *self.current();

            match token.kind {
                TokenKind::Eof => return (children, None),
                TokenKind::RBrace => {
                    self.advance();
                    if parent.is_some() {
                        return (children, Some(token.span.end));
                    }
                    self.error(ParseErrorKind::UnexpectedClosingBrace, token.span);
                }
                TokenKind::Semicolon => self.advance(),
                TokenKind::Comment => {
                    children.push(self.parse_comment(parent));
                }
                TokenKind::AtKeyword | TokenKind::At => {
                    children.push(self.parse_at_rule(parent));
                }
                _ => {
                    if let Some(id) = self.parse_rule_or_declaration(parent) {
                        children.push(id);
                    }
                }
            }
        }
    }

    fn parse_comment(&mut self, parent: Option<NodeId>) -> NodeId {
        let span = self.current().span;
        self.advance();

        let raw = self.text(span);
        let text = if raw.len() >= 4 && raw.ends_with("*/") {
            &raw[2..raw.len() - 2]
        } else {
            self.error(ParseErrorKind::UnclosedComment, span);
            &raw[2..]
        };

        self.alloc(
            NodeKind::Comment(Comment {
                text: text.to_string(),
            }),
            parent,
            span,
        )
    }

    /// Scans tokens up to the next `{`, `}`, top-level `;` or end of file.
    fn scan_prelude(&mut self) -> Prelude {
        let start = self.current().span.start;
        let mut content_end = start;
        let mut brackets: Vec<(TokenKind, Span)> = Vec::new();

        let end = loop {
            let token = *self.current();
            match token.kind {
                TokenKind::LBrace => break PreludeEnd::Block,
                TokenKind::RBrace | TokenKind::Eof => break PreludeEnd::Close,
                TokenKind::Semicolon if brackets.is_empty() => break PreludeEnd::Semicolon,
                TokenKind::LParen | TokenKind::LBracket => brackets.push((token.kind, token.span)),
                TokenKind::RParen | TokenKind::RBracket => {
                    brackets.pop();
                }
                TokenKind::String => {
                    if !is_closed_string(self.text(token.span)) {
                        self.error(ParseErrorKind::UnclosedString, token.span);
                    }
                }
                TokenKind::Comment => {
                    if !self.text(token.span).ends_with("*/") || token.span.len() < TextSize::from(4) {
                        self.error(ParseErrorKind::UnclosedComment, token.span);
                    }
                }
                _ => {}
            }
            if !token.kind.is_trivia() {
                content_end = token.span.end;
            }
            self.advance();
        };

        for (kind, span) in brackets {
            let expected = if kind == TokenKind::LParen { "')'" } else { "']'" };
            self.error(ParseErrorKind::UnclosedBracket { expected }, span);
        }

        Prelude {
            content: Span::new(start, content_end),
            full: Span::new(start, self.current().span.start),
            end,
        }
    }

    fn parse_rule_or_declaration(&mut self, parent: Option<NodeId>) -> Option<NodeId> {
        let prelude = self.scan_prelude();

        match prelude.end {
            PreludeEnd::Block => Some(self.parse_rule(parent, prelude)),
            PreludeEnd::Semicolon => {
                let end = self.current().span.end;
                self.advance();
                self.parse_declaration(parent, prelude.content, end)
            }
            PreludeEnd::Close => self.parse_declaration(parent, prelude.content, prelude.content.end),
        }
    }

    fn parse_rule(&mut self, parent: Option<NodeId>, prelude: Prelude) -> NodeId {
        let selector = self.text(prelude.content);
        let between = Span::new(prelude.content.end, prelude.full.end);

        if selector.is_empty() {
            self.error(ParseErrorKind::EmptySelector, self.current().span);
        }

        let rule = Rule::new(selector.to_string(), prelude.content, self.text(between).to_string());
        let id = self.alloc(NodeKind::Rule(rule), parent, prelude.content);

        // Consume `{`
        self.advance();
        let (children, close) = self.parse_block(Some(id));
        let end = close.unwrap_or_else(|| {
            self.error(
                ParseErrorKind::UnclosedBlock {
                    opened_by: selector.to_string(),
                },
                prelude.content,
            );
            TextSize::from(self.source.len() as u32)
        });

        let node = &mut self.nodes[id.index()];
        node.span = Span::new(prelude.content.start, end);
        if let NodeKind::Rule(rule) = &mut node.kind {
            rule.children = children;
        }
        id
    }

    fn parse_at_rule(&mut self, parent: Option<NodeId>) -> NodeId {
        let name_token = *self.current();
        let name = &self.text(name_token.span)[1..];
        if name.is_empty() {
            self.error(ParseErrorKind::EmptyAtRuleName, name_token.span);
        }
        self.advance();

        let prelude = self.scan_prelude();
        let params = self.text(prelude.content).trim().to_string();
        let at_rule = AtRule {
            name: SmolStr::new(name),
            params,
            body: None,
        };
        let id = self.alloc(NodeKind::AtRule(at_rule), parent, name_token.span);

        let end = match prelude.end {
            PreludeEnd::Block => {
                self.advance();
                let (children, close) = self.parse_block(Some(id));
                if let NodeKind::AtRule(at_rule) = &mut self.nodes[id.index()].kind {
                    at_rule.body = Some(children);
                }
                close.unwrap_or_else(|| {
                    self.error(
                        ParseErrorKind::UnclosedBlock {
                            opened_by: format!("@{name}"),
                        },
                        name_token.span,
                    );
                    TextSize::from(self.source.len() as u32)
                })
            }
            PreludeEnd::Semicolon => {
                let end = self.current().span.end;
                self.advance();
                end
            }
            PreludeEnd::Close => prelude.content.end.max(name_token.span.end),
        };

        self.nodes[id.index()].span = Span::new(name_token.span.start, end);
        id
    }

    fn parse_declaration(&mut self, parent: Option<NodeId>, content: Span, end: TextSize) -> Option<NodeId> {
        let text = self.text(content);
        if text.is_empty() {
            return None;
        }

        // Declarations only exist inside blocks
        let colon = match parent.and(self.top_level_colon(content)) {
            Some(colon) => colon,
            None => {
                self.error(
                    ParseErrorKind::UnknownWord {
                        word: text.to_string(),
                    },
                    content,
                );
                return None;
            }
        };

        let split = colon - content.start_usize();
        let property = text[..split].trim();
        let mut value = text[split + 1..].trim();
        let mut important = false;
        if let Some(bang) = value.rfind('!') {
            if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
                important = true;
                value = value[..bang].trim_end();
            }
        }

        let declaration = Declaration {
            property: SmolStr::new(property),
            value: value.to_string(),
            important,
        };
        Some(self.alloc(
            NodeKind::Declaration(declaration),
            parent,
            Span::new(content.start, end),
        ))
    }

    /// Byte offset of the first `:` token outside brackets within `span`.
    fn top_level_colon(&self, span: Span) -> Option<usize> {
        let mut depth = 0usize;
        self.tokens
            .iter()
            .skip_while(|t| t.span.start < span.start)
            .take_while(|t| t.span.end <= span.end && t.kind != TokenKind::Eof)
            .find(|t| {
                match t.kind {
                    TokenKind::LParen | TokenKind::LBracket => depth += 1,
                    TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                    TokenKind::Colon => return depth == 0,
                    _ => {}
                }
                false
            })
            .map(|t| t.span.start_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_rule_and_declarations() {
        let result = parse(".foo { color: red; background: url(a;b.png) }");
        assert!(result.errors.is_empty(), "{:?}", result.errors);

        let sheet = &result.stylesheet;
        let (id, rule) = sheet.rules().next().unwrap();
        assert_eq!(rule.selector(), ".foo");
        assert_eq!(rule.between, " ");
        assert_eq!(rule.children.len(), 2);
        assert_eq!(sheet.parent(id), None);

        let NodeKind::Declaration(decl) = &sheet.node(rule.children[1]).kind else {
            panic!("expected declaration");
        };
        assert_eq!(decl.property, "background");
        assert_eq!(decl.value, "url(a;b.png)");
    }

    #[test]
    fn test_at_rule_with_body() {
        let result = parse("@media (min-width: 10px) { .a {} }");
        assert!(result.errors.is_empty());

        let sheet = &result.stylesheet;
        let media = sheet.at_rule(sheet.children()[0]).unwrap();
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "(min-width: 10px)");

        let (rule_id, _) = sheet.rules().next().unwrap();
        assert_eq!(sheet.parent(rule_id), Some(sheet.children()[0]));
    }

    #[test]
    fn test_statement_at_rule() {
        let result = parse("@import url(\"a.css\") screen;\n.a {}");
        assert!(result.errors.is_empty());
        let sheet = &result.stylesheet;
        let import = sheet.at_rule(sheet.children()[0]).unwrap();
        assert_eq!(import.name, "import");
        assert!(import.body.is_none());
        assert_eq!(sheet.rules().count(), 1);
    }

    #[test]
    fn test_nested_rules() {
        let result = parse(".a { color: red; &:hover { color: blue } .b { } }");
        assert!(result.errors.is_empty());

        let sheet = &result.stylesheet;
        let ids: Vec<NodeId> = sheet.rules().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(sheet.rule(ids[1]).unwrap().selector(), "&:hover");
        assert_eq!(sheet.ancestors(ids[2]).count(), 1);
    }

    #[test]
    fn test_trailing_comment_goes_to_between() {
        let result = parse(".a /* note */ {}");
        let (_, rule) = result.stylesheet.rules().next().unwrap();
        assert_eq!(rule.selector(), ".a");
        assert_eq!(rule.between, " /* note */ ");
    }

    #[test]
    fn test_important() {
        let result = parse(".a { color: red !important }");
        let sheet = &result.stylesheet;
        let (_, rule) = sheet.rules().next().unwrap();
        let NodeKind::Declaration(decl) = &sheet.node(rule.children[0]).kind else {
            panic!("expected declaration");
        };
        assert!(decl.important);
        assert_eq!(decl.value, "red");
    }

    #[test]
    fn test_unclosed_block() {
        let result = parse(".a { color: red;");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnclosedBlock { .. }
        ));
    }

    #[test]
    fn test_unexpected_closing_brace() {
        let result = parse(".a {} }");
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnexpectedClosingBrace
        ));
        assert_eq!(result.stylesheet.rules().count(), 1);
    }

    #[test]
    fn test_unclosed_string_and_comment() {
        let result = parse("[title=\"oops\n] {}");
        assert!(result
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnclosedString));

        let result = parse(".a {} /* never closed");
        assert!(result
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnclosedComment));
    }

    #[test]
    fn test_unknown_word_at_top_level() {
        let result = parse("color: red;");
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnknownWord { .. }
        ));
    }

    #[test]
    fn test_vendor_prefixed_at_rule_name() {
        let result = parse("@-webkit-keyframes spin { from { opacity: 0 } }");
        let sheet = &result.stylesheet;
        assert_eq!(sheet.at_rule(sheet.children()[0]).unwrap().name, "-webkit-keyframes");
    }
}
