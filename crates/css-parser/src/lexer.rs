//! CSS lexer using logos.
//!
//! Only structure matters to the tree, so the token set is coarse: brackets,
//! separators, at-keywords, comments and strings are distinct, and every other
//! run of characters is a [`TokenKind::Word`].

use crate::span::Span;
use logos::Logos;
use text_size::TextSize;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for stylesheet structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// Spaces, tabs and newlines
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    /// `/* ... */`, possibly unterminated
    #[token("/*", lex_comment)]
    Comment,

    /// A quoted string, possibly unterminated
    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    String,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `:`
    #[token(":")]
    Colon,

    /// `@name`
    #[regex(r"@[a-zA-Z_\-][a-zA-Z0-9_\-]*")]
    AtKeyword,

    /// A lone `@`
    #[token("@")]
    At,

    /// `/` not starting a comment
    #[token("/")]
    Slash,

    /// A backslash escape such as `\{`
    #[regex(r"\\[^\n]")]
    Escape,

    /// Any other run of characters
    #[regex(r#"[^ \t\r\n\x0C{}()\[\];,:@/'"\\]+"#)]
    Word,

    /// End of file
    Eof,

    /// Invalid/unknown token
    #[default]
    Error,
}

fn lex_comment(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map(|end| end + 2).unwrap_or(rest.len());
    lex.bump(len);
    true
}

fn lex_string(lex: &mut logos::Lexer<'_, TokenKind>, quote: char) -> bool {
    let rest = lex.remainder();
    let mut escaped = false;
    let mut len = rest.len();

    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\n' => {
                len = i;
                break;
            }
            c if c == quote => {
                len = i + c.len_utf8();
                break;
            }
            _ => {}
        }
    }

    lex.bump(len);
    true
}

/// Whether a [`TokenKind::String`] token's text ends with its closing quote.
pub(crate) fn is_closed_string(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return false;
    };

    let mut escaped = false;
    for c in chars {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return true,
            _ => {}
        }
    }
    false
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::String => "string",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::At => "'@'",
            TokenKind::Slash => "'/'",
            TokenKind::Escape => "escape",
            TokenKind::Word => "text",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }

    /// Returns true for tokens that carry no structure.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// A lexer for CSS source.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }

    /// Returns the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let kind = match self.inner.next() {
            Some(Ok(kind)) => kind,
            Some(Err(())) => TokenKind::Error,
            None => {
                self.finished = true;
                let end = TextSize::from(self.source.len() as u32);
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(end, end),
                });
            }
        };

        let range = self.inner.span();
        Some(Token {
            kind,
            span: Span::from_usize(range.start, range.end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof && *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn test_simple_rule() {
        assert_eq!(
            tokenize(".foo { color: red; }"),
            vec![
                TokenKind::Word,
                TokenKind::LBrace,
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Word,
                TokenKind::Semicolon,
                TokenKind::RBrace
            ]
        );
    }

    #[test]
    fn test_at_rule() {
        assert_eq!(
            tokenize("@-webkit-keyframes spin {}"),
            vec![
                TokenKind::AtKeyword,
                TokenKind::Word,
                TokenKind::LBrace,
                TokenKind::RBrace
            ]
        );
    }

    #[test]
    fn test_comment_swallows_braces() {
        assert_eq!(
            tokenize("/* { } */ a"),
            vec![TokenKind::Comment, TokenKind::Word]
        );
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let tokens: Vec<Token> = Lexer::new("a /* b {").collect();
        let comment = tokens.iter().find(|t| t.kind == TokenKind::Comment).unwrap();
        assert_eq!(comment.span, Span::from_usize(2, 8));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let source = r#"[title="a \" {"]"#;
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let string = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
        assert_eq!(string.span.slice(source), r#""a \" {""#);
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            tokenize(r".a\:b"),
            vec![TokenKind::Word, TokenKind::Escape, TokenKind::Word]
        );
    }

    #[test]
    fn test_selector_punctuation() {
        assert_eq!(
            tokenize("a > b, :root::before"),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Colon,
                TokenKind::Word
            ]
        );
    }
}
