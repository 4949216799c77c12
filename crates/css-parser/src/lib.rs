//! Lossless CSS rule tree for selector-namespace.
//!
//! This crate provides:
//! - Lexer (tokenizer) using `logos`
//! - A recovering parser producing an arena-backed rule tree
//! - Selector list and selector component splitting
//! - A printer that keeps everything but rewritten selectors byte-identical
//! - A [`Plugin`] pipeline run by [`Processor`]
//!
//! # Example
//!
//! ```
//! use css_parser::parse;
//!
//! let result = parse(".a, .b { color: red }");
//! assert!(result.errors.is_empty());
//!
//! let (_, rule) = result.stylesheet.rules().next().unwrap();
//! assert_eq!(rule.selectors(), vec![".a", ".b"]);
//! ```

mod ast;
mod error;
mod lexer;
mod line_index;
mod parser;
mod printer;
mod processor;
mod selector;
mod source_map;
mod span;

use camino::Utf8PathBuf;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind, ProcessError};
pub use lexer::{Lexer, Token, TokenKind};
pub use line_index::{LineCol, LineIndex};
pub use printer::{print, Printed};
pub use processor::{Plugin, PluginError, ProcessOptions, ProcessResult, Processor};
pub use selector::{split_components, Component, ComponentKind};
pub use source_map::{Mapping, SourceMap, SourceMapBuilder};
pub use span::{ByteOffset, Span};

/// Options for parsing a stylesheet.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// The file the source was read from, recorded on the stylesheet.
    pub from: Option<Utf8PathBuf>,
}

/// The result of parsing a stylesheet.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed stylesheet.
    pub stylesheet: Stylesheet,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses CSS source into a rule tree.
///
/// The parser recovers from errors where possible, returning both the tree
/// and any errors encountered.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

/// Parses CSS source with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    let result = parser::Parser::new(source, options).parse();
    tracing::trace!(
        nodes = result.stylesheet.len(),
        errors = result.errors.len(),
        "parsed stylesheet"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.stylesheet.is_empty());
    }

    #[test]
    fn test_parse_records_file() {
        let result = parse_with_options(
            ".a {}",
            ParseOptions {
                from: Some("src/button.css".into()),
            },
        );
        assert_eq!(
            result.stylesheet.file().map(|f| f.as_str()),
            Some("src/button.css")
        );
    }
}
