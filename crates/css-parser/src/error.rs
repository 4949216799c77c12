//! Parse and pipeline error types.

use crate::span::Span;
use thiserror::Error;

/// An error that occurred during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `{` block was never closed.
    #[error("unclosed block: missing '}}' for {opened_by}")]
    UnclosedBlock {
        /// What opened the block (a selector or at-rule name).
        opened_by: String,
    },

    /// A `}` appeared with no open block.
    #[error("unexpected '}}'")]
    UnexpectedClosingBrace,

    /// A comment was never closed.
    #[error("unclosed comment")]
    UnclosedComment,

    /// A string was never closed.
    #[error("unclosed string")]
    UnclosedString,

    /// A `(` or `[` was never closed before the end of the prelude.
    #[error("unclosed bracket: expected {expected}")]
    UnclosedBracket {
        /// The closing bracket that was expected.
        expected: &'static str,
    },

    /// A `@` with no name.
    #[error("at-rule without a name")]
    EmptyAtRuleName,

    /// A rule with an empty selector, such as `{ color: red }`.
    #[error("rule without a selector")]
    EmptySelector,

    /// A declaration with no colon at the top level of a stylesheet.
    #[error("unknown word: {word}")]
    UnknownWord {
        /// The offending text.
        word: String,
    },
}

impl ParseErrorKind {
    /// A stable kebab-case code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::UnclosedBlock { .. } => "unclosed-block",
            ParseErrorKind::UnexpectedClosingBrace => "unexpected-closing-brace",
            ParseErrorKind::UnclosedComment => "unclosed-comment",
            ParseErrorKind::UnclosedString => "unclosed-string",
            ParseErrorKind::UnclosedBracket { .. } => "unclosed-bracket",
            ParseErrorKind::EmptyAtRuleName => "empty-at-rule-name",
            ParseErrorKind::EmptySelector => "empty-selector",
            ParseErrorKind::UnknownWord { .. } => "unknown-word",
        }
    }
}

/// An error from running a plugin pipeline.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A plugin failed; no output is produced.
    #[error("plugin `{plugin}` failed: {source}")]
    Plugin {
        /// The plugin's name.
        plugin: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnclosedBlock {
                opened_by: ".foo".to_string(),
            },
            Span::from_usize(0, 4),
        );
        assert_eq!(error.to_string(), "unclosed block: missing '}' for .foo");
        assert_eq!(error.kind.code(), "unclosed-block");
    }

    #[test]
    fn test_plugin_error_display() {
        let error = ProcessError::Plugin {
            plugin: "test",
            source: "boom".into(),
        };
        assert_eq!(error.to_string(), "plugin `test` failed: boom");
    }
}
