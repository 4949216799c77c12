//! Selector patterns: a regular expression or a literal token.

use crate::error::OptionsError;
use regex::{NoExpand, Regex};

/// How a selector token is recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPattern {
    /// A regular expression source, compiled when the plugin is built.
    Regex(String),
    /// Exact text.
    Literal(String),
}

impl SelectorPattern {
    /// A regular expression pattern.
    pub fn regex(source: impl Into<String>) -> Self {
        SelectorPattern::Regex(source.into())
    }

    /// A literal pattern.
    pub fn literal(text: impl Into<String>) -> Self {
        SelectorPattern::Literal(text.into())
    }

    /// The pattern source as given.
    pub fn as_str(&self) -> &str {
        match self {
            SelectorPattern::Regex(source) | SelectorPattern::Literal(source) => source,
        }
    }

    pub(crate) fn compile(&self, option: &'static str) -> Result<Matcher, OptionsError> {
        match self {
            SelectorPattern::Regex(source) => Regex::new(source)
                .map(Matcher::Regex)
                .map_err(|source_err| OptionsError::InvalidPattern {
                    option,
                    pattern: source.clone(),
                    source: source_err,
                }),
            SelectorPattern::Literal(text) => Ok(Matcher::Literal(text.clone())),
        }
    }
}

/// A compiled [`SelectorPattern`].
///
/// Every operation starts from the beginning of its input, so one matcher
/// can be used for any number of selectors.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Regex(Regex),
    Literal(String),
}

impl Matcher {
    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Regex(regex) => regex.is_match(haystack),
            Matcher::Literal(text) => haystack.contains(text.as_str()),
        }
    }

    /// Whether the leftmost match starts at offset 0.
    pub(crate) fn first_match_at_start(&self, haystack: &str) -> bool {
        match self {
            Matcher::Regex(regex) => regex.find(haystack).is_some_and(|m| m.start() == 0),
            Matcher::Literal(text) => haystack.starts_with(text.as_str()),
        }
    }

    /// Replaces every match; `replacement` is inserted as-is.
    pub(crate) fn replace_all(&self, haystack: &str, replacement: &str) -> String {
        match self {
            Matcher::Regex(regex) => regex.replace_all(haystack, NoExpand(replacement)).into_owned(),
            Matcher::Literal(text) => haystack.replace(text.as_str(), replacement),
        }
    }

    /// Replaces the leftmost match; `replacement` is inserted as-is.
    pub(crate) fn replace_first(&self, haystack: &str, replacement: &str) -> String {
        match self {
            Matcher::Regex(regex) => regex.replacen(haystack, 1, NoExpand(replacement)).into_owned(),
            Matcher::Literal(text) => haystack.replacen(text.as_str(), replacement, 1),
        }
    }
}
