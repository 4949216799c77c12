//! Serialization of a (possibly rewritten) stylesheet.
//!
//! The tree keeps its source text, so printing copies the source and splices
//! in each rule's current selector over its original selector span.

use crate::ast::Stylesheet;
use crate::source_map::{SourceMap, SourceMapBuilder};
use text_size::TextSize;

/// Printed CSS with a map back to the source.
#[derive(Debug, Clone)]
pub struct Printed {
    /// The stylesheet text.
    pub css: String,
    /// Generated to original offsets.
    pub source_map: SourceMap,
}

/// Prints the stylesheet.
pub fn print(sheet: &Stylesheet) -> Printed {
    let source = sheet.source();
    let mut css = String::with_capacity(source.len());
    let mut map = SourceMapBuilder::default();
    let mut cursor = 0usize;

    for (_, rule) in sheet.rules() {
        let span = rule.selector_span;

        let verbatim = &source[cursor..span.start_usize()];
        map.add_source(TextSize::from(cursor as u32), verbatim);
        css.push_str(verbatim);

        let original = span.slice(source);
        if rule.selector() == original {
            map.add_source(span.start, original);
        } else {
            map.add_transformed(span, rule.selector());
        }
        css.push_str(rule.selector());

        cursor = span.end_usize();
    }

    let rest = &source[cursor..];
    map.add_source(TextSize::from(cursor as u32), rest);
    css.push_str(rest);

    Printed {
        css,
        source_map: map.build(),
    }
}
