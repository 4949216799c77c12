//! Mappings from printed output back to the original stylesheet.

use crate::span::{ByteOffset, Span};
use text_size::TextSize;

/// One generated range and the original range it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The span in the printed output.
    pub generated: Span,
    /// The span in the original source.
    pub original: Span,
}

impl Mapping {
    /// Whether the generated text was copied verbatim from the original.
    pub fn is_verbatim(&self) -> bool {
        self.generated.len() == self.original.len()
    }
}

/// Position mappings for a printed stylesheet, sorted by generated offset.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Creates a source map builder.
    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::default()
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if there are no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns an iterator over all mappings.
    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Finds the original offset for a generated offset.
    ///
    /// Offsets inside a rewritten selector map to the start of the original
    /// selector, since the two texts have no character correspondence.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.start.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };
        let mapping = self.mappings.get(idx).filter(|m| m.generated.contains(generated))?;

        if mapping.is_verbatim() {
            let delta = generated - mapping.generated.start;
            Some(mapping.original.start + delta)
        } else {
            Some(mapping.original.start)
        }
    }

    /// Finds the generated offset for an original offset.
    pub fn generated_position(&self, original: ByteOffset) -> Option<ByteOffset> {
        let mapping = self.mappings.iter().find(|m| m.original.contains(original))?;

        if mapping.is_verbatim() {
            let delta = original - mapping.original.start;
            Some(mapping.generated.start + delta)
        } else {
            Some(mapping.generated.start)
        }
    }
}

/// Accumulates mappings while output is written front to back.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    /// Returns the current generated offset.
    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Records text copied unchanged from `original_start`.
    pub fn add_source(&mut self, original_start: ByteOffset, text: &str) {
        if text.is_empty() {
            return;
        }
        let len = TextSize::from(text.len() as u32);
        self.push(Span::new(original_start, original_start + len), len);
    }

    /// Records text that replaces the original span.
    pub fn add_transformed(&mut self, original: Span, generated_text: &str) {
        let len = TextSize::from(generated_text.len() as u32);
        self.push(original, len);
    }

    fn push(&mut self, original: Span, len: TextSize) {
        let start = self.generated_offset;
        self.generated_offset += len;
        if len == TextSize::from(0) {
            return;
        }
        self.mappings.push(Mapping {
            generated: Span::new(start, self.generated_offset),
            original,
        });
    }

    /// Finishes the map.
    pub fn build(self) -> SourceMap {
        SourceMap {
            mappings: self.mappings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_and_transformed() {
        // ".a {}" where ".a" became ".ns .a"
        let mut builder = SourceMap::builder();
        builder.add_transformed(Span::from_usize(0, 2), ".ns .a");
        builder.add_source(TextSize::from(2), " {}");
        let map = builder.build();

        assert_eq!(map.len(), 2);
        assert_eq!(map.original_position(TextSize::from(4)), Some(TextSize::from(0)));
        assert_eq!(map.original_position(TextSize::from(7)), Some(TextSize::from(3)));
        assert_eq!(map.generated_position(TextSize::from(3)), Some(TextSize::from(7)));
        assert_eq!(map.original_position(TextSize::from(9)), None);
    }

    #[test]
    fn test_empty_segments_are_not_recorded() {
        let mut builder = SourceMap::builder();
        builder.add_source(TextSize::from(0), "");
        assert!(builder.build().is_empty());
    }
}
