//! Source text with a precomputed line index.

use crate::{Position, Range, Span};

/// Source text of a single file, indexed by line for offset lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<u32>,
}

impl SourceText {
    /// Creates a new source text and builds its line index.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );

        Self { text, line_starts }
    }

    /// Returns the full text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the 0-indexed line containing the given byte offset.
    ///
    /// Offsets past the end of the text resolve to the last line.
    pub fn line_of(&self, offset: u32) -> u32 {
        let offset = offset.min(self.text.len() as u32);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(next) => next as u32 - 1,
        }
    }

    /// Converts a raw byte offset into a full position.
    ///
    /// The offset is clamped to the text length and moved back to the nearest
    /// character boundary. Columns count UTF-16 code units.
    pub fn position_at(&self, offset: u32) -> Position {
        let mut raw = (offset as usize).min(self.text.len());
        while !self.text.is_char_boundary(raw) {
            raw -= 1;
        }

        let line = self.line_of(raw as u32);
        let line_start = self.line_starts[line as usize] as usize;
        let column = self.text[line_start..raw].encode_utf16().count() as u32;

        Position::new(line, column, raw as u32)
    }

    /// Converts a byte span into a range of positions.
    pub fn range_of(&self, span: Span) -> Range {
        Range::new(self.position_at(span.begin), self.position_at(span.end))
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_index() {
        let source = SourceText::new("let a;\nlet b;\n\nlet c;");
        assert_eq!(source.line_count(), 4);
        assert_eq!(source.line_of(0), 0);
        assert_eq!(source.line_of(6), 0);
        assert_eq!(source.line_of(7), 1);
        assert_eq!(source.line_of(14), 2);
        assert_eq!(source.line_of(15), 3);
    }

    #[test]
    fn test_position_at() {
        let source = SourceText::new("let a;\nlet b;");
        assert_eq!(source.position_at(0), Position::new(0, 0, 0));
        assert_eq!(source.position_at(4), Position::new(0, 4, 4));
        assert_eq!(source.position_at(11), Position::new(1, 4, 11));
    }

    #[test]
    fn test_position_at_clamps_past_end() {
        let source = SourceText::new("abc");
        assert_eq!(source.position_at(100), Position::new(0, 3, 3));
    }

    #[test]
    fn test_position_counts_characters_in_columns() {
        // "é" is two bytes.
        let source = SourceText::new("é = 1;");
        assert_eq!(source.position_at(2), Position::new(0, 1, 2));
        // Offset inside the multi-byte character snaps back to its start.
        assert_eq!(source.position_at(1), Position::new(0, 0, 0));
    }

    #[test]
    fn test_columns_count_utf16_code_units() {
        // "😀" is four bytes and two UTF-16 code units.
        let source = SourceText::new("s = \"😀\";");
        assert_eq!(source.position_at(5), Position::new(0, 5, 5));
        assert_eq!(source.position_at(9), Position::new(0, 7, 9));
    }

    #[test]
    fn test_range_of() {
        let source = SourceText::new("foo\nbar baz");
        let range = source.range_of(Span::new(8, 11));
        assert_eq!(range.begin, Position::new(1, 4, 8));
        assert_eq!(range.end, Position::new(1, 7, 11));
    }

    #[test]
    fn test_empty_source() {
        let source = SourceText::new("");
        assert_eq!(source.line_count(), 1);
        assert_eq!(source.position_at(0), Position::new(0, 0, 0));
    }
}
