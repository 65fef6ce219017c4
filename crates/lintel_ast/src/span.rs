//! Span and position types for source locations.
//!
//! Rules and language plugins address source text with raw byte offsets
//! ([`Span`]). Reports are normalized into [`Range`]s of [`Position`]s, which
//! carry the line and column alongside the raw offset.

use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Lines and columns are 0-indexed, following the TypeScript compiler API
/// conventions. Columns count UTF-16 code units, `raw` counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
    /// Byte offset from the start of the source.
    pub raw: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32, raw: u32) -> Self {
        Self { line, column, raw }
    }
}

/// A span representing a range in source text.
///
/// Uses byte offsets (0-indexed) for efficient slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub begin: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.begin
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.begin <= offset && offset < self.end
    }

    /// Returns true if the two spans share at least one byte, or if an empty
    /// span sits strictly inside the other one.
    #[inline]
    pub const fn overlaps(&self, other: &Span) -> bool {
        !(self.end <= other.begin || self.begin >= other.end)
    }
}

/// A resolved range of positions, as stored in normalized reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    /// Start position.
    pub begin: Position,
    /// End position.
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    #[inline]
    pub const fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    /// Returns the raw byte span this range covers.
    #[inline]
    pub const fn span(&self) -> Span {
        Span::new(self.begin.raw, self.end.raw)
    }
}
