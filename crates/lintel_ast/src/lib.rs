//! # lintel_ast
//!
//! Source location types for Lintel.
//!
//! Lintel does not own an AST format: parsing and traversal belong to the
//! language plugins. This crate only provides the shared vocabulary for
//! pointing into source text.
//!
//! - [`Span`]: raw byte offsets, as emitted by rules
//! - [`Position`] and [`Range`]: `(line, column, raw)` triples, as stored in
//!   normalized reports
//! - [`SourceText`]: the text of a file plus a line index used for converting
//!   spans into ranges
//!
//! ## Example
//!
//! ```rust
//! use lintel_ast::{SourceText, Span};
//!
//! let source = SourceText::new("const a = 1;\ndebugger;");
//! let range = source.range_of(Span::new(13, 21));
//!
//! assert_eq!(range.begin.line, 1);
//! assert_eq!(range.begin.column, 0);
//! ```

mod source;
mod span;

pub use source::SourceText;
pub use span::{Position, Range, Span};
