//! # Text Layer
//!
//! The layout engine never touches characters directly. Everything it needs
//! from the underlying buffer goes through [`FormattingModel`]:
//!
//! - line queries (`line_number`, `line_start_offset`) used to measure how far
//!   a block's own text advances the running column
//! - `text_in` to read the original whitespace between blocks
//! - `replace_range` to commit the final whitespace
//!
//! [`Document`] is the rope-backed implementation shipped with the engine.

pub mod document;
pub mod span;

use std::borrow::Cow;
use std::ops::Range;

pub use document::Document;
pub use span::Span;

/// The text buffer collaborator consumed by the formatter.
///
/// Offsets are byte offsets. Line numbers are 0-based.
pub trait FormattingModel {
    /// Total length of the text in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Line containing `offset`. Offsets past the end map to the last line.
    fn line_number(&self, offset: usize) -> usize;

    /// Offset of the first byte of `line`.
    fn line_start_offset(&self, line: usize) -> usize;

    /// The text in `range`, clamped to the buffer.
    fn text_in(&self, range: Range<usize>) -> Cow<'_, str>;

    /// Replace `range` with `text`.
    fn replace_range(&mut self, range: Range<usize>, text: &str);
}
