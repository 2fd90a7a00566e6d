use std::borrow::Cow;
use std::ops::Range;

use xi_rope::Rope;

use crate::text::FormattingModel;

/// Rope-backed text buffer the formatter edits in place.
///
/// ## Storage
/// - **Single source of truth**: the whole text lives in one `xi_rope::Rope`
/// - **Lossless**: `to_bytes()` returns exactly what was loaded until an edit lands
/// - **Cheap line queries**: xi-rope keeps a line-break metric, so
///   `line_of_offset` / `offset_of_line` are O(log n)
///
/// ## Versioning
/// Every `replace_range` bumps `version`, which lets callers tell whether a
/// formatting pass changed anything.
///
/// ```rust
/// # use blockfmt_engine::text::{Document, FormattingModel};
/// let mut doc = Document::from_bytes(b"f(a,b)").unwrap();
/// doc.replace_range(4..4, " ");
/// assert_eq!(doc.text(), "f(a, b)");
/// assert_eq!(doc.version(), 1);
/// ```
#[derive(Clone)]
pub struct Document {
    /// xi-rope buffer containing the entire document as UTF-8
    pub(crate) buffer: Rope,
    /// Incremented on each edit
    pub(crate) version: u64,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            version: 0,
        }
    }

    /// Get the document's content as raw bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Slice the buffer to a cow string
    pub(crate) fn slice_to_cow(&self, range: Range<usize>) -> Cow<'_, str> {
        let doc_len = self.buffer.len();

        // Clamp range to document bounds to prevent xi-rope panic
        let start = range.start.min(doc_len);
        let end = range.end.min(doc_len).max(start);

        self.buffer.slice_to_cow(start..end)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.buffer.len())
            .field("version", &self.version)
            .finish()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Node doesn't implement PartialEq, compare content as strings
        self.buffer.to_string() == other.buffer.to_string() && self.version == other.version
    }
}

impl FormattingModel for Document {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn line_number(&self, offset: usize) -> usize {
        self.buffer.line_of_offset(offset.min(self.buffer.len()))
    }

    fn line_start_offset(&self, line: usize) -> usize {
        let last_line = self.buffer.line_of_offset(self.buffer.len());
        if line > last_line {
            return self.buffer.len();
        }
        self.buffer.offset_of_line(line)
    }

    fn text_in(&self, range: Range<usize>) -> Cow<'_, str> {
        self.slice_to_cow(range)
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let doc_len = self.buffer.len();
        let start = range.start.min(doc_len);
        let end = range.end.min(doc_len).max(start);
        self.buffer.edit(start..end, text);
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_from_bytes_valid_utf8() {
        let text = "call(a, b);\nnext();";
        let doc = Document::from_bytes(text.as_bytes()).expect("Should create document from valid UTF-8");

        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_document_from_bytes_invalid_utf8() {
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];

        let result = Document::from_bytes(&invalid_bytes);

        assert!(result.is_err());
    }

    #[test]
    fn test_document_with_unicode() {
        let text = "say(\"世界\", 🦀);";
        let doc = Document::from_bytes(text.as_bytes()).expect("Should handle Unicode");

        assert_eq!(doc.text(), text);
    }

    #[test]
    fn test_line_queries() {
        let doc = Document::from_text("ab\ncde\n\nf");

        assert_eq!(doc.line_number(0), 0);
        assert_eq!(doc.line_number(2), 0);
        assert_eq!(doc.line_number(3), 1);
        assert_eq!(doc.line_number(7), 2);
        assert_eq!(doc.line_number(8), 3);
        assert_eq!(doc.line_start_offset(0), 0);
        assert_eq!(doc.line_start_offset(1), 3);
        assert_eq!(doc.line_start_offset(2), 7);
        assert_eq!(doc.line_start_offset(3), 8);
    }

    #[test]
    fn test_line_queries_clamp_past_end() {
        let doc = Document::from_text("ab\ncd");

        assert_eq!(doc.line_number(100), 1);
        assert_eq!(doc.line_start_offset(9), 5);
    }

    #[test]
    fn test_replace_range_bumps_version() {
        let mut doc = Document::from_text("f(a,b)");

        doc.replace_range(4..4, " ");
        doc.replace_range(0..1, "g");

        assert_eq!(doc.text(), "g(a, b)");
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_no_xi_rope_panic_on_stale_ranges() {
        let mut doc = Document::from_text("short");

        assert_eq!(doc.text_in(3..50), "rt");
        assert_eq!(doc.text_in(40..50), "");

        doc.replace_range(4..99, "!");
        assert_eq!(doc.text(), "shor!");
    }
}
