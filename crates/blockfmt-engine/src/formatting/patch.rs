use crate::text::Span;

/// One whitespace replacement made while committing a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    /// Range in the text as it was before formatting.
    pub original: Span,
    /// Range that was replaced, shifted by the edits before it.
    pub mapped: Span,
    pub text: String,
}

/// Result of a `format` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatPatch {
    pub edits: Vec<AppliedEdit>,
    /// Number of subtree re-walks caused by wrap backtracking.
    pub retries: usize,
}

impl FormatPatch {
    pub fn changed(&self) -> bool {
        !self.edits.is_empty()
    }
}
