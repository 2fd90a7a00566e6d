use serde::{Deserialize, Serialize};

/// Layout settings consumed by the formatter.
///
/// Columns and widths are measured in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Content reaching this column overflows the line.
    pub right_margin: usize,
    pub indent_size: usize,
    pub continuation_indent_size: usize,
    pub label_indent_size: usize,
    /// Upper bound on subtree re-walks in one pass.
    pub max_retries: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            right_margin: 120,
            indent_size: 4,
            continuation_indent_size: 8,
            label_indent_size: 0,
            max_retries: 10_000,
        }
    }
}
