use crate::blocks::SpaceProperty;
use crate::text::Span;

/// The gap before a block: its original text plus the line feeds and spaces
/// the formatter has decided on so far.
///
/// Arranging always starts again from the original counts, so a subtree that
/// gets re-walked after a wrap decision sees the same input as the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhiteSpace {
    range: Span,
    original: String,
    original_line_feeds: usize,
    original_spaces: usize,
    line_feeds: usize,
    spaces: usize,
    blank_lines_allowed: bool,
    read_only: bool,
    /// No rule has asked for canonical whitespace yet.
    as_written: bool,
    /// Line ending used when the gap is regenerated.
    crlf: bool,
}

impl WhiteSpace {
    /// Wrap the original text of `range`.
    ///
    /// Anything other than spaces, tabs and line breaks makes the gap
    /// read-only: it is committed verbatim.
    pub fn new(range: Span, text: &str) -> Self {
        let read_only = !text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
        let line_feeds = text.matches('\n').count();
        let last_line = text.rsplit('\n').next().unwrap_or("");
        let spaces = last_line.chars().filter(|&c| c != '\r').count();

        Self {
            range,
            original: text.to_owned(),
            original_line_feeds: line_feeds,
            original_spaces: spaces,
            line_feeds,
            spaces,
            blank_lines_allowed: line_feeds > 1,
            read_only,
            as_written: true,
            crlf: text.contains("\r\n"),
        }
    }

    /// Line ending for a gap that had no line break of its own.
    pub fn with_default_crlf(mut self, crlf: bool) -> Self {
        if !self.original.contains('\n') {
            self.crlf = crlf;
        }
        self
    }

    pub fn range(&self) -> Span {
        self.range
    }

    pub fn original_text(&self) -> &str {
        &self.original
    }

    pub fn line_feeds(&self) -> usize {
        self.line_feeds
    }

    pub fn spaces(&self) -> usize {
        self.spaces
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn blank_lines_allowed(&self) -> bool {
        self.blank_lines_allowed
    }

    /// Recompute the line feeds for `spacing`, starting from the original
    /// count. Spaces go back to the original count as well.
    pub fn arrange_line_feeds(&mut self, spacing: Option<&SpaceProperty>) {
        if self.read_only {
            return;
        }
        self.spaces = self.original_spaces;

        let Some(spacing) = spacing.filter(|s| !s.keep_as_is) else {
            self.line_feeds = self.original_line_feeds;
            self.blank_lines_allowed = self.original_line_feeds > 1;
            self.as_written = true;
            return;
        };
        self.as_written = false;

        let mut feeds = self
            .original_line_feeds
            .min(spacing.max_line_feeds)
            .max(spacing.min_line_feeds);
        if !spacing.keep_blank_lines {
            feeds = feeds.min(spacing.min_line_feeds.max(1));
        }
        self.line_feeds = feeds;
        self.blank_lines_allowed = spacing.keep_blank_lines;
    }

    /// Make sure the gap breaks the line.
    pub fn ensure_line_feed(&mut self) {
        if !self.read_only && self.line_feeds == 0 {
            self.line_feeds = 1;
        }
    }

    pub fn contains_line_feeds(&self) -> bool {
        self.line_feeds > 0
    }

    /// Clamp the spaces of a single-line gap into the rule's range.
    pub fn arrange_spaces(&mut self, spacing: Option<&SpaceProperty>) {
        if self.read_only || self.contains_line_feeds() {
            return;
        }
        if let Some(spacing) = spacing.filter(|s| !s.keep_as_is) {
            let max = spacing.max_spaces.max(spacing.min_spaces);
            self.spaces = self.spaces.clamp(spacing.min_spaces, max);
        }
    }

    /// Indentation for a gap that starts a line.
    pub fn set_spaces(&mut self, spaces: usize) {
        if !self.read_only {
            self.spaces = spaces;
        }
    }

    /// The final text of the gap.
    ///
    /// A gap kept as written whose counts layout left alone is returned
    /// verbatim, tabs and carriage returns included. Otherwise line feeds
    /// follow the gap's original line ending.
    pub fn generate_text(&self) -> String {
        if self.read_only || self.kept_verbatim() {
            return self.original.clone();
        }
        let line_break = if self.crlf { "\r\n" } else { "\n" };
        let mut text = String::with_capacity(self.line_feeds * line_break.len() + self.spaces);
        text.extend(std::iter::repeat_n(line_break, self.line_feeds));
        text.extend(std::iter::repeat_n(' ', self.spaces));
        text
    }

    fn kept_verbatim(&self) -> bool {
        self.as_written
            && self.line_feeds == self.original_line_feeds
            && self.spaces == self.original_spaces
    }

    /// True when committing would not change the text.
    pub fn is_unchanged(&self) -> bool {
        self.read_only || self.generate_text() == self.original
    }
}
