/// Handle of a block inside a [`BlockTree`](super::BlockTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of an alignment group in a [`Directives`](crate::formatting::Directives) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlignmentId(pub(crate) usize);

/// Handle of a wrap directive in a [`Directives`](crate::formatting::Directives) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WrapId(pub(crate) usize);

/// How far a block pushes its children in when they start a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentPolicy {
    /// One regular indent step (`indent_size`).
    Normal,
    /// A continuation step (`continuation_indent_size`).
    Continuation,
    /// Label indent (`label_indent_size`).
    Label,
    /// Children line up with the block itself.
    None,
}

/// When a wrap directive forces a line break before its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapType {
    /// Never.
    None,
    /// Unconditionally.
    Always,
    /// Only where the line would pass the right margin.
    AsNeeded,
    /// Like `AsNeeded`, but an overflow anywhere on the line breaks at the
    /// first member of the wrap instead, and then every member.
    ChopIfNeeded,
}

/// Required whitespace between two adjacent blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceProperty {
    pub min_line_feeds: usize,
    pub max_line_feeds: usize,
    pub min_spaces: usize,
    pub max_spaces: usize,
    /// Allow more than one line feed (blank lines) up to `max_line_feeds`.
    pub keep_blank_lines: bool,
    /// Leave the original whitespace untouched.
    pub keep_as_is: bool,
}

impl SpaceProperty {
    /// Exactly `count` spaces on the same line.
    pub const fn spaces(count: usize) -> Self {
        Self {
            min_line_feeds: 0,
            max_line_feeds: 0,
            min_spaces: count,
            max_spaces: count,
            keep_blank_lines: false,
            keep_as_is: false,
        }
    }

    /// Exactly `count` spaces, or a line break where the original had one.
    pub const fn spaces_or_break(count: usize) -> Self {
        Self {
            min_line_feeds: 0,
            max_line_feeds: 1,
            min_spaces: count,
            max_spaces: count,
            keep_blank_lines: false,
            keep_as_is: false,
        }
    }

    /// Exactly one line feed.
    pub const fn line_break() -> Self {
        Self {
            min_line_feeds: 1,
            max_line_feeds: 1,
            min_spaces: 0,
            max_spaces: 0,
            keep_blank_lines: false,
            keep_as_is: false,
        }
    }

    /// At least one line feed, keeping up to `max_blank_lines` blank lines.
    pub const fn line_break_keeping(max_blank_lines: usize) -> Self {
        Self {
            min_line_feeds: 1,
            max_line_feeds: max_blank_lines + 1,
            min_spaces: 0,
            max_spaces: 0,
            keep_blank_lines: true,
            keep_as_is: false,
        }
    }

    /// Leave the gap exactly as written.
    pub const fn keep() -> Self {
        Self {
            min_line_feeds: 0,
            max_line_feeds: usize::MAX,
            min_spaces: 0,
            max_spaces: usize::MAX,
            keep_blank_lines: true,
            keep_as_is: true,
        }
    }
}
