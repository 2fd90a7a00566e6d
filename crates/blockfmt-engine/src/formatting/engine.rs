use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::blocks::{AlignmentId, BlockId, BlockTree, IndentPolicy, SpaceProperty, WrapId, WrapType};
use crate::error::FormatError;
use crate::options::FormatOptions;
use crate::text::{FormattingModel, Span};

use super::{
    alignment::Alignment,
    apply,
    directives::Directives,
    gaps::GapTable,
    patch::FormatPatch,
    trail::{FrameState, Trail, Undo},
    wrap::Wrap,
};

/// Result of laying out a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Done,
    /// A wrap decided the line must break earlier, at `from`. The nearest
    /// enclosing block starting at or before `from` lays itself out again.
    Retry { from: usize },
}

/// Layout state of one block on the active path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) block: BlockId,
    pub(crate) alignment: Option<AlignmentId>,
    pub(crate) wrap: Option<WrapId>,
    pub(crate) current_indent: Option<usize>,
    pub(crate) first_element_processed: bool,
    pub(crate) at_line_start: bool,
}

impl Frame {
    pub(crate) fn new(block: BlockId, alignment: Option<AlignmentId>, wrap: Option<WrapId>) -> Self {
        Self {
            block,
            alignment,
            wrap,
            current_indent: None,
            first_element_processed: false,
            at_line_start: false,
        }
    }

    pub(crate) fn state(&self) -> FrameState {
        FrameState {
            current_indent: self.current_indent,
            first_element_processed: self.first_element_processed,
            at_line_start: self.at_line_start,
        }
    }

    pub(crate) fn restore(&mut self, state: FrameState) {
        self.current_indent = state.current_indent;
        self.first_element_processed = state.first_element_processed;
        self.at_line_start = state.at_line_start;
    }

    pub(crate) fn mark_processed(&mut self, column: usize, at_line_start: bool) {
        self.current_indent = Some(column);
        self.at_line_start = at_line_start;
        self.first_element_processed = true;
    }
}

/// Scalar pass state captured when a block is entered.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    trail: usize,
    column: usize,
    line_start: usize,
    at_document_start: bool,
}

/// Computes the whitespace between the blocks of a tree and writes it back
/// into the text.
///
/// A `Formatter` holds only settings; everything a pass mutates lives in the
/// pass itself, so one formatter can be reused for any number of trees.
///
/// ```rust
/// # use blockfmt_engine::{Formatter, FormatOptions};
/// # use blockfmt_engine::blocks::{BlockArenaBuilder, ChildSpacing, IndentPolicy, SpaceProperty};
/// # use blockfmt_engine::formatting::Directives;
/// # use blockfmt_engine::text::Document;
/// let mut doc = Document::from_text("{a b}");
/// let mut builder = BlockArenaBuilder::new();
/// let open = builder.leaf(0..1);
/// let a = builder.leaf(1..2);
/// let b = builder.leaf(3..4);
/// let close = builder.leaf(4..5);
/// let root = builder.composite(vec![open, a, b, close]);
/// builder
///     .set_child_indent(root, IndentPolicy::Normal)
///     .set_spacing(root, ChildSpacing::Uniform(SpaceProperty::line_break()));
/// let tree = builder.finish(root);
///
/// let formatter = Formatter::new(FormatOptions::default());
/// formatter.format(&tree, &mut Directives::new(), &mut doc).unwrap();
/// assert_eq!(doc.text(), "{\n    a\n    b\n    }");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Lay out `tree` and apply the resulting whitespace to `model`.
    ///
    /// Resets every alignment and wrap in `directives` first. The text is
    /// only touched once the layout has completed.
    pub fn format<T: BlockTree, M: FormattingModel>(
        &self,
        tree: &T,
        directives: &mut Directives,
        model: &mut M,
    ) -> Result<FormatPatch, FormatError> {
        directives.reset();
        let mut gaps = GapTable::build(tree, &*model)?;

        let retries = LayoutPass {
            tree,
            model: &*model,
            directives,
            options: &self.options,
            gaps: &mut gaps,
            stack: Vec::new(),
            trail: Trail::default(),
            aligned_on_line: HashSet::new(),
            column: 0,
            line_start: 0,
            at_document_start: true,
            retries: 0,
        }
        .run()?;

        let edits = apply::commit(&gaps, model);
        debug!(
            "formatted {} gaps: {} edits, {} re-walks",
            gaps.len(),
            edits.len(),
            retries
        );
        Ok(FormatPatch { edits, retries })
    }
}

/// State of one `format` call.
struct LayoutPass<'a, T, M> {
    tree: &'a T,
    model: &'a M,
    directives: &'a mut Directives,
    options: &'a FormatOptions,
    gaps: &'a mut GapTable,
    stack: Vec<Frame>,
    trail: Trail,
    /// Alignments whose column was already set on the current output line.
    aligned_on_line: HashSet<AlignmentId>,
    /// Column where the output currently stands.
    column: usize,
    /// Source offset of the first leaf on the current output line.
    line_start: usize,
    /// No leaf has been laid out yet.
    at_document_start: bool,
    retries: usize,
}

impl<T: BlockTree, M: FormattingModel> LayoutPass<'_, T, M> {
    fn run(mut self) -> Result<usize, FormatError> {
        let root = self.tree.root();
        if let Outcome::Retry { from } = self.process(root, None)? {
            warn!("wrap at offset {from} lies before the root block, keeping layout");
        }
        Ok(self.retries)
    }

    fn process(&mut self, block: BlockId, spacing: Option<SpaceProperty>) -> Result<Outcome, FormatError> {
        let tree = self.tree;
        let start = tree.text_range(block).start;
        loop {
            let checkpoint = self.checkpoint();
            let frame = self.enter(block)?;
            self.stack.push(frame);

            let children = tree.sub_blocks(block);
            let result = if children.is_empty() {
                self.process_leaf(spacing)
            } else {
                self.process_children(block, children, spacing)
            };
            self.stack.pop();

            match result? {
                Outcome::Retry { from } if start <= from => {
                    self.rollback(checkpoint);
                    self.retries += 1;
                    if self.retries > self.options.max_retries {
                        return Err(FormatError::RetryLimitExceeded {
                            retries: self.retries,
                            limit: self.options.max_retries,
                        });
                    }
                    debug!("re-walking {block:?} from offset {start} to break at {from}");
                }
                outcome => return Ok(outcome),
            }
        }
    }

    fn process_children(
        &mut self,
        parent: BlockId,
        children: &[BlockId],
        spacing: Option<SpaceProperty>,
    ) -> Result<Outcome, FormatError> {
        let mut previous = None;
        for &child in children {
            let child_spacing = match previous {
                None => spacing,
                Some(prev) => Some(self.tree.spacing(parent, prev, child)),
            };
            let outcome = self.process(child, child_spacing)?;
            if outcome != Outcome::Done {
                return Ok(outcome);
            }
            previous = Some(child);
        }
        Ok(Outcome::Done)
    }

    /// Decide the gap before one leaf and advance the column past it.
    fn process_leaf(&mut self, spacing: Option<SpaceProperty>) -> Result<Outcome, FormatError> {
        let Some(frame) = self.stack.last() else {
            return Ok(Outcome::Done);
        };
        let (block, alignment, wrap) = (frame.block, frame.alignment, frame.wrap);
        let range = self.tree.text_range(block);
        let Some(gap) = self.gaps.gap_of(block) else {
            return Ok(Outcome::Done);
        };
        let width = self.first_line_width(range);
        let Some(space) = self.gaps.space_mut(gap) else {
            return Ok(Outcome::Done);
        };

        space.arrange_line_feeds(spacing.as_ref());
        space.arrange_spaces(spacing.as_ref());
        let feeds_present = space.contains_line_feeds();
        let last_column = self.column + space.spaces() + width.saturating_sub(1);

        let wrap_kind = wrap.and_then(|w| self.directives.wrap(w)).map(Wrap::kind);
        let wrap_applies = !self.at_document_start
            && wrap
                .and_then(|w| self.directives.wrap(w))
                .is_some_and(|w| w.should_apply(last_column, self.options.right_margin));

        if wrap_applies || feeds_present {
            space.ensure_line_feed();
            if let Some(wrap) = wrap {
                let overflow = wrap_applies
                    && last_column >= self.options.right_margin
                    && matches!(wrap_kind, Some(WrapType::AsNeeded | WrapType::ChopIfNeeded));
                if let Some(from) = self.take_backtrack_entry(wrap, overflow) {
                    trace!("{block:?} at {}: backtracking to {from}", range.start);
                    return Ok(Outcome::Retry { from });
                }
            }
        } else if let Some(wrap) = wrap
            && wrap_kind == Some(WrapType::ChopIfNeeded)
            && !self.at_document_start
            && self
                .directives
                .wrap_mut(wrap)
                .is_some_and(|w| w.remember_entry(range.start))
        {
            self.trail.record(Undo::RememberedEntry { wrap });
        }

        let starts_line = self
            .gaps
            .space(gap)
            .is_some_and(|s| s.contains_line_feeds())
            || self.at_document_start;
        if starts_line {
            self.clear_line_alignments();
            let aligned = alignment
                .and_then(|a| self.directives.alignment(a))
                .and_then(Alignment::offset);
            let indent = match aligned {
                Some(column) => column,
                None => self.calculate_indent(),
            };
            if let Some(space) = self.gaps.space_mut(gap) {
                space.set_spaces(indent);
                self.column = space.spaces();
            }
            self.line_start = range.start;
            self.mark_first_element_processed(self.column, true);
        } else {
            self.column += self.gaps.space(gap).map_or(0, |s| s.spaces());
            self.mark_first_element_processed(self.column, false);
        }
        self.at_document_start = false;

        if let Some(alignment) = alignment {
            let indent = self
                .stack
                .last()
                .and_then(|f| f.current_indent)
                .unwrap_or(self.column);
            self.set_align_offset(alignment, indent);
        }

        trace!(
            "{block:?} at {}: {} feeds, column {}",
            range.start,
            self.gaps.space(gap).map_or(0, |s| s.line_feeds()),
            self.column
        );

        let first_line = self.model.line_number(range.start);
        let last_line = self.model.line_number(range.end);
        if last_line > first_line {
            self.clear_line_alignments();
            self.column = range.end - self.model.line_start_offset(last_line);
            self.line_start = range.end;
        } else {
            self.column += range.len();
        }
        Ok(Outcome::Done)
    }

    /// Pick the entry to break at: the wrap's own remembered entry, or on a
    /// margin overflow the earliest chop point on the current line.
    fn take_backtrack_entry(&mut self, wrap: WrapId, overflow: bool) -> Option<usize> {
        let own = self
            .directives
            .wrap(wrap)
            .and_then(Wrap::entry)
            .map(|entry| (wrap, entry));
        let on_line = if overflow {
            self.directives
                .remembered_entries()
                .filter(|&(_, entry)| entry >= self.line_start)
                .min_by_key(|&(_, entry)| entry)
        } else {
            None
        };

        let (chosen, _) = [own, on_line]
            .into_iter()
            .flatten()
            .min_by_key(|&(_, entry)| entry)?;
        self.directives.wrap_mut(chosen)?.take_entry()
    }

    /// Indent of the innermost ancestor that starts a line, plus what that
    /// ancestor adds for its children.
    fn calculate_indent(&self) -> usize {
        self.stack
            .iter()
            .filter_map(|frame| match frame.current_indent {
                Some(indent) if frame.at_line_start => Some(indent + self.child_indent(frame.block)),
                _ => None,
            })
            .last()
            .unwrap_or(0)
    }

    fn child_indent(&self, block: BlockId) -> usize {
        match self.tree.child_indent(block) {
            Some(IndentPolicy::Normal) => self.options.indent_size,
            Some(IndentPolicy::Label) => self.options.label_indent_size,
            Some(IndentPolicy::Continuation) | None => self.options.continuation_indent_size,
            Some(IndentPolicy::None) => 0,
        }
    }

    /// Give every frame that has not seen a leaf yet its baseline.
    fn mark_first_element_processed(&mut self, column: usize, at_line_start: bool) {
        for (index, frame) in self.stack.iter_mut().enumerate().rev() {
            if frame.first_element_processed {
                break;
            }
            self.trail.record(Undo::Frame {
                depth: index,
                previous: frame.state(),
            });
            frame.mark_processed(column, at_line_start);
        }
    }

    /// The first member of an alignment on each output line moves its column.
    fn set_align_offset(&mut self, alignment: AlignmentId, column: usize) {
        if self.aligned_on_line.contains(&alignment) {
            return;
        }
        let Some(group) = self.directives.alignment_mut(alignment) else {
            return;
        };
        let previous = group.offset();
        if group.set_offset(column) {
            self.trail.record(Undo::AlignmentOffset {
                alignment,
                previous,
            });
        }
        self.aligned_on_line.insert(alignment);
        self.trail.record(Undo::AlignedOnLine { alignment });
    }

    fn clear_line_alignments(&mut self) {
        if self.aligned_on_line.is_empty() {
            return;
        }
        let previous = self.aligned_on_line.drain().collect();
        self.trail.record(Undo::LineAlignmentsCleared { previous });
    }

    fn enter(&self, block: BlockId) -> Result<Frame, FormatError> {
        let mut alignment = self.tree.alignment(block);
        let mut wrap = self.tree.wrap(block);
        if let Some(id) = alignment
            && self.directives.alignment(id).is_none()
        {
            return Err(FormatError::UnknownAlignment {
                block,
                alignment: id,
            });
        }
        if let Some(id) = wrap
            && self.directives.wrap(id).is_none()
        {
            return Err(FormatError::UnknownWrap { block, wrap: id });
        }

        if let Some(parent) = self.stack.last()
            && !parent.first_element_processed
        {
            alignment = alignment.or(parent.alignment);
            wrap = wrap.or(parent.wrap);
        }
        Ok(Frame::new(block, alignment, wrap))
    }

    /// Width of the first line of a leaf's own text.
    fn first_line_width(&self, range: Span) -> usize {
        let first_line = self.model.line_number(range.start);
        if self.model.line_number(range.end) == first_line {
            return range.len();
        }
        self.model
            .line_start_offset(first_line + 1)
            .saturating_sub(range.start + 1)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            trail: self.trail.mark(),
            column: self.column,
            line_start: self.line_start,
            at_document_start: self.at_document_start,
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.trail.unwind(
            checkpoint.trail,
            &mut self.stack,
            self.directives,
            &mut self.aligned_on_line,
        );
        self.column = checkpoint.column;
        self.line_start = checkpoint.line_start;
        self.at_document_start = checkpoint.at_document_start;
    }
}
