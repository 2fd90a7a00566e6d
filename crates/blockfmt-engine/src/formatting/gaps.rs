use std::collections::HashMap;

use crate::blocks::{BlockId, BlockTree};
use crate::error::FormatError;
use crate::text::{FormattingModel, Span};

use super::whitespace::WhiteSpace;

/// Every whitespace gap of a tree, in document order, plus the gap each block
/// starts after.
///
/// A composite block and its first descendant start at the same offset and
/// share one gap, so `order` may list the same gap for several consecutive
/// blocks.
#[derive(Debug)]
pub(crate) struct GapTable {
    spaces: Vec<WhiteSpace>,
    by_block: HashMap<BlockId, usize>,
    order: Vec<(BlockId, usize)>,
}

impl GapTable {
    /// Walk the tree once, checking its shape and capturing the original
    /// whitespace before every block.
    pub(crate) fn build<T: BlockTree, M: FormattingModel>(
        tree: &T,
        model: &M,
    ) -> Result<Self, FormatError> {
        let root = tree.root();
        let range = tree.text_range(root);
        if range.start > range.end || range.end > model.len() {
            return Err(FormatError::RangeOutOfBounds {
                block: root,
                range,
                len: model.len(),
            });
        }

        let mut builder = GapBuilder {
            tree,
            model,
            crlf: uses_crlf(model),
            covered_to: 0,
            pending: None,
            table: GapTable {
                spaces: Vec::new(),
                by_block: HashMap::new(),
                order: Vec::new(),
            },
        };
        builder.visit(root)?;
        Ok(builder.table)
    }

    pub(crate) fn gap_of(&self, block: BlockId) -> Option<usize> {
        self.by_block.get(&block).copied()
    }

    pub(crate) fn space(&self, gap: usize) -> Option<&WhiteSpace> {
        self.spaces.get(gap)
    }

    pub(crate) fn space_mut(&mut self, gap: usize) -> Option<&mut WhiteSpace> {
        self.spaces.get_mut(gap)
    }

    pub(crate) fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Gaps in block order with consecutive duplicates removed.
    pub(crate) fn commit_order(&self) -> impl Iterator<Item = usize> + '_ {
        let mut previous = None;
        self.order.iter().filter_map(move |&(_, gap)| {
            if previous == Some(gap) {
                return None;
            }
            previous = Some(gap);
            Some(gap)
        })
    }
}

/// Line ending of the first line break, used for gaps that had none.
fn uses_crlf<M: FormattingModel>(model: &M) -> bool {
    let first_break = model.line_start_offset(1);
    model.text_in(first_break.saturating_sub(2)..first_break) == "\r\n"
}

struct GapBuilder<'a, T, M> {
    tree: &'a T,
    model: &'a M,
    /// The document's first line ends in `\r\n`.
    crlf: bool,
    /// End of the last leaf visited.
    covered_to: usize,
    /// Start offset and gap of the most recent block with no leaf after it yet.
    pending: Option<(usize, usize)>,
    table: GapTable,
}

impl<T: BlockTree, M: FormattingModel> GapBuilder<'_, T, M> {
    fn visit(&mut self, block: BlockId) -> Result<(), FormatError> {
        let range = self.tree.text_range(block);

        let gap = match self.pending {
            Some((start, gap)) if start == range.start => gap,
            _ => self.open_gap(block, range)?,
        };
        self.table.by_block.insert(block, gap);
        self.table.order.push((block, gap));

        let children = self.tree.sub_blocks(block);
        if children.is_empty() {
            self.covered_to = range.end;
            self.pending = None;
            return Ok(());
        }

        let mut previous_end = range.start;
        for &child in children {
            let child_range = self.tree.text_range(child);
            if child_range.start > child_range.end || !range.contains_span(child_range) {
                return Err(FormatError::ChildOutsideParent {
                    block: child,
                    child: child_range,
                    parent: range,
                });
            }
            if child_range.start < previous_end {
                return Err(FormatError::OverlappingSiblings {
                    block: child,
                    range: child_range,
                    covered_to: previous_end,
                });
            }
            self.visit(child)?;
            previous_end = child_range.end;
        }
        Ok(())
    }

    fn open_gap(&mut self, block: BlockId, range: Span) -> Result<usize, FormatError> {
        if range.start < self.covered_to {
            return Err(FormatError::OverlappingSiblings {
                block,
                range,
                covered_to: self.covered_to,
            });
        }
        let gap_range = Span::new(self.covered_to, range.start);
        let text = self.model.text_in(gap_range.as_range());
        self.table
            .spaces
            .push(WhiteSpace::new(gap_range, &text).with_default_crlf(self.crlf));
        let gap = self.table.spaces.len() - 1;
        self.pending = Some((range.start, gap));
        Ok(gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockArenaBuilder;
    use crate::text::Document;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_child_shares_parent_gap() {
        let doc = Document::from_text("  ab cd");
        let mut builder = BlockArenaBuilder::new();
        let a = builder.leaf(2..4);
        let c = builder.leaf(5..7);
        let root = builder.composite(vec![a, c]);
        let tree = builder.finish(root);

        let table = GapTable::build(&tree, &doc).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.gap_of(root), table.gap_of(a));
        assert_ne!(table.gap_of(a), table.gap_of(c));
        assert_eq!(table.commit_order().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(table.space(0).unwrap().range(), Span::new(0, 2));
        assert_eq!(table.space(1).unwrap().original_text(), " ");
    }

    #[test]
    fn nested_first_children_share_one_gap() {
        let doc = Document::from_text("x\n  yz");
        let mut builder = BlockArenaBuilder::new();
        let x = builder.leaf(0..1);
        let y = builder.leaf(4..5);
        let z = builder.leaf(5..6);
        let inner = builder.composite(vec![y, z]);
        let outer = builder.composite(vec![inner]);
        let root = builder.composite(vec![x, outer]);
        let tree = builder.finish(root);

        let table = GapTable::build(&tree, &doc).unwrap();

        assert_eq!(table.gap_of(outer), table.gap_of(y));
        assert_eq!(table.gap_of(inner), table.gap_of(y));
        assert_eq!(table.space(table.gap_of(y).unwrap()).unwrap().original_text(), "\n  ");
        assert_eq!(table.space(table.gap_of(z).unwrap()).unwrap().range(), Span::new(5, 5));
    }

    #[test]
    fn line_ending_comes_from_the_first_break() {
        assert!(uses_crlf(&Document::from_text("a\r\nb\nc")));
        assert!(uses_crlf(&Document::from_text("a\r\n")));
        assert!(!uses_crlf(&Document::from_text("a\nb\r\nc")));
        assert!(!uses_crlf(&Document::from_text("a\r")));
        assert!(!uses_crlf(&Document::from_text("")));
    }

    #[test]
    fn overlapping_siblings_are_rejected() {
        let doc = Document::from_text("abcdef");
        let mut builder = BlockArenaBuilder::new();
        let a = builder.leaf(0..4);
        let b = builder.leaf(2..6);
        let root = builder.composite(vec![a, b]);
        let tree = builder.finish(root);

        let err = GapTable::build(&tree, &doc).unwrap_err();

        assert!(matches!(err, FormatError::OverlappingSiblings { covered_to: 4, .. }));
    }

    #[test]
    fn range_past_document_end_is_rejected() {
        let doc = Document::from_text("ab");
        let mut builder = BlockArenaBuilder::new();
        let root = builder.leaf(0..5);
        let tree = builder.finish(root);

        let err = GapTable::build(&tree, &doc).unwrap_err();

        assert_eq!(
            err,
            FormatError::RangeOutOfBounds {
                block: root,
                range: Span::new(0, 5),
                len: 2
            }
        );
    }
}
