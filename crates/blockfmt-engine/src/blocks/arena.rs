use crate::text::Span;

use super::{
    BlockTree,
    types::{AlignmentId, BlockId, IndentPolicy, SpaceProperty, WrapId},
};

/// Spacing rule a composite block applies between its children.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSpacing {
    /// The same rule between every pair of children.
    Uniform(SpaceProperty),
    /// One rule per gap: entry `i` sits between child `i` and child `i + 1`.
    /// Missing entries keep the original whitespace.
    PerGap(Vec<SpaceProperty>),
}

impl Default for ChildSpacing {
    fn default() -> Self {
        ChildSpacing::Uniform(SpaceProperty::keep())
    }
}

impl ChildSpacing {
    fn between(&self, gap_index: usize) -> SpaceProperty {
        match self {
            ChildSpacing::Uniform(space) => *space,
            ChildSpacing::PerGap(spaces) => spaces
                .get(gap_index)
                .copied()
                .unwrap_or_else(SpaceProperty::keep),
        }
    }
}

/// A block stored in a [`BlockArena`].
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub range: Span,
    pub children: Vec<BlockId>,
    pub alignment: Option<AlignmentId>,
    pub wrap: Option<WrapId>,
    pub child_indent: Option<IndentPolicy>,
    pub spacing: ChildSpacing,
    /// Position among the parent's children, set when the parent is built.
    index_in_parent: usize,
}

impl BlockNode {
    fn new(range: Span, children: Vec<BlockId>) -> Self {
        Self {
            range,
            children,
            alignment: None,
            wrap: None,
            child_indent: None,
            spacing: ChildSpacing::default(),
            index_in_parent: 0,
        }
    }
}

/// A block tree stored as a flat vector of nodes addressed by [`BlockId`].
#[derive(Debug, Clone)]
pub struct BlockArena {
    nodes: Vec<BlockNode>,
    root: BlockId,
}

impl BlockArena {
    pub fn node(&self, block: BlockId) -> Option<&BlockNode> {
        self.nodes.get(block.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl BlockTree for BlockArena {
    fn root(&self) -> BlockId {
        self.root
    }

    fn sub_blocks(&self, block: BlockId) -> &[BlockId] {
        self.node(block)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn text_range(&self, block: BlockId) -> Span {
        self.node(block).map(|n| n.range).unwrap_or_default()
    }

    fn alignment(&self, block: BlockId) -> Option<AlignmentId> {
        self.node(block).and_then(|n| n.alignment)
    }

    fn wrap(&self, block: BlockId) -> Option<WrapId> {
        self.node(block).and_then(|n| n.wrap)
    }

    fn child_indent(&self, block: BlockId) -> Option<IndentPolicy> {
        self.node(block).and_then(|n| n.child_indent)
    }

    fn spacing(&self, parent: BlockId, _prev: BlockId, next: BlockId) -> SpaceProperty {
        let Some(node) = self.node(parent) else {
            return SpaceProperty::keep();
        };
        let recorded = self
            .node(next)
            .map(|n| n.index_in_parent)
            .filter(|&index| node.children.get(index) == Some(&next));
        // A block listed under more than one parent only remembers the last.
        let index = recorded.or_else(|| node.children.iter().position(|&c| c == next));
        match index {
            Some(index) if index > 0 => node.spacing.between(index - 1),
            _ => SpaceProperty::keep(),
        }
    }
}

/// Builds a [`BlockArena`] bottom-up: leaves first, then the composites that
/// contain them.
///
/// ```rust
/// # use blockfmt_engine::blocks::{BlockArenaBuilder, BlockTree, ChildSpacing, IndentPolicy, SpaceProperty};
/// let mut builder = BlockArenaBuilder::new();
/// let a = builder.leaf(0..1);
/// let b = builder.leaf(2..3);
/// let root = builder.composite(vec![a, b]);
/// builder
///     .set_child_indent(root, IndentPolicy::Normal)
///     .set_spacing(root, ChildSpacing::Uniform(SpaceProperty::line_break()));
/// let tree = builder.finish(root);
/// assert_eq!(tree.text_range(root).as_range(), 0..3);
/// ```
#[derive(Debug, Default)]
pub struct BlockArenaBuilder {
    nodes: Vec<BlockNode>,
}

impl BlockArenaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, range: impl Into<Span>) -> BlockId {
        self.push(BlockNode::new(range.into(), Vec::new()))
    }

    /// A composite spanning from its first child's start to its last child's end.
    pub fn composite(&mut self, children: Vec<BlockId>) -> BlockId {
        let start = children
            .first()
            .and_then(|c| self.nodes.get(c.0))
            .map_or(0, |n| n.range.start);
        let end = children
            .last()
            .and_then(|c| self.nodes.get(c.0))
            .map_or(start, |n| n.range.end);
        for (index, child) in children.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(child.0) {
                node.index_in_parent = index;
            }
        }
        self.push(BlockNode::new(Span::new(start, end), children))
    }

    pub fn set_alignment(&mut self, block: BlockId, alignment: AlignmentId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(block.0) {
            node.alignment = Some(alignment);
        }
        self
    }

    pub fn set_wrap(&mut self, block: BlockId, wrap: WrapId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(block.0) {
            node.wrap = Some(wrap);
        }
        self
    }

    pub fn set_child_indent(&mut self, block: BlockId, indent: IndentPolicy) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(block.0) {
            node.child_indent = Some(indent);
        }
        self
    }

    pub fn set_spacing(&mut self, block: BlockId, spacing: ChildSpacing) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(block.0) {
            node.spacing = spacing;
        }
        self
    }

    pub fn finish(self, root: BlockId) -> BlockArena {
        BlockArena {
            nodes: self.nodes,
            root,
        }
    }

    fn push(&mut self, node: BlockNode) -> BlockId {
        self.nodes.push(node);
        BlockId(self.nodes.len() - 1)
    }
}
