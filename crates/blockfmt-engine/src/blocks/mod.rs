//! # Block Trees
//!
//! The formatter consumes a hierarchical decomposition of the text into
//! nested blocks. Building that tree is the front end's job; the engine only
//! reads it through the [`BlockTree`] trait.
//!
//! ## Modules
//!
//! - **`types`**: handles (`BlockId`, `AlignmentId`, `WrapId`) and the
//!   directive enums (`IndentPolicy`, `WrapType`, `SpaceProperty`)
//! - **`arena`**: `BlockArena`, a ready-made tree stored in a flat vector
//!
//! ## Key Invariants
//!
//! - Children lie inside their parent's range
//! - Sibling ranges are non-overlapping and strictly increasing
//! - A composite block's first child shares the whitespace gap before the
//!   composite itself

pub mod arena;
pub mod types;

pub use arena::{BlockArena, BlockArenaBuilder, ChildSpacing};
pub use types::{AlignmentId, BlockId, IndentPolicy, SpaceProperty, WrapId, WrapType};

use crate::text::Span;

/// Read-only view of a block tree.
pub trait BlockTree {
    fn root(&self) -> BlockId;

    /// Children in document order. Empty for leaves.
    fn sub_blocks(&self, block: BlockId) -> &[BlockId];

    fn text_range(&self, block: BlockId) -> Span;

    fn alignment(&self, block: BlockId) -> Option<AlignmentId>;

    fn wrap(&self, block: BlockId) -> Option<WrapId>;

    /// Indent applied to children that start a line. `None` means undeclared,
    /// which the formatter treats as a continuation indent.
    fn child_indent(&self, block: BlockId) -> Option<IndentPolicy>;

    /// Whitespace required between two adjacent children of `parent`.
    fn spacing(&self, parent: BlockId, prev: BlockId, next: BlockId) -> SpaceProperty;
}
