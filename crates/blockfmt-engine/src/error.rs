use thiserror::Error;

use crate::blocks::{AlignmentId, BlockId, WrapId};
use crate::text::Span;

/// Caller contract violations detected while formatting.
///
/// The retry signal used for wrap backtracking is not an error and never
/// shows up here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("block {block:?} at {child:?} lies outside its parent {parent:?}")]
    ChildOutsideParent {
        block: BlockId,
        child: Span,
        parent: Span,
    },

    #[error("block {block:?} at {range:?} overlaps text already covered up to offset {covered_to}")]
    OverlappingSiblings {
        block: BlockId,
        range: Span,
        covered_to: usize,
    },

    #[error("block {block:?} at {range:?} is outside the document (length {len})")]
    RangeOutOfBounds {
        block: BlockId,
        range: Span,
        len: usize,
    },

    #[error("block {block:?} refers to unknown alignment {alignment:?}")]
    UnknownAlignment {
        block: BlockId,
        alignment: AlignmentId,
    },

    #[error("block {block:?} refers to unknown wrap {wrap:?}")]
    UnknownWrap { block: BlockId, wrap: WrapId },

    #[error("gave up after {retries} re-walks (limit {limit})")]
    RetryLimitExceeded { retries: usize, limit: usize },
}
