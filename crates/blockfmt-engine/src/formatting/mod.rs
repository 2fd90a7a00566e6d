//! # Layout Engine
//!
//! Turns a block tree into whitespace edits.
//!
//! ## How a pass works
//!
//! 1. Every gap between blocks is captured once as a [`WhiteSpace`]. A
//!    composite block and its first descendant share their gap.
//! 2. The tree is walked depth first. Each block on the active path gets a
//!    frame recording its indent baseline and whether it started a line.
//!    A block that declares no alignment or wrap inherits its parent's while
//!    the parent has not laid out anything yet.
//! 3. At every leaf the gap before it is decided: line feeds from the spacing
//!    rule, a forced break if the leaf's [`Wrap`] applies, then indentation
//!    from the enclosing frames or from the leaf's [`Alignment`].
//! 4. A `ChopIfNeeded` wrap remembers where it could have broken. If the line
//!    later overflows the right margin, the walk backs up to the nearest
//!    block at or before that point, undoes what it recorded since entering
//!    it, and lays it out again with the break in place.
//! 5. Once the walk completes, every changed gap is written back left to
//!    right and the applied edits are returned as a [`FormatPatch`].

pub mod alignment;
mod apply;
pub mod directives;
mod engine;
mod gaps;
pub mod patch;
mod trail;
pub mod whitespace;
pub mod wrap;

pub use alignment::Alignment;
pub use directives::Directives;
pub use engine::Formatter;
pub use patch::{AppliedEdit, FormatPatch};
pub use whitespace::WhiteSpace;
pub use wrap::Wrap;
