pub mod blocks;
pub mod error;
pub mod formatting;
pub mod options;
pub mod text;

// Re-export key types for easier usage
pub use blocks::{BlockArena, BlockArenaBuilder, BlockTree};
pub use error::FormatError;
pub use formatting::{Directives, FormatPatch, Formatter};
pub use options::FormatOptions;
pub use text::{Document, FormattingModel, Span};
