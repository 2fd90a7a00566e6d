//! # Parser - Block Tree Construction
//!
//! A recursive-descent parser over the significant tokens of a file. Instead
//! of a syntax tree it builds the [`BlockArena`] the formatter walks, together
//! with the [`Directives`] (wraps and alignments) its blocks refer to.
//!
//! Trivia never becomes a block. Whatever sits between two significant tokens
//! (spaces, line breaks, comments) is the gap the formatter rewrites.
//!
//! ## Block shapes
//!
//! ```text
//! FILE       statements, one per line
//! STATEMENT  [target, "=", CALL, ";"]  or  [CALL, ";"]
//! CALL       [name, "(", arg..., ")"]
//! ARG        [value, ","]   (an argument without a comma is just its value)
//! ```
//!
//! The arguments of one call share a `ChopIfNeeded` wrap and an alignment:
//! they stay on one line while it fits, otherwise each starts its own line
//! at the column of the first.
//!
//! ## Module Structure
//!
//! - [`grammar`] - Grammar rules (file, statement, call, argument)

mod grammar;

use std::ops::Range;

use blockfmt_engine::blocks::{BlockArena, BlockArenaBuilder, BlockId};
use blockfmt_engine::formatting::Directives;

use crate::lexer::Token;
use crate::syntax_kind::SyntaxKind;
use crate::{Parsed, SyntaxError};

/// The parser state machine.
///
/// Holds the significant tokens, the current position, and the tree under
/// construction. Grammar functions receive `&mut Parser` and use its methods
/// to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens into leaf blocks: `bump()`, `eat()`, `expect()`
/// - Build structure: `node()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    source_len: usize,
    builder: BlockArenaBuilder,
    directives: Directives,
    /// Kind of every block, indexed by block id.
    kinds: Vec<SyntaxKind>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a parser over significant (non-trivia) tokens.
    pub fn new(tokens: &'t [Token<'input>], source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
            builder: BlockArenaBuilder::new(),
            directives: Directives::new(),
            kinds: Vec::new(),
        }
    }

    /// Parse the tokens into a block tree.
    pub fn parse(mut self) -> Result<Parsed, SyntaxError> {
        let root = grammar::file(&mut self)?;
        Ok(Parsed {
            tree: self.builder.finish(root),
            directives: self.directives,
            kinds: self.kinds,
        })
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Turn the current token into a leaf block and advance.
    pub fn bump(&mut self) -> BlockId {
        let kind = self.current();
        let span = self.current_span();
        self.pos += 1;
        let leaf = self.builder.leaf(span);
        self.kinds.push(kind);
        leaf
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> Option<BlockId> {
        self.at(kind).then(|| self.bump())
    }

    /// Consume a token of `kind` or fail with what was found instead.
    pub fn expect(&mut self, kind: SyntaxKind) -> Result<BlockId, SyntaxError> {
        self.eat(kind).ok_or_else(|| self.unexpected(kind.to_string()))
    }

    /// Group `children` into a composite block.
    pub fn node(&mut self, kind: SyntaxKind, children: Vec<BlockId>) -> BlockId {
        let block = self.builder.composite(children);
        self.kinds.push(kind);
        block
    }

    pub fn builder(&mut self) -> &mut BlockArenaBuilder {
        &mut self.builder
    }

    pub fn directives(&mut self) -> &mut Directives {
        &mut self.directives
    }

    /// Error for the current token not being `expected`.
    pub fn unexpected(&self, expected: impl Into<String>) -> SyntaxError {
        SyntaxError::Unexpected {
            expected: expected.into(),
            found: self.current(),
            offset: self.current_span().start,
        }
    }

    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|t| t.span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }
}
