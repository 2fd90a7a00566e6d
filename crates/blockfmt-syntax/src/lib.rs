//! # blockfmt-syntax
//!
//! A small front end for the blockfmt engine. It reads files of call
//! statements:
//!
//! ```text
//! total = sum(price, tax(price, rate), 12);
//! log("done");
//! ```
//!
//! and turns them into the block tree the formatter lays out.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → BlockArena + Directives → Formatter
//!               (Logos)          (Grammar)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! [Logos] splits the input into tokens. Every byte lands in some token;
//! whitespace, line breaks and comments are trivia.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ### 2. Parser ([`parser`] module)
//!
//! Recursive descent over the significant tokens. Each token becomes a leaf
//! block; statements, calls and arguments become composites carrying the
//! spacing, indent, wrap and alignment rules of the house style.
//!
//! ### 3. Formatting
//!
//! [`format_source`] runs the engine over a fresh [`blockfmt_engine::Document`]
//! and returns the new text together with the applied edits.
//!
//! ## Quick Start
//!
//! ```
//! use blockfmt_engine::FormatOptions;
//! use blockfmt_syntax::format_source;
//!
//! let formatted = format_source("x=f(a,b);", &FormatOptions::default()).unwrap();
//! assert_eq!(formatted.text, "x = f(a, b);");
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

use blockfmt_engine::blocks::{BlockArena, BlockId, BlockTree};
use blockfmt_engine::formatting::Directives;
use blockfmt_engine::{Document, FormatError, FormatOptions, FormatPatch, Formatter};
use log::debug;
use thiserror::Error;

use crate::lexer::lex;
use crate::parser::Parser;

pub use syntax_kind::SyntaxKind;

/// Errors produced while reading source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unrecognised input {text:?} at offset {offset}")]
    InvalidToken { text: String, offset: usize },

    #[error("expected {expected}, found {found} at offset {offset}")]
    Unexpected {
        expected: String,
        found: SyntaxKind,
        offset: usize,
    },
}

/// Errors from [`format_source`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatSourceError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("layout failed: {0}")]
    Layout(#[from] FormatError),
}

/// A parsed file: the block tree plus the wraps and alignments it uses.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub tree: BlockArena,
    pub directives: Directives,
    kinds: Vec<SyntaxKind>,
}

impl Parsed {
    pub fn kind(&self, block: BlockId) -> Option<SyntaxKind> {
        self.kinds.get(block.index()).copied()
    }

    /// Indented dump of the tree, one block per line, leaves with their text.
    pub fn debug_tree(&self, source: &str) -> String {
        let mut out = String::new();
        self.write_block(&mut out, source, self.tree.root(), 0);
        out
    }

    fn write_block(&self, out: &mut String, source: &str, block: BlockId, depth: usize) {
        let range = self.tree.text_range(block);
        let kind = self.kind(block).unwrap_or(SyntaxKind::ERROR);
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{kind:?}@{}..{}", range.start, range.end));

        let children = self.tree.sub_blocks(block);
        if children.is_empty() {
            let text = source.get(range.as_range()).unwrap_or_default();
            out.push_str(&format!(" {text:?}"));
        }
        out.push('\n');
        for &child in children {
            self.write_block(out, source, child, depth + 1);
        }
    }
}

/// Parse `source` into a block tree.
pub fn parse(source: &str) -> Result<Parsed, SyntaxError> {
    let tokens = lex(source);
    if let Some(bad) = tokens.iter().find(|t| t.kind == SyntaxKind::ERROR) {
        return Err(SyntaxError::InvalidToken {
            text: bad.text.to_owned(),
            offset: bad.span.start,
        });
    }

    let significant: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
    let parsed = Parser::new(&significant, source.len()).parse()?;
    debug!(
        "parsed {} tokens into {} blocks",
        significant.len(),
        parsed.tree.len()
    );
    Ok(parsed)
}

/// Result of [`format_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub patch: FormatPatch,
}

/// Parse and format `source` in one go.
pub fn format_source(source: &str, options: &FormatOptions) -> Result<Formatted, FormatSourceError> {
    let Parsed {
        tree,
        mut directives,
        ..
    } = parse(source)?;
    let mut document = Document::from_text(source);
    let patch = Formatter::new(options.clone()).format(&tree, &mut directives, &mut document)?;
    Ok(Formatted {
        text: document.text(),
        patch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn options(right_margin: usize) -> FormatOptions {
        FormatOptions {
            right_margin,
            continuation_indent_size: 4,
            ..FormatOptions::default()
        }
    }

    fn format(source: &str, right_margin: usize) -> String {
        format_source(source, &options(right_margin)).unwrap().text
    }

    #[test]
    fn snapshot_block_tree() {
        let source = "x = f(a, b);";
        let parsed = parse(source).unwrap();

        assert_snapshot!(parsed.debug_tree(source), @r#"
FILE@0..12
  STATEMENT@0..12
    IDENT@0..1 "x"
    EQ@2..3 "="
    CALL@4..11
      IDENT@4..5 "f"
      LPAREN@5..6 "("
      ARG@6..8
        IDENT@6..7 "a"
        COMMA@7..8 ","
      IDENT@9..10 "b"
      RPAREN@10..11 ")"
    SEMI@11..12 ";"
"#);
    }

    #[test]
    fn arguments_share_one_wrap_and_alignment() {
        let parsed = parse("f(a, b, c);").unwrap();
        let tree = &parsed.tree;
        let statement = tree.sub_blocks(tree.root())[0];
        let call = tree.sub_blocks(statement)[0];
        let args = &tree.sub_blocks(call)[2..5];

        assert!(args.iter().all(|&a| tree.wrap(a).is_some()));
        assert!(args.iter().all(|&a| tree.wrap(a) == tree.wrap(args[0])));
        assert!(args.iter().all(|&a| tree.alignment(a) == tree.alignment(args[0])));
        assert_eq!(parsed.kind(args[0]), Some(SyntaxKind::ARG));
        assert_eq!(parsed.kind(args[2]), Some(SyntaxKind::IDENT));
    }

    #[rstest]
    #[case("x=f(a,b);", "x = f(a, b);")]
    #[case("f( 1 ,\"two\" ) ;", "f(1, \"two\");")]
    #[case("a = f(1); b = g(2);", "a = f(1);\nb = g(2);")]
    #[case("a = f(1);\n\n\n\nb = g();", "a = f(1);\n\nb = g();")]
    #[case("x = f(g(1,2),h());", "x = f(g(1, 2), h());")]
    #[case("x = f(\n  a,\n  b\n);", "x = f(a, b);")]
    #[case("a=f(1);\r\n\r\n\r\nb = g(2);", "a = f(1);\r\n\r\nb = g(2);")]
    #[case("a = f(1); // one\r\nb=g(2);", "a = f(1); // one\r\nb = g(2);")]
    #[case("a = f(1);\r\nb = g(2); c = h();", "a = f(1);\r\nb = g(2);\r\nc = h();")]
    fn normalises_spacing(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(format(source, 120), expected);
    }

    #[test]
    fn long_call_is_chopped_at_first_argument() {
        let formatted = format_source(
            "result = compute(alpha, beta, gamma, delta);",
            &FormatOptions {
                right_margin: 30,
                ..FormatOptions::default()
            },
        )
        .unwrap();

        assert_snapshot!(formatted.text, @r"
result = compute(
        alpha,
        beta,
        gamma,
        delta);
");
        assert_eq!(formatted.patch.retries, 1);
    }

    #[test]
    fn outer_call_chops_before_inner_one() {
        assert_snapshot!(format("x = outer(inner(aaaa, bbbb), cccc);", 24), @r"
x = outer(
    inner(aaaa, bbbb),
    cccc);
");
    }

    #[rstest]
    #[case("result = compute(alpha, beta, gamma, delta);", 30)]
    #[case("x = outer(inner(aaaa, bbbb), cccc);", 24)]
    #[case("a = f(1);\n\n\nb = g(x, y, z);", 12)]
    #[case("x = f(1,   // first\n  2);", 80)]
    fn formatting_is_idempotent(#[case] source: &str, #[case] right_margin: usize) {
        let once = format(source, right_margin);
        let twice = format_source(&once, &options(right_margin)).unwrap();

        assert_eq!(twice.text, once);
        assert!(!twice.patch.changed());
    }

    #[test]
    fn comments_are_kept_verbatim() {
        // The line break after the comment counts as a wrap, so the call chops.
        assert_eq!(
            format("x=f(1,   // first\n  2);", 80),
            "x = f(\n    1,   // first\n  2);"
        );
        assert_eq!(
            format("a = f(1); // keep\nb=g(2);", 80),
            "a = f(1); // keep\nb = g(2);"
        );
    }

    #[test]
    fn missing_paren_is_reported() {
        let err = parse("x = f(1").unwrap_err();

        assert_eq!(
            err,
            SyntaxError::Unexpected {
                expected: "`)`".to_string(),
                found: SyntaxKind::EOF,
                offset: 7,
            }
        );
        assert_eq!(err.to_string(), "expected `)`, found end of input at offset 7");
    }

    #[test]
    fn unknown_character_is_reported() {
        let err = parse("x = f(1) # oops").unwrap_err();

        assert_eq!(
            err,
            SyntaxError::InvalidToken {
                text: "#".to_string(),
                offset: 9,
            }
        );
    }

    #[test]
    fn empty_file_formats_to_itself() {
        let formatted = format_source("", &FormatOptions::default()).unwrap();

        assert_eq!(formatted.text, "");
        assert!(!formatted.patch.changed());
    }
}
