//! Grammar rules.
//!
//! ```text
//! file      := statement*
//! statement := (IDENT "=")? call ";"
//! call      := IDENT "(" (argument ("," argument)* ","?)? ")"
//! argument  := call | IDENT | NUMBER | STRING
//! ```

use blockfmt_engine::blocks::{BlockId, ChildSpacing, IndentPolicy, SpaceProperty, WrapType};

use super::Parser;
use crate::SyntaxError;
use crate::syntax_kind::SyntaxKind;

const TIGHT: SpaceProperty = SpaceProperty::spaces(0);
const ONE_SPACE: SpaceProperty = SpaceProperty::spaces(1);

/// Parse the whole file. Statements go one per line, keeping at most one
/// blank line between them.
pub(super) fn file(p: &mut Parser<'_, '_>) -> Result<BlockId, SyntaxError> {
    let mut statements = Vec::new();
    while !p.at_end() {
        statements.push(statement(p)?);
    }

    let file = p.node(SyntaxKind::FILE, statements);
    p.builder()
        .set_child_indent(file, IndentPolicy::None)
        .set_spacing(
            file,
            ChildSpacing::Uniform(SpaceProperty::line_break_keeping(1)),
        );
    Ok(file)
}

fn statement(p: &mut Parser<'_, '_>) -> Result<BlockId, SyntaxError> {
    let mut children = Vec::new();
    let mut spacing = Vec::new();

    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::EQ {
        children.push(p.bump());
        children.push(p.bump());
        spacing.extend([ONE_SPACE, ONE_SPACE]);
    }
    children.push(call(p)?);
    children.push(p.expect(SyntaxKind::SEMI)?);
    spacing.push(TIGHT);

    let statement = p.node(SyntaxKind::STATEMENT, children);
    p.builder()
        .set_child_indent(statement, IndentPolicy::Continuation)
        .set_spacing(statement, ChildSpacing::PerGap(spacing));
    Ok(statement)
}

fn call(p: &mut Parser<'_, '_>) -> Result<BlockId, SyntaxError> {
    let name = p.expect(SyntaxKind::IDENT)?;
    let open = p.expect(SyntaxKind::LPAREN)?;
    let mut children = vec![name, open];
    let mut spacing = vec![TIGHT];

    let wrap = p.directives().add_wrap(WrapType::ChopIfNeeded);
    let column = p.directives().add_alignment();
    while !p.at(SyntaxKind::RPAREN) {
        let (arg, has_comma) = argument(p)?;
        p.builder().set_wrap(arg, wrap).set_alignment(arg, column);
        spacing.push(if children.len() == 2 { TIGHT } else { ONE_SPACE });
        children.push(arg);
        if !has_comma {
            break;
        }
    }
    children.push(p.expect(SyntaxKind::RPAREN)?);
    spacing.push(TIGHT);

    let call = p.node(SyntaxKind::CALL, children);
    p.builder()
        .set_child_indent(call, IndentPolicy::Continuation)
        .set_spacing(call, ChildSpacing::PerGap(spacing));
    Ok(call)
}

/// One argument plus its trailing comma. Returns whether a comma followed.
fn argument(p: &mut Parser<'_, '_>) -> Result<(BlockId, bool), SyntaxError> {
    let value = match p.current() {
        SyntaxKind::IDENT if p.nth(1) == SyntaxKind::LPAREN => call(p)?,
        SyntaxKind::IDENT | SyntaxKind::NUMBER | SyntaxKind::STRING => p.bump(),
        _ => return Err(p.unexpected("argument or `)`")),
    };

    let Some(comma) = p.eat(SyntaxKind::COMMA) else {
        return Ok((value, false));
    };
    let arg = p.node(SyntaxKind::ARG, vec![value, comma]);
    p.builder()
        .set_spacing(arg, ChildSpacing::Uniform(TIGHT));
    Ok((arg, true))
}
