//! SyntaxKind enum for the tokens and blocks of a call-statement file.

use std::fmt;

/// All syntax kinds: tokens produced by the lexer and the composite blocks
/// the parser builds from them.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// `// ...` line comment
    COMMENT,
    LPAREN,
    RPAREN,
    COMMA,
    EQ,
    SEMI,
    IDENT,
    NUMBER,
    /// Double-quoted string literal
    STRING,
    /// Input no token rule recognises
    ERROR,
    /// End of file marker
    EOF,

    // === Composite blocks (parser output) ===
    /// The whole file
    FILE,
    /// `target = call;` or `call;`
    STATEMENT,
    /// `name(args...)`
    CALL,
    /// An argument together with its trailing comma
    ARG,
}

impl SyntaxKind {
    /// Whitespace, line breaks and comments. They live in the gaps between
    /// blocks and never become blocks themselves.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::COMMENT
        )
    }

    fn describe(self) -> &'static str {
        match self {
            SyntaxKind::WHITESPACE => "whitespace",
            SyntaxKind::NEWLINE => "line break",
            SyntaxKind::COMMENT => "comment",
            SyntaxKind::LPAREN => "`(`",
            SyntaxKind::RPAREN => "`)`",
            SyntaxKind::COMMA => "`,`",
            SyntaxKind::EQ => "`=`",
            SyntaxKind::SEMI => "`;`",
            SyntaxKind::IDENT => "identifier",
            SyntaxKind::NUMBER => "number",
            SyntaxKind::STRING => "string",
            SyntaxKind::ERROR => "unrecognised input",
            SyntaxKind::EOF => "end of input",
            SyntaxKind::FILE => "file",
            SyntaxKind::STATEMENT => "statement",
            SyntaxKind::CALL => "call",
            SyntaxKind::ARG => "argument",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
