//! Token types for the SQL lexer.

use std::borrow::Cow;

use serde::Serialize;

use super::{Keyword, Position, Span};

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// SQL keyword, possibly a folded multi-word one.
    Keyword(Keyword),
    /// `/* ... */` or `-- ...` comment.
    Comment,
    /// Decimal numeric literal (e.g. `42`, `3.14`, `.5`, `1e10`).
    Numeric,
    /// Single-quoted string literal, quotes included.
    String,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// Plain or double-quoted identifier.
    Identifier,
    /// Any other single character.
    Other(char),
    /// Run of operator characters (e.g. `+`, `<=`, `||`).
    Operator,
    /// ::
    CastOperator,
    /// .
    Dot,
    /// ,
    Comma,
    /// `=>` or `:=`
    NamedExpr,
    /// ;
    Semicolon,
}

/// A token: a typed slice of the immutable source text.
///
/// Tokens are small `Copy` values; the parser and the pushback buffer move
/// them around freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind,
    /// Source text of the token. Folded multi-word keywords carry their
    /// canonical spelling instead.
    pub text: &'a str,
    /// Byte range in the source.
    pub span: Span,
    /// Where the token starts, for diagnostics.
    pub position: Position,
    /// Identifier was written in double quotes.
    pub quoted: bool,
    /// A doubled quote occurred inside a string or quoted identifier.
    pub escaped: bool,
    /// Comment is a `--` line comment.
    pub singleline: bool,
    /// Keyword cannot be used as an identifier.
    pub reserved: bool,
    /// Join keyword was preceded by `NATURAL`.
    pub natural_join: bool,
    /// Operator is a comparison (`=`, `<>`, `!=`, `<`, `>`, `<=`, `>=`).
    pub comparing_op: bool,
}

impl<'a> Token<'a> {
    /// Creates a token with all flags cleared.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, span: Span, position: Position) -> Self {
        Self {
            kind,
            text,
            span,
            position,
            quoted: false,
            escaped: false,
            singleline: false,
            reserved: false,
            natural_join: false,
            comparing_op: false,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Returns true if this is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.as_keyword() == Some(keyword)
    }

    /// Returns true for an operator token spelled exactly `op`.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Identifiers and non-reserved keywords can both name things.
    #[must_use]
    pub const fn is_identifier_like(&self) -> bool {
        match self.kind {
            TokenKind::Identifier => true,
            TokenKind::Keyword(_) => !self.reserved,
            _ => false,
        }
    }

    /// Generic operators: anything the lexer produced as an operator run
    /// that is not a comparison, plus the `::` cast operator.
    #[must_use]
    pub const fn is_generic_operator(&self) -> bool {
        match self.kind {
            TokenKind::Operator => !self.comparing_op,
            TokenKind::CastOperator => true,
            _ => false,
        }
    }
}

/// Strips the quotes of a quoted identifier or string literal and collapses
/// doubled quote characters. Text that is not quoted is returned unchanged.
#[must_use]
pub fn unquote(text: &str) -> Cow<'_, str> {
    let quote = match text.as_bytes().first() {
        Some(b'"') => '"',
        Some(b'\'') => '\'',
        _ => return Cow::Borrowed(text),
    };
    if text.len() < 2 || !text.ends_with(quote) {
        return Cow::Borrowed(text);
    }
    let inner = &text[1..text.len() - 1];
    let (doubled, single) = if quote == '"' {
        ("\"\"", "\"")
    } else {
        ("''", "'")
    };
    if inner.contains(doubled) {
        Cow::Owned(inner.replace(doubled, single))
    } else {
        Cow::Borrowed(inner)
    }
}
