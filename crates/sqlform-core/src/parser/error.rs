//! Parser error types.

use thiserror::Error;

use crate::lexer::{Position, Span};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A string literal runs to the end of input.
    #[error("unclosed string")]
    UnclosedString,
    /// A double-quoted identifier runs to the end of input.
    #[error("unclosed identifier")]
    UnclosedIdentifier,
    /// A block comment runs to the end of input.
    #[error("unclosed comment")]
    UnclosedComment,
    /// An opening parenthesis has no matching close.
    #[error("unclosed parenthesis")]
    UnclosedParenthesis,
    /// A complete query is followed by more tokens.
    #[error("syntax error (not on the end)")]
    TrailingTokens,
    /// A construct started but its required continuation is missing.
    #[error("syntax error, expected {0}")]
    Expected(&'static str),
    /// Two sort directions or two null orderings on one ORDER BY item.
    #[error("syntax error, conflicting {0}")]
    ConflictingOrder(&'static str),
    /// A join that needs `ON` or `USING` has neither.
    #[error("syntax error, missing ON or USING")]
    MissingJoinCondition,
    /// Nothing but whitespace and comments.
    #[error("syntax error, empty input")]
    EmptyInput,
}

impl ParseErrorKind {
    /// Malformed token, as opposed to a grammar violation.
    #[must_use]
    pub const fn is_lexical(self) -> bool {
        matches!(
            self,
            Self::UnclosedString | Self::UnclosedIdentifier | Self::UnclosedComment
        )
    }
}

/// A lexical or syntax error; the first one ends the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where the offending token starts.
    pub position: Position,
    /// The offending token.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: Position, span: Span) -> Self {
        Self {
            kind,
            position,
            span,
        }
    }

    /// Returns true for an error raised by the lexer.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        self.kind.is_lexical()
    }
}
