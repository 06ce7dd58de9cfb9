//! # sqlform-core
//!
//! A lexer and backtracking recursive descent parser for SQL `SELECT`
//! queries.
//!
//! This crate provides:
//! - A lexer with a sorted keyword table, folding of multi-word keywords
//!   (`GROUP BY`, `IS NOT NULL`, `NATURAL LEFT JOIN`, ...) and a bounded
//!   token pushback buffer
//! - A parser with an explicit precedence ladder that backtracks by pushing
//!   tokens back
//! - An arena-allocated AST that renders back to normalized SQL, dumps as an
//!   indented tree, and serializes with serde
//!
//! ## Parsing
//!
//! ```rust
//! use sqlform_core::parse;
//!
//! let ast = parse("select a, b x from t where a > 1 order by b desc").unwrap();
//! assert_eq!(
//!     ast.to_sql(),
//!     "SELECT a, b AS x FROM t WHERE a > 1 ORDER BY b DESC"
//! );
//! ```
//!
//! ## Errors
//!
//! The first lexical or syntax error ends the parse and carries the line and
//! column of the offending token:
//!
//! ```rust
//! use sqlform_core::{parse, ParseErrorKind};
//!
//! let err = parse("SELECT a FROM").unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::Expected("relation"));
//! assert_eq!(err.to_string(), "syntax error, expected relation at line 1 column 14");
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{dump, Ast, Node, NodeId};
pub use lexer::{Lexer, Token, TokenKind, TokenStream};
pub use parser::{ParseError, ParseErrorKind, Parser};

/// Parses one `SELECT` query.
///
/// # Errors
///
/// Returns the first lexical or syntax error.
pub fn parse(source: &str) -> Result<Ast<'_>, ParseError> {
    Parser::new(source).parse_query()
}

/// Returns true when `source` is a single well-formed query.
#[must_use]
pub fn is_valid(source: &str) -> bool {
    parse(source).is_ok()
}
