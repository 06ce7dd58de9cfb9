//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer that produces tokens on demand, plus the token
//! stream the parser reads through: comment skipping, bounded pushback and
//! multi-word keyword folding.

mod keywords;
mod pushback;
mod span;
mod stream;
mod token;
mod tokenizer;

pub use keywords::{check_keyword_table, lookup, Keyword, KeywordEntry, KEYWORDS, KEYWORD_BASE};
pub use pushback::PushbackBuffer;
pub use span::{Position, Span};
pub use stream::TokenStream;
pub use token::{unquote, Token, TokenKind};
pub use tokenizer::Lexer;
