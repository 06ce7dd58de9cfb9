//! SQL Parser
//!
//! A hand-written backtracking recursive descent parser for SELECT queries.

mod error;
mod expr;
#[allow(clippy::module_inception)]
mod parser;
mod query;

pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
