//! SQL Parser implementation.
//!
//! A backtracking recursive descent parser. Every grammar rule returns
//! `Result<Option<NodeId>, ParseError>`:
//!
//! - `Ok(Some(id))`: the rule matched, the cursor is after the match;
//! - `Ok(None)`: no match, every token the rule consumed was pushed back;
//! - `Err(_)`: a construct started but its required continuation is missing.
//!   The error propagates through every enclosing rule and ends the parse.
//!
//! The expression ladder lives in `expr.rs`, the query clauses in
//! `query.rs`.

use tracing::debug;

use super::error::{ParseError, ParseErrorKind};
use crate::ast::{Ast, ExprWrapper, Ident, List, Modifiers, Node, NodeArena, NodeId};
use crate::lexer::{Keyword, Token, TokenKind, TokenStream};

/// SQL Parser.
///
/// One parser parses one query; it owns its token stream, pushback buffer
/// and node arena, so independent parses never share state.
pub struct Parser<'a> {
    pub(super) tokens: TokenStream<'a>,
    pub(super) arena: NodeArena<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: TokenStream::new(input),
            arena: NodeArena::new(),
        }
    }

    /// Parses one query, an optional `;`, and the end of input.
    ///
    /// # Errors
    ///
    /// Returns the first lexical or syntax error.
    pub fn parse_query(mut self) -> Result<Ast<'a>, ParseError> {
        let source = self.tokens.source();
        debug!(bytes = source.len(), "parsing query");
        match self.parse_statement() {
            Ok(root) => {
                let max_pushback = self.tokens.max_pushback();
                debug!(nodes = self.arena.len(), max_pushback, "parsed query");
                Ok(Ast::new(source, self.arena, root, max_pushback))
            }
            Err(err) => {
                debug!(error = %err, "parse failed");
                Err(err)
            }
        }
    }

    fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        let Some(root) = self.parse_select()? else {
            let token = self.next()?;
            let kind = if token.is_eof() {
                ParseErrorKind::EmptyInput
            } else {
                ParseErrorKind::Expected("SELECT")
            };
            return Err(error_at(&token, kind));
        };

        let mut token = self.next()?;
        if token.kind == TokenKind::Semicolon {
            token = self.next()?;
        }
        if !token.is_eof() {
            return Err(error_at(&token, ParseErrorKind::TrailingTokens));
        }
        Ok(root)
    }

    // Token helpers

    pub(super) fn next(&mut self) -> Result<Token<'a>, ParseError> {
        self.tokens.next_token()
    }

    pub(super) fn push_back(&mut self, token: Token<'a>) {
        self.tokens.push_back(token);
    }

    /// Pushes back consumed tokens so that they replay in consumption order.
    pub(super) fn restore(&mut self, consumed: Vec<Token<'a>>) {
        for token in consumed.into_iter().rev() {
            self.push_back(token);
        }
    }

    /// Consumes the next token if `accept` holds for it.
    pub(super) fn accept_if(
        &mut self,
        accept: impl FnOnce(&Token<'a>) -> bool,
    ) -> Result<Option<Token<'a>>, ParseError> {
        let token = self.next()?;
        if accept(&token) {
            Ok(Some(token))
        } else {
            self.push_back(token);
            Ok(None)
        }
    }

    pub(super) fn accept_keyword(&mut self, keyword: Keyword) -> Result<Option<Token<'a>>, ParseError> {
        self.accept_if(|t| t.is_keyword(keyword))
    }

    pub(super) fn accept_kind(&mut self, kind: TokenKind) -> Result<Option<Token<'a>>, ParseError> {
        self.accept_if(|t| t.kind == kind)
    }

    pub(super) fn expect_keyword(
        &mut self,
        keyword: Keyword,
        what: &'static str,
    ) -> Result<Token<'a>, ParseError> {
        let token = self.next()?;
        if token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(error_at(&token, ParseErrorKind::Expected(what)))
        }
    }

    pub(super) fn expect_kind(
        &mut self,
        kind: TokenKind,
        what: &'static str,
    ) -> Result<Token<'a>, ParseError> {
        let token = self.next()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(error_at(&token, ParseErrorKind::Expected(what)))
        }
    }

    /// Consumes the `)` closing a parenthesis opened by the caller.
    pub(super) fn expect_close(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.next()?;
        if token.kind == TokenKind::RightParen {
            Ok(token)
        } else {
            Err(error_at(&token, ParseErrorKind::UnclosedParenthesis))
        }
    }

    /// Turns a missing mandatory construct into a syntax error located at
    /// the token where it should have started.
    pub(super) fn required(
        &mut self,
        node: Option<NodeId>,
        what: &'static str,
    ) -> Result<NodeId, ParseError> {
        match node {
            Some(node) => Ok(node),
            None => {
                let token = self.next()?;
                Err(error_at(&token, ParseErrorKind::Expected(what)))
            }
        }
    }

    // Node helpers

    pub(super) fn alloc(&mut self, node: Node<'a>) -> NodeId {
        self.arena.alloc(node)
    }

    pub(super) fn alloc_ident(&mut self, token: &Token<'a>, next: Option<NodeId>) -> NodeId {
        self.alloc(Node::Ident(Ident {
            name: token.text,
            quoted: token.quoted,
            next,
        }))
    }

    /// Links `items` into a list, first item at the head.
    pub(super) fn alloc_list(&mut self, items: Vec<NodeId>) -> Option<NodeId> {
        items.into_iter().rev().fold(None, |next, value| {
            Some(self.alloc(Node::List(List { value, next })))
        })
    }

    /// Parses `item [, item ...]`. No first item means no match; after a
    /// comma an item is required.
    pub(super) fn parse_list(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<Option<NodeId>, ParseError>,
        what: &'static str,
    ) -> Result<Option<NodeId>, ParseError> {
        let Some(first) = item(self)? else {
            return Ok(None);
        };
        let mut items = vec![first];
        while self.accept_kind(TokenKind::Comma)?.is_some() {
            let next = item(self)?;
            items.push(self.required(next, what)?);
        }
        Ok(self.alloc_list(items))
    }

    fn wrap(&mut self, value: NodeId) -> NodeId {
        self.alloc(Node::ExprWrapper(ExprWrapper {
            value,
            flags: Modifiers::default(),
        }))
    }

    /// Applies `change` to the modifiers of `id`, wrapping it first when it
    /// has none. Returns the node that carries the modifiers.
    pub(super) fn modify(&mut self, id: NodeId, change: impl FnOnce(&mut Modifiers)) -> NodeId {
        let id = if self.arena.get(id).flags().is_some() {
            id
        } else {
            self.wrap(id)
        };
        if let Some(flags) = self.arena.get_mut(id).flags_mut() {
            change(flags);
        }
        id
    }

    /// Unary minus; a second one cancels the first.
    pub(super) fn toggle_negative(&mut self, id: NodeId) -> NodeId {
        self.modify(id, |flags| flags.negative = !flags.negative)
    }

    /// `NOT`; a node that is already negated gets a new wrapper.
    pub(super) fn negate(&mut self, id: NodeId) -> NodeId {
        let id = if self.arena.get(id).flags().is_some_and(|f| f.negate) {
            self.wrap(id)
        } else {
            id
        };
        self.modify(id, |flags| flags.negate = true)
    }

    /// Parentheses. A node that is already parenthesized, negated or signed
    /// gets a new wrapper, so `(NOT a) = b` keeps its NOT inside.
    pub(super) fn parenthesize(&mut self, id: NodeId) -> NodeId {
        let taken = |f: &Modifiers| f.parenthesized || f.negate || f.negative;
        let id = if self.arena.get(id).flags().is_some_and(taken) {
            self.wrap(id)
        } else {
            id
        };
        self.modify(id, |flags| flags.parenthesized = true)
    }
}

pub(super) const fn error_at(token: &Token<'_>, kind: ParseErrorKind) -> ParseError {
    ParseError::new(kind, token.position, token.span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Query;

    fn parse(sql: &str) -> Result<Ast<'_>, ParseError> {
        Parser::new(sql).parse_query()
    }

    fn error_kind(sql: &str) -> ParseErrorKind {
        parse(sql).unwrap_err().kind
    }

    #[test]
    fn test_simple_select() {
        let ast = parse("SELECT a").unwrap();
        let Query { columns, from, .. } = *ast.query();
        assert!(from.is_none());
        let items: Vec<NodeId> = ast.list_items(columns).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(ast.ident_parts(items[0]), vec!["a"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(error_kind(""), ParseErrorKind::EmptyInput);
        assert_eq!(error_kind("  -- only a comment"), ParseErrorKind::EmptyInput);
    }

    #[test]
    fn test_not_a_select() {
        assert_eq!(error_kind("UPDATE t"), ParseErrorKind::Expected("SELECT"));
    }

    #[test]
    fn test_semicolon_handling() {
        assert!(parse("SELECT a;").is_ok());
        assert!(parse("SELECT a; ").is_ok());
        assert_eq!(error_kind("SELECT a;;"), ParseErrorKind::TrailingTokens);
        assert_eq!(error_kind("SELECT a b c"), ParseErrorKind::TrailingTokens);
    }

    #[test]
    fn test_lexical_error_is_reported() {
        let err = parse("SELECT 'abc").unwrap_err();
        assert!(err.is_lexical());
        assert_eq!(err.kind, ParseErrorKind::UnclosedString);
    }

    #[test]
    fn test_non_ascii_names() {
        for name in ["a€b", "x😀", "cafe\u{301}", "caf\u{e9}"] {
            let sql = format!("SELECT {name} FROM {name}");
            let ast = parse(&sql).unwrap();
            let item = ast.list_items(ast.query().columns).next().unwrap();
            assert_eq!(ast.ident_parts(item), vec![name]);
        }
    }

    #[test]
    fn test_error_position() {
        let err = parse("SELECT a\nFROM").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Expected("relation"));
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.column, 5);
    }
}
