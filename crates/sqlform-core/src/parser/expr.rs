//! The expression precedence ladder.
//!
//! Outermost tier first: `OR`, `AND`, prefix `NOT`, `=`, other comparisons,
//! `LIKE`/`ILIKE`/`IN`, `BETWEEN`, `IS [NOT] NULL`, `IS [NOT]
//! TRUE|FALSE|UNKNOWN`, generic operators, `EXISTS`, operands. Binary tiers
//! recurse on their right operand, so chains associate to the right:
//! `a + b + c` is `a + (b + c)`.

use super::parser::{error_at, Parser};
use super::{ParseError, ParseErrorKind};
use crate::ast::{
    Expr, ExprKind, Function, IsTruth, List, Modifiers, NamedExpr, Node, NodeId, Star, Truth,
};
use crate::lexer::{Keyword, Token, TokenKind};

/// Qualifiers looked through when recognizing `a.b.c.*`.
const MAX_STAR_QUALIFIERS: usize = 3;

type RuleResult = Result<Option<NodeId>, ParseError>;

impl<'a> Parser<'a> {
    /// Top-level expression.
    pub(super) fn parse_expr(&mut self) -> RuleResult {
        self.parse_or()
    }

    fn binary(&mut self, op: &'a str, value: NodeId, other: NodeId, kind: ExprKind) -> NodeId {
        self.alloc(Node::Expr(Expr {
            op,
            value,
            other,
            kind,
            flags: Modifiers::default(),
        }))
    }

    /// `left <op> <tier>`, right-recursive, for keyword or operator tiers.
    fn right_chain(
        &mut self,
        operand: fn(&mut Self) -> RuleResult,
        is_op: fn(&Token<'a>) -> bool,
        tier: fn(&mut Self) -> RuleResult,
    ) -> RuleResult {
        let Some(left) = operand(self)? else {
            return Ok(None);
        };
        let Some(op) = self.accept_if(is_op)? else {
            return Ok(Some(left));
        };
        let right = tier(self)?;
        let right = self.required(right, "expression")?;
        Ok(Some(self.binary(op.text, left, right, ExprKind::Plain)))
    }

    fn parse_or(&mut self) -> RuleResult {
        self.right_chain(Self::parse_and, |t| t.is_keyword(Keyword::Or), Self::parse_or)
    }

    fn parse_and(&mut self) -> RuleResult {
        self.right_chain(Self::parse_not, |t| t.is_keyword(Keyword::And), Self::parse_and)
    }

    /// Prefix `NOT`, negating an equality-tier expression.
    fn parse_not(&mut self) -> RuleResult {
        if self.accept_keyword(Keyword::Not)?.is_none() {
            return self.parse_equality();
        }
        let operand = self.parse_equality()?;
        let operand = self.required(operand, "expression after NOT")?;
        Ok(Some(self.negate(operand)))
    }

    fn parse_equality(&mut self) -> RuleResult {
        self.right_chain(
            Self::parse_comparison,
            |t| t.is_operator("="),
            Self::parse_equality,
        )
    }

    fn parse_comparison(&mut self) -> RuleResult {
        self.right_chain(
            Self::parse_like,
            |t| t.comparing_op && t.text != "=",
            Self::parse_comparison,
        )
    }

    /// `LIKE`, `ILIKE`, `IN` and their `NOT` forms.
    fn parse_like(&mut self) -> RuleResult {
        let Some(left) = self.parse_between()? else {
            return Ok(None);
        };

        let token = self.next()?;
        let (op, negate) = match token.as_keyword() {
            Some(Keyword::Like | Keyword::Ilike | Keyword::In) => (token, false),
            Some(Keyword::NotIn) => (token, true),
            Some(Keyword::Not) => {
                let op = self.next()?;
                if matches!(
                    op.as_keyword(),
                    Some(Keyword::Like | Keyword::Ilike | Keyword::In)
                ) {
                    (op, true)
                } else {
                    self.push_back(op);
                    self.push_back(token);
                    return Ok(Some(left));
                }
            }
            _ => {
                self.push_back(token);
                return Ok(Some(left));
            }
        };

        let id = match op.as_keyword() {
            Some(Keyword::In | Keyword::NotIn) => {
                let values = self.parse_in_values()?;
                self.binary("in", left, values, ExprKind::In)
            }
            _ => {
                let kind = if op.is_keyword(Keyword::Ilike) {
                    ExprKind::Ilike
                } else {
                    ExprKind::Like
                };
                let pattern = self.parse_like()?;
                let pattern = self.required(pattern, "pattern")?;
                self.binary(op.text, left, pattern, kind)
            }
        };
        Ok(Some(if negate { self.negate(id) } else { id }))
    }

    /// `( query )` or `( expr [, expr ...] )` after `IN`.
    fn parse_in_values(&mut self) -> Result<NodeId, ParseError> {
        self.expect_kind(TokenKind::LeftParen, "( after IN")?;
        if let Some(query) = self.parse_select()? {
            self.expect_close()?;
            return Ok(query);
        }
        let list = self.parse_list(Self::parse_expr, "expression")?;
        let list = self.required(list, "expression")?;
        self.expect_close()?;
        Ok(self.alloc(Node::Composite(list)))
    }

    /// `x [NOT] BETWEEN lo AND hi`, stored as `BETWEEN(x, AND(lo, hi))`.
    fn parse_between(&mut self) -> RuleResult {
        let Some(left) = self.parse_is_null()? else {
            return Ok(None);
        };

        let token = self.next()?;
        let (between, negate) = match token.as_keyword() {
            Some(Keyword::Between) => (token, false),
            Some(Keyword::Not) => {
                let next = self.next()?;
                if next.is_keyword(Keyword::Between) {
                    (next, true)
                } else {
                    self.push_back(next);
                    self.push_back(token);
                    return Ok(Some(left));
                }
            }
            _ => {
                self.push_back(token);
                return Ok(Some(left));
            }
        };

        let low = self.parse_is_null()?;
        let low = self.required(low, "lower bound")?;
        let and = self.expect_keyword(Keyword::And, "AND")?;
        let high = self.parse_is_null()?;
        let high = self.required(high, "upper bound")?;

        let bounds = self.binary(and.text, low, high, ExprKind::Between);
        let id = self.binary(between.text, left, bounds, ExprKind::Between);
        Ok(Some(if negate { self.negate(id) } else { id }))
    }

    /// `x IS NULL`, `x IS NOT NULL`; both arrive as single folded tokens.
    fn parse_is_null(&mut self) -> RuleResult {
        let Some(left) = self.parse_is_truth()? else {
            return Ok(None);
        };
        let token = self.next()?;
        let node = match token.as_keyword() {
            Some(Keyword::IsNull) => Node::IsNull(left),
            Some(Keyword::IsNotNull) => Node::IsNotNull(left),
            _ => {
                self.push_back(token);
                return Ok(Some(left));
            }
        };
        Ok(Some(self.alloc(node)))
    }

    /// `x IS [NOT] TRUE|FALSE|UNKNOWN`.
    fn parse_is_truth(&mut self) -> RuleResult {
        let Some(left) = self.parse_generic()? else {
            return Ok(None);
        };
        if self.accept_keyword(Keyword::Is)?.is_none() {
            return Ok(Some(left));
        }

        let negate = self.accept_keyword(Keyword::Not)?.is_some();
        let token = self.next()?;
        let truth = match token.as_keyword() {
            Some(Keyword::True) => Truth::True,
            Some(Keyword::False) => Truth::False,
            Some(Keyword::Unknown) => Truth::Unknown,
            _ => {
                return Err(error_at(
                    &token,
                    ParseErrorKind::Expected("TRUE, FALSE or UNKNOWN"),
                ))
            }
        };
        Ok(Some(self.alloc(Node::Is(IsTruth {
            value: left,
            truth,
            negate,
        }))))
    }

    /// Operands joined by generic (non-comparison) operators and `::`.
    fn parse_generic(&mut self) -> RuleResult {
        self.right_chain(
            Self::parse_exists,
            Token::is_generic_operator,
            Self::parse_generic,
        )
    }

    /// `EXISTS ( query )`. Otherwise `EXISTS` is an ordinary name.
    fn parse_exists(&mut self) -> RuleResult {
        let Some(exists) = self.accept_keyword(Keyword::Exists)? else {
            return self.parse_operand();
        };
        let Some(open) = self.accept_kind(TokenKind::LeftParen)? else {
            self.push_back(exists);
            return self.parse_operand();
        };
        let Some(query) = self.parse_select()? else {
            self.push_back(open);
            self.push_back(exists);
            return self.parse_operand();
        };
        self.expect_close()?;
        Ok(Some(self.alloc(Node::Exists(query))))
    }

    /// Primary operand.
    pub(super) fn parse_operand(&mut self) -> RuleResult {
        let token = self.next()?;
        let node = match token.kind {
            TokenKind::Operator if token.text == "+" || token.text == "-" => {
                let Some(operand) = self.parse_operand()? else {
                    self.push_back(token);
                    return Ok(None);
                };
                return Ok(Some(if token.text == "-" {
                    self.toggle_negative(operand)
                } else {
                    operand
                }));
            }
            TokenKind::Keyword(Keyword::Not) => {
                let Some(operand) = self.parse_operand()? else {
                    self.push_back(token);
                    return Ok(None);
                };
                return Ok(Some(self.negate(operand)));
            }
            TokenKind::LeftParen => return self.parse_parenthesized().map(Some),
            TokenKind::Keyword(Keyword::Null) => Node::Null,
            TokenKind::Keyword(Keyword::True) => Node::True,
            TokenKind::Keyword(Keyword::False) => Node::False,
            TokenKind::Numeric => Node::Numeric(token.text),
            TokenKind::String => Node::String(token.text),
            _ if token.is_identifier_like() => {
                let name = self.parse_qualified_ident(token)?;
                return self.parse_call(name).map(Some);
            }
            _ => {
                self.push_back(token);
                return Ok(None);
            }
        };
        Ok(Some(self.alloc(node)))
    }

    /// After `(`: a subquery, a parenthesized expression, or a tuple.
    fn parse_parenthesized(&mut self) -> Result<NodeId, ParseError> {
        if let Some(query) = self.parse_select()? {
            self.expect_close()?;
            return Ok(query);
        }

        let first = self.parse_expr()?;
        let first = self.required(first, "expression")?;
        let token = self.next()?;
        match token.kind {
            TokenKind::RightParen => Ok(self.parenthesize(first)),
            TokenKind::Comma => {
                let rest = self.parse_list(Self::parse_expr, "expression")?;
                let rest = self.required(rest, "expression")?;
                self.expect_close()?;
                let head = self.alloc(Node::List(List {
                    value: first,
                    next: Some(rest),
                }));
                Ok(self.alloc(Node::Composite(head)))
            }
            _ => Err(error_at(&token, ParseErrorKind::UnclosedParenthesis)),
        }
    }

    /// `first[.ident ...]`; a dot must be followed by a name.
    pub(super) fn parse_qualified_ident(&mut self, first: Token<'a>) -> Result<NodeId, ParseError> {
        let mut rest = Vec::new();
        while self.accept_kind(TokenKind::Dot)?.is_some() {
            let part = self.next()?;
            if !part.is_identifier_like() {
                return Err(error_at(&part, ParseErrorKind::Expected("identifier after '.'")));
            }
            rest.push(part);
        }
        let mut next = None;
        for part in rest.iter().rev() {
            next = Some(self.alloc_ident(part, next));
        }
        Ok(self.alloc_ident(&first, next))
    }

    /// Optional argument list after a name.
    pub(super) fn parse_call(&mut self, name: NodeId) -> Result<NodeId, ParseError> {
        if self.accept_kind(TokenKind::LeftParen)?.is_none() {
            return Ok(name);
        }
        let args = self.parse_function_args()?;
        Ok(self.alloc(Node::Function(Function { name, args })))
    }

    /// After `(`: `)`, `[qualified] * )` or a named-expression list and `)`.
    fn parse_function_args(&mut self) -> Result<Option<NodeId>, ParseError> {
        if self.accept_kind(TokenKind::RightParen)?.is_some() {
            return Ok(None);
        }
        let args = match self.parse_qualified_star()? {
            Some(star) => self.alloc_list(vec![star]),
            None => self.parse_list(Self::parse_argument, "argument")?,
        };
        let args = self.required(args, "argument")?;
        self.expect_close()?;
        Ok(Some(args))
    }

    /// `[name =>] expr`.
    fn parse_argument(&mut self) -> RuleResult {
        let name = self.parse_arg_name()?;
        let value = self.parse_expr()?;
        match name {
            Some(name) => {
                let value = self.required(value, "expression after =>")?;
                Ok(Some(self.alloc(Node::NamedExpr(NamedExpr { name, value }))))
            }
            None => Ok(value),
        }
    }

    /// `name =>` or `name :=`, with two tokens of lookahead.
    pub(super) fn parse_arg_name(&mut self) -> RuleResult {
        let Some(name) = self.accept_if(Token::is_identifier_like)? else {
            return Ok(None);
        };
        if self.accept_kind(TokenKind::NamedExpr)?.is_some() {
            return Ok(Some(self.alloc_ident(&name, None)));
        }
        self.push_back(name);
        Ok(None)
    }

    /// `*` or `a.*` up to `a.b.c.*`.
    pub(super) fn parse_qualified_star(&mut self) -> RuleResult {
        let mut consumed = Vec::with_capacity(2 * MAX_STAR_QUALIFIERS + 1);
        loop {
            let token = self.next()?;
            if token.is_operator("*") {
                let mut qualifier = None;
                for part in consumed.iter().rev().filter(|t: &&Token<'a>| t.kind != TokenKind::Dot) {
                    qualifier = Some(self.alloc_ident(part, qualifier));
                }
                return Ok(Some(self.alloc(Node::Star(Star { qualifier }))));
            }
            let more = consumed.len() < 2 * MAX_STAR_QUALIFIERS && token.is_identifier_like();
            consumed.push(token);
            if !more {
                break;
            }
            let dot = self.next()?;
            consumed.push(dot);
            if dot.kind != TokenKind::Dot {
                break;
            }
        }
        self.restore(consumed);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, ExprKind, Node, NodeId};
    use crate::parse;

    fn first_column(ast: &Ast<'_>) -> NodeId {
        ast.list_items(ast.query().columns).next().unwrap()
    }

    fn expr<'a>(ast: &'a Ast<'a>, id: NodeId) -> &'a crate::ast::Expr<'a> {
        match ast.node(id) {
            Node::Expr(expr) => expr,
            other => panic!("expected expr, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_operators_associate_right() {
        let ast = parse("SELECT a + b + c").unwrap();
        let outer = expr(&ast, first_column(&ast));
        assert_eq!(outer.op, "+");
        assert_eq!(ast.ident_parts(outer.value), vec!["a"]);
        let inner = expr(&ast, outer.other);
        assert_eq!(ast.ident_parts(inner.value), vec!["b"]);
        assert_eq!(ast.ident_parts(inner.other), vec!["c"]);
    }

    #[test]
    fn test_comparison_binds_looser_than_operators() {
        let ast = parse("SELECT a + 1 < b * 2").unwrap();
        let cmp = expr(&ast, first_column(&ast));
        assert_eq!(cmp.op, "<");
        assert_eq!(expr(&ast, cmp.value).op, "+");
        assert_eq!(expr(&ast, cmp.other).op, "*");
    }

    #[test]
    fn test_between_shape() {
        let ast = parse("SELECT x BETWEEN 1 AND 2").unwrap();
        let between = expr(&ast, first_column(&ast));
        assert_eq!(between.kind, ExprKind::Between);
        let bounds = expr(&ast, between.other);
        assert_eq!(bounds.kind, ExprKind::Between);
        assert_eq!(bounds.op.to_ascii_lowercase(), "and");
        assert_eq!(ast.node(bounds.value), &Node::Numeric("1"));
        assert_eq!(ast.node(bounds.other), &Node::Numeric("2"));
    }

    #[test]
    fn test_star_qualifier_limit() {
        assert!(parse("SELECT a.b.c.*").is_ok());
        assert!(parse("SELECT a.b.c.d.*").is_err());
    }

    #[test]
    fn test_exists_without_subquery_is_a_name() {
        let ast = parse("SELECT exists(1)").unwrap();
        assert!(matches!(ast.node(first_column(&ast)), Node::Function(_)));
        let ast = parse("SELECT EXISTS (SELECT 1)").unwrap();
        assert!(matches!(ast.node(first_column(&ast)), Node::Exists(_)));
    }
}
