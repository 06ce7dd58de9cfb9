//! SELECT queries: column list, FROM and joins, and the trailing clauses.

use super::parser::{error_at, Parser};
use super::{ParseError, ParseErrorKind};
use crate::ast::{Join, JoinKind, LabeledExpr, NamedExpr, Node, NodeId, Query};
use crate::lexer::{Keyword, Token, TokenKind};

type RuleResult = Result<Option<NodeId>, ParseError>;

/// Join keywords read before the right-hand relation.
struct JoinSpec {
    kind: JoinKind,
    outer: bool,
    natural: bool,
}

/// Tokens that may follow a relation and therefore never label one.
fn is_join_word(token: &Token<'_>) -> bool {
    token.natural_join
        || token.as_keyword().is_some_and(|keyword| {
            keyword.starts_join()
                || matches!(
                    keyword,
                    Keyword::Natural | Keyword::Outer | Keyword::On | Keyword::Using
                )
        })
}

impl<'a> Parser<'a> {
    /// `SELECT columns [FROM ...] [WHERE ...] [GROUP BY ...] [HAVING ...]
    /// [ORDER BY ...] [LIMIT ...] [OFFSET ...]`.
    pub(super) fn parse_select(&mut self) -> RuleResult {
        if self.accept_keyword(Keyword::Select)?.is_none() {
            return Ok(None);
        }

        let columns = self.parse_list(Self::parse_column, "column")?;
        let columns = self.required(columns, "column list")?;

        let from = self.parse_clause(Keyword::From, "relation", |p| {
            p.parse_list(Self::parse_relation_expr, "relation")
        })?;
        let where_clause = self.parse_clause(Keyword::Where, "expression", Self::parse_expr)?;
        let group_by = self.parse_clause(Keyword::GroupBy, "expression", |p| {
            p.parse_list(Self::parse_expr, "expression")
        })?;
        let having = self.parse_clause(Keyword::Having, "expression", Self::parse_expr)?;
        let order_by = self.parse_clause(Keyword::OrderBy, "expression", |p| {
            p.parse_list(Self::parse_order_item, "expression")
        })?;
        let limit = self.parse_clause(Keyword::Limit, "expression", Self::parse_expr)?;
        let offset = self.parse_clause(Keyword::Offset, "expression", Self::parse_expr)?;

        Ok(Some(self.alloc(Node::Query(Query {
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
        }))))
    }

    /// A keyword-gated clause; once the keyword is read the body is
    /// mandatory.
    fn parse_clause(
        &mut self,
        keyword: Keyword,
        what: &'static str,
        body: impl FnOnce(&mut Self) -> RuleResult,
    ) -> RuleResult {
        if self.accept_keyword(keyword)?.is_none() {
            return Ok(None);
        }
        let node = body(self)?;
        self.required(node, what).map(Some)
    }

    /// `[name =>] (star | expr) [[AS] label]`.
    fn parse_column(&mut self) -> RuleResult {
        let name = self.parse_arg_name()?;
        let value = match self.parse_qualified_star()? {
            Some(star) => Some(star),
            None => self.parse_expr()?,
        };
        let value = match (name, value) {
            (Some(name), value) => {
                let value = self.required(value, "expression after =>")?;
                self.alloc(Node::NamedExpr(NamedExpr { name, value }))
            }
            (None, Some(value)) => value,
            (None, None) => return Ok(None),
        };
        self.parse_labeled(value, false).map(Some)
    }

    /// Wraps `value` in a `LabeledExpr` when a label follows. After a
    /// relation, join words end the relation instead of labeling it.
    fn parse_labeled(&mut self, value: NodeId, relation: bool) -> Result<NodeId, ParseError> {
        match self.parse_label(relation)? {
            Some(label) => Ok(self.alloc(Node::LabeledExpr(LabeledExpr { value, label }))),
            None => Ok(value),
        }
    }

    /// `AS name` or a bare name.
    fn parse_label(&mut self, relation: bool) -> RuleResult {
        let token = self.next()?;
        if token.is_keyword(Keyword::As) {
            let label = self.next()?;
            if !label.is_identifier_like() {
                return Err(error_at(&label, ParseErrorKind::Expected("label after AS")));
            }
            return Ok(Some(self.alloc_ident(&label, None)));
        }
        if token.is_identifier_like() && !(relation && is_join_word(&token)) {
            return Ok(Some(self.alloc_ident(&token, None)));
        }
        self.push_back(token);
        Ok(None)
    }

    /// A relation followed by any number of joins, folded to the left.
    fn parse_relation_expr(&mut self) -> RuleResult {
        let Some(mut left) = self.parse_relation()? else {
            return Ok(None);
        };
        while let Some(spec) = self.parse_join_keywords()? {
            let right = self.parse_relation()?;
            let right = self.required(right, "relation after JOIN")?;

            let (on, using) = if spec.kind == JoinKind::Cross || spec.natural {
                (None, None)
            } else {
                self.parse_join_condition()?
            };

            left = self.alloc(Node::Join(Join {
                left,
                right,
                kind: spec.kind,
                outer: spec.outer,
                natural: spec.natural,
                on,
                using,
                parenthesized: false,
            }));
        }
        Ok(Some(left))
    }

    /// `[NATURAL] (JOIN | INNER JOIN | CROSS JOIN | (LEFT|RIGHT|FULL) [OUTER] JOIN)`.
    /// `NATURAL` arrives folded into the first join keyword.
    fn parse_join_keywords(&mut self) -> Result<Option<JoinSpec>, ParseError> {
        let token = self.next()?;
        let kind = match token.as_keyword() {
            Some(Keyword::Join) => JoinKind::Plain,
            Some(Keyword::Inner) => JoinKind::Inner,
            Some(Keyword::Cross) => JoinKind::Cross,
            Some(Keyword::Left) => JoinKind::Left,
            Some(Keyword::Right) => JoinKind::Right,
            Some(Keyword::Full) => JoinKind::Full,
            _ => {
                self.push_back(token);
                return Ok(None);
            }
        };

        let mut outer = false;
        if matches!(kind, JoinKind::Left | JoinKind::Right | JoinKind::Full) {
            outer = self.accept_keyword(Keyword::Outer)?.is_some();
        }
        if kind != JoinKind::Plain {
            self.expect_keyword(Keyword::Join, "JOIN")?;
        }

        Ok(Some(JoinSpec {
            kind,
            outer,
            natural: token.natural_join,
        }))
    }

    /// `ON expr` or `USING ( ident [, ident ...] )`.
    fn parse_join_condition(&mut self) -> Result<(Option<NodeId>, Option<NodeId>), ParseError> {
        let token = self.next()?;
        match token.as_keyword() {
            Some(Keyword::On) => {
                let on = self.parse_expr()?;
                let on = self.required(on, "join condition")?;
                Ok((Some(on), None))
            }
            Some(Keyword::Using) => {
                self.expect_kind(TokenKind::LeftParen, "( after USING")?;
                let columns = self.parse_list(Self::parse_using_column, "column")?;
                let columns = self.required(columns, "column")?;
                self.expect_close()?;
                Ok((None, Some(columns)))
            }
            _ => Err(error_at(&token, ParseErrorKind::MissingJoinCondition)),
        }
    }

    fn parse_using_column(&mut self) -> RuleResult {
        match self.accept_if(Token::is_identifier_like)? {
            Some(first) => self.parse_qualified_ident(first).map(Some),
            None => Ok(None),
        }
    }

    /// `( query )`, `( relation-expr )` or `name [( args )]`, then an
    /// optional label.
    fn parse_relation(&mut self) -> RuleResult {
        let token = self.next()?;
        let relation = if token.kind == TokenKind::LeftParen {
            if let Some(query) = self.parse_select()? {
                self.expect_close()?;
                query
            } else {
                let inner = self.parse_relation_expr()?;
                let inner = self.required(inner, "relation")?;
                self.expect_close()?;
                let marked = match self.arena.get_mut(inner) {
                    Node::Join(join) if !join.parenthesized => {
                        join.parenthesized = true;
                        true
                    }
                    _ => false,
                };
                if marked {
                    inner
                } else {
                    self.parenthesize(inner)
                }
            }
        } else if token.is_identifier_like() {
            let name = self.parse_qualified_ident(token)?;
            self.parse_call(name)?
        } else {
            self.push_back(token);
            return Ok(None);
        };
        self.parse_labeled(relation, true).map(Some)
    }

    /// `expr [ASC | DESC] [NULLS FIRST | NULLS LAST]`, the two suffixes in
    /// either order.
    fn parse_order_item(&mut self) -> RuleResult {
        let Some(expr) = self.parse_expr()? else {
            return Ok(None);
        };

        let mut direction = None;
        let mut nulls = None;
        loop {
            let token = self.next()?;
            match token.as_keyword() {
                Some(keyword @ (Keyword::Asc | Keyword::Desc)) => {
                    if direction.is_some() {
                        return Err(error_at(
                            &token,
                            ParseErrorKind::ConflictingOrder("sort direction"),
                        ));
                    }
                    direction = Some(keyword);
                }
                Some(Keyword::Nulls) => {
                    let which = self.next()?;
                    let keyword = match which.as_keyword() {
                        Some(keyword @ (Keyword::First | Keyword::Last)) => keyword,
                        _ => {
                            return Err(error_at(
                                &which,
                                ParseErrorKind::Expected("FIRST or LAST after NULLS"),
                            ))
                        }
                    };
                    if nulls.is_some() {
                        return Err(error_at(
                            &token,
                            ParseErrorKind::ConflictingOrder("null ordering"),
                        ));
                    }
                    nulls = Some(keyword);
                }
                _ => {
                    self.push_back(token);
                    break;
                }
            }
        }

        if direction.is_none() && nulls.is_none() {
            return Ok(Some(expr));
        }
        Ok(Some(self.modify(expr, |flags| {
            flags.asc = direction == Some(Keyword::Asc);
            flags.desc = direction == Some(Keyword::Desc);
            flags.nulls_first = nulls == Some(Keyword::First);
            flags.nulls_last = nulls == Some(Keyword::Last);
        })))
    }
}
