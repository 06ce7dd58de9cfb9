//! SQL rendering of a parsed tree.
//!
//! The output is normalized (uppercase keywords, single spaces, `AS` before
//! every label) and parses back into the same tree.

use core::fmt;

use super::{Ast, Expr, ExprKind, Join, Modifiers, Node, NodeId, Query};

impl Ast<'_> {
    /// Renders the query back to SQL text.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.render(self.root(), &mut out);
        out
    }

    fn render(&self, id: NodeId, out: &mut String) {
        match *self.node(id) {
            Node::Null => out.push_str("NULL"),
            Node::True => out.push_str("TRUE"),
            Node::False => out.push_str("FALSE"),
            Node::Numeric(text) | Node::String(text) => out.push_str(text),
            Node::Ident(ident) => {
                out.push_str(ident.name);
                if let Some(next) = ident.next {
                    out.push('.');
                    self.render(next, out);
                }
            }
            Node::Star(star) => {
                if let Some(qualifier) = star.qualifier {
                    self.render(qualifier, out);
                    out.push('.');
                }
                out.push('*');
            }
            Node::Expr(expr) => {
                let infix_not = expr.flags.negate && has_infix_not(expr.kind);
                self.render_flagged(&expr.flags, !infix_not, out, |ast, out| {
                    ast.render_expr(&expr, infix_not, out);
                });
            }
            Node::ExprWrapper(wrapper) => {
                self.render_flagged(&wrapper.flags, true, out, |ast, out| {
                    ast.render(wrapper.value, out);
                });
            }
            Node::Is(is) => {
                self.render(is.value, out);
                out.push_str(if is.negate { " IS NOT " } else { " IS " });
                out.push_str(is.truth.as_sql());
            }
            Node::IsNull(value) => {
                self.render(value, out);
                out.push_str(" IS NULL");
            }
            Node::IsNotNull(value) => {
                self.render(value, out);
                out.push_str(" IS NOT NULL");
            }
            Node::NamedExpr(named) => {
                self.render(named.name, out);
                out.push_str(" => ");
                self.render(named.value, out);
            }
            Node::LabeledExpr(labeled) => {
                self.render(labeled.value, out);
                out.push_str(" AS ");
                self.render(labeled.label, out);
            }
            Node::List(_) => self.render_list(id, out),
            Node::Composite(list) => {
                out.push('(');
                self.render_list(list, out);
                out.push(')');
            }
            Node::Function(function) => {
                self.render(function.name, out);
                out.push('(');
                if let Some(args) = function.args {
                    self.render_list(args, out);
                }
                out.push(')');
            }
            Node::Exists(query) => {
                out.push_str("EXISTS ");
                self.render(query, out);
            }
            Node::Join(join) => self.render_join(&join, out),
            Node::Query(query) => {
                let nested = id != self.root();
                if nested {
                    out.push('(');
                }
                self.render_query(&query, out);
                if nested {
                    out.push(')');
                }
            }
        }
    }

    fn render_list(&self, head: NodeId, out: &mut String) {
        for (index, item) in self.list_items(head).enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.render(item, out);
        }
    }

    /// Prefix modifiers, the body, then ORDER BY suffixes.
    fn render_flagged(
        &self,
        flags: &Modifiers,
        prefix_not: bool,
        out: &mut String,
        body: impl FnOnce(&Self, &mut String),
    ) {
        if flags.negate && prefix_not {
            out.push_str("NOT ");
        }
        if flags.negative {
            out.push('-');
        }
        if flags.parenthesized {
            out.push('(');
        }
        body(self, out);
        if flags.parenthesized {
            out.push(')');
        }
        if flags.asc {
            out.push_str(" ASC");
        }
        if flags.desc {
            out.push_str(" DESC");
        }
        if flags.nulls_first {
            out.push_str(" NULLS FIRST");
        }
        if flags.nulls_last {
            out.push_str(" NULLS LAST");
        }
    }

    fn render_expr(&self, expr: &Expr<'_>, infix_not: bool, out: &mut String) {
        self.render(expr.value, out);
        if expr.op == "::" {
            out.push_str("::");
        } else {
            out.push(' ');
            if infix_not {
                out.push_str("NOT ");
            }
            push_operator(expr.op, out);
            out.push(' ');
        }
        self.render(expr.other, out);
    }

    fn render_join(&self, join: &Join, out: &mut String) {
        if join.parenthesized {
            out.push('(');
        }
        self.render(join.left, out);
        out.push(' ');
        if join.natural {
            out.push_str("NATURAL ");
        }
        if let Some(kind) = join.kind.as_sql() {
            out.push_str(kind);
            out.push(' ');
        }
        if join.outer {
            out.push_str("OUTER ");
        }
        out.push_str("JOIN ");
        self.render(join.right, out);
        if let Some(on) = join.on {
            out.push_str(" ON ");
            self.render(on, out);
        }
        if let Some(using) = join.using {
            out.push_str(" USING (");
            self.render_list(using, out);
            out.push(')');
        }
        if join.parenthesized {
            out.push(')');
        }
    }

    fn render_query(&self, query: &Query, out: &mut String) {
        out.push_str("SELECT ");
        self.render_list(query.columns, out);
        let clauses = [
            (" FROM ", query.from),
            (" WHERE ", query.where_clause),
            (" GROUP BY ", query.group_by),
            (" HAVING ", query.having),
            (" ORDER BY ", query.order_by),
            (" LIMIT ", query.limit),
            (" OFFSET ", query.offset),
        ];
        for (keyword, clause) in clauses {
            let Some(clause) = clause else {
                continue;
            };
            out.push_str(keyword);
            self.render(clause, out);
        }
    }
}

/// Keyword operators are written in uppercase, symbols as they are.
fn push_operator(op: &str, out: &mut String) {
    if op.bytes().all(|b| b.is_ascii_alphabetic() || b == b' ') {
        out.push_str(&op.to_ascii_uppercase());
    } else {
        out.push_str(op);
    }
}

/// Whether a negated expression of this kind is written with an infix
/// `NOT` (`a NOT LIKE b`).
const fn has_infix_not(kind: ExprKind) -> bool {
    matches!(
        kind,
        ExprKind::Like | ExprKind::Ilike | ExprKind::In | ExprKind::Between
    )
}

impl fmt::Display for Ast<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
