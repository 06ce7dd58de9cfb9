//! AST node types.
//!
//! Every node lives in a [`NodeArena`](super::NodeArena) and refers to its
//! children by [`NodeId`]. Text is borrowed from the parsed source.

use serde::Serialize;

use super::NodeId;

/// Display and ordering modifiers carried by expression nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Prefixed by `NOT`.
    pub negate: bool,
    /// Prefixed by an odd number of unary minuses.
    pub negative: bool,
    /// Written inside parentheses.
    pub parenthesized: bool,
    /// `ASC` in an ORDER BY item.
    pub asc: bool,
    /// `DESC` in an ORDER BY item.
    pub desc: bool,
    /// `NULLS FIRST` in an ORDER BY item.
    pub nulls_first: bool,
    /// `NULLS LAST` in an ORDER BY item.
    pub nulls_last: bool,
}

impl Modifiers {
    /// Returns true when no modifier is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which construct an [`Expr`] node was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExprKind {
    /// Binary or cast operator, `AND`, `OR`.
    #[default]
    Plain,
    /// `LIKE` / `NOT LIKE`.
    Like,
    /// `ILIKE` / `NOT ILIKE`.
    Ilike,
    /// `BETWEEN lo AND hi`: both the outer node and its `lo AND hi` operand.
    Between,
    /// `IN (...)` / `NOT IN (...)`.
    In,
}

/// One segment of a possibly qualified name; `next` links to the following
/// segment (`a` -> `b` -> `c` for `a.b.c`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ident<'a> {
    /// Source text of the segment, quotes included.
    pub name: &'a str,
    /// Written in double quotes.
    pub quoted: bool,
    /// Next segment of the qualified name.
    pub next: Option<NodeId>,
}

/// `*`, optionally qualified (`t.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Star {
    /// Ident chain before the star.
    pub qualifier: Option<NodeId>,
}

/// Operator expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expr<'a> {
    /// Operator spelling as written (`+`, `::`, `and`, `like`, ...).
    pub op: &'a str,
    /// Left operand.
    pub value: NodeId,
    /// Right operand.
    pub other: NodeId,
    /// Construct the node was parsed from.
    pub kind: ExprKind,
    /// Modifiers.
    pub flags: Modifiers,
}

/// Transparent holder giving a non-expression node a place for modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExprWrapper {
    /// The wrapped node.
    pub value: NodeId,
    /// Modifiers.
    pub flags: Modifiers,
}

/// Truth value tested by `IS [NOT] TRUE|FALSE|UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Truth {
    /// `TRUE`
    True,
    /// `FALSE`
    False,
    /// `UNKNOWN`
    Unknown,
}

impl Truth {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// `value IS [NOT] truth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IsTruth {
    /// Tested expression.
    pub value: NodeId,
    /// Tested truth value.
    pub truth: Truth,
    /// `IS NOT`.
    pub negate: bool,
}

/// `name => value` inside a function argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedExpr {
    /// An [`Ident`] node.
    pub name: NodeId,
    /// The argument.
    pub value: NodeId,
}

/// `value [AS] label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabeledExpr {
    /// The labeled expression or relation.
    pub value: NodeId,
    /// An [`Ident`] node.
    pub label: NodeId,
}

/// Cons cell of a list; lists are never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct List {
    /// This element.
    pub value: NodeId,
    /// The rest of the list.
    pub next: Option<NodeId>,
}

/// Function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Function {
    /// Ident chain of the callee.
    pub name: NodeId,
    /// Argument [`List`]; `None` for `f()`.
    pub args: Option<NodeId>,
}

/// Join flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum JoinKind {
    /// `JOIN`
    #[default]
    Plain,
    /// `INNER JOIN`
    Inner,
    /// `CROSS JOIN`
    Cross,
    /// `LEFT [OUTER] JOIN`
    Left,
    /// `RIGHT [OUTER] JOIN`
    Right,
    /// `FULL [OUTER] JOIN`
    Full,
}

impl JoinKind {
    /// Keyword before `[OUTER] JOIN`, if any.
    #[must_use]
    pub const fn as_sql(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Inner => Some("INNER"),
            Self::Cross => Some("CROSS"),
            Self::Left => Some("LEFT"),
            Self::Right => Some("RIGHT"),
            Self::Full => Some("FULL"),
        }
    }
}

/// `left [NATURAL] <kind> JOIN right [ON expr | USING (idents)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Join {
    /// Left relation; a previous join in a chain.
    pub left: NodeId,
    /// Right relation.
    pub right: NodeId,
    /// Join flavor.
    pub kind: JoinKind,
    /// `OUTER` was written.
    pub outer: bool,
    /// `NATURAL` join.
    pub natural: bool,
    /// `ON` condition.
    pub on: Option<NodeId>,
    /// `USING` [`List`] of idents.
    pub using: Option<NodeId>,
    /// The whole join was written inside parentheses.
    pub parenthesized: bool,
}

/// A SELECT query; every clause but the column list is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Column [`List`].
    pub columns: NodeId,
    /// Relation [`List`] of `FROM`.
    pub from: Option<NodeId>,
    /// `WHERE` condition.
    pub where_clause: Option<NodeId>,
    /// Expression [`List`] of `GROUP BY`.
    pub group_by: Option<NodeId>,
    /// `HAVING` condition.
    pub having: Option<NodeId>,
    /// Item [`List`] of `ORDER BY`.
    pub order_by: Option<NodeId>,
    /// `LIMIT` expression.
    pub limit: Option<NodeId>,
    /// `OFFSET` expression.
    pub offset: Option<NodeId>,
}

/// An AST node. The variant decides which fields exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Node<'a> {
    /// `NULL`
    Null,
    /// `TRUE`
    True,
    /// `FALSE`
    False,
    /// Numeric literal, as written.
    Numeric(&'a str),
    /// String literal, quotes included.
    String(&'a str),
    /// Name segment.
    Ident(Ident<'a>),
    /// `*` or `qualifier.*`.
    Star(Star),
    /// Operator expression.
    Expr(Expr<'a>),
    /// Modifier holder.
    ExprWrapper(ExprWrapper),
    /// `IS [NOT] TRUE|FALSE|UNKNOWN`
    Is(IsTruth),
    /// `value IS NULL`
    IsNull(NodeId),
    /// `value IS NOT NULL`
    IsNotNull(NodeId),
    /// `name => value`
    NamedExpr(NamedExpr),
    /// `value AS label`
    LabeledExpr(LabeledExpr),
    /// List cell.
    List(List),
    /// Parenthesized tuple of at least two elements, or the value list of
    /// `IN`; holds a [`List`].
    Composite(NodeId),
    /// Function call.
    Function(Function),
    /// `EXISTS (query)`; holds the [`Query`].
    Exists(NodeId),
    /// Join of two relations.
    Join(Join),
    /// SELECT query.
    Query(Query),
}

impl Node<'_> {
    /// Short tag name, used by the tree dump.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::True => "true",
            Self::False => "false",
            Self::Numeric(_) => "numeric",
            Self::String(_) => "string",
            Self::Ident(_) => "ident",
            Self::Star(_) => "star",
            Self::Expr(_) => "expr",
            Self::ExprWrapper(_) => "expr_wrapper",
            Self::Is(_) => "is",
            Self::IsNull(_) => "is_null",
            Self::IsNotNull(_) => "is_not_null",
            Self::NamedExpr(_) => "named_expr",
            Self::LabeledExpr(_) => "labeled_expr",
            Self::List(_) => "list",
            Self::Composite(_) => "composite",
            Self::Function(_) => "function",
            Self::Exists(_) => "exists",
            Self::Join(_) => "join",
            Self::Query(_) => "query",
        }
    }

    /// Modifiers of an `Expr` or `ExprWrapper` node.
    #[must_use]
    pub const fn flags(&self) -> Option<&Modifiers> {
        match self {
            Self::Expr(expr) => Some(&expr.flags),
            Self::ExprWrapper(wrapper) => Some(&wrapper.flags),
            _ => None,
        }
    }

    pub(crate) fn flags_mut(&mut self) -> Option<&mut Modifiers> {
        match self {
            Self::Expr(expr) => Some(&mut expr.flags),
            Self::ExprWrapper(wrapper) => Some(&mut wrapper.flags),
            _ => None,
        }
    }
}
