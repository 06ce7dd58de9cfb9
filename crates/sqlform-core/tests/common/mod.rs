#![allow(dead_code)]

use sqlform_core::ast::{Expr, Join, Node, NodeId};
use sqlform_core::{Ast, ParseError, ParseErrorKind};

pub fn parse(sql: &str) -> Ast<'_> {
    sqlform_core::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    match sqlform_core::parse(sql) {
        Ok(ast) => panic!("Expected parse error for: {sql}\nGot: {ast}"),
        Err(e) => e,
    }
}

pub fn err_kind(sql: &str) -> ParseErrorKind {
    parse_err(sql).kind
}

/// Nodes of the column list, in order.
pub fn columns(ast: &Ast<'_>) -> Vec<NodeId> {
    ast.list_items(ast.query().columns).collect()
}

pub fn first_column(ast: &Ast<'_>) -> NodeId {
    columns(ast)[0]
}

/// Relations of the FROM list, in order.
pub fn relations(ast: &Ast<'_>) -> Vec<NodeId> {
    ast.query()
        .from
        .map(|from| ast.list_items(from).collect())
        .unwrap_or_default()
}

pub fn expr<'a>(ast: &'a Ast<'a>, id: NodeId) -> &'a Expr<'a> {
    match ast.node(id) {
        Node::Expr(expr) => expr,
        other => panic!("Expected expr, got {other:?}"),
    }
}

pub fn join(ast: &Ast<'_>, id: NodeId) -> Join {
    match *ast.node(id) {
        Node::Join(join) => join,
        ref other => panic!("Expected join, got {other:?}"),
    }
}

/// Verifies that `to_sql()` produces a fixed point:
/// parse(sql).to_sql() can be re-parsed and yields the same
/// string again.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_sql();
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_sql();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

/// Asserts the normalized rendering of `sql`, and that it is a fixed point.
pub fn renders_as(sql: &str, expected: &str) {
    assert_eq!(parse(sql).to_sql(), expected, "Rendering of: {sql}");
    round_trip(sql);
}
