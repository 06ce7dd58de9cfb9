//! Tests for the column list, labels and the optional clauses of a
//! SELECT query: WHERE, GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.

mod common;
use common::*;

use sqlform_core::ast::{Node, NodeId};
use sqlform_core::{Ast, ParseErrorKind};

fn labeled<'a>(ast: &'a Ast<'a>, id: NodeId) -> (NodeId, Vec<&'a str>) {
    match *ast.node(id) {
        Node::LabeledExpr(labeled) => (labeled.value, ast.ident_parts(labeled.label)),
        ref other => panic!("Expected labeled expr, got {other:?}"),
    }
}

// ===================================================================
// Columns and labels
// ===================================================================

#[test]
fn column_list_order() {
    let ast = parse("SELECT a, b, c");
    let names: Vec<_> = columns(&ast)
        .into_iter()
        .map(|id| ast.ident_parts(id)[0])
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn label_with_and_without_as() {
    let ast = parse("SELECT a AS x, b y, c \"Z\"");
    let cols = columns(&ast);
    assert_eq!(labeled(&ast, cols[0]).1, vec!["x"]);
    assert_eq!(labeled(&ast, cols[1]).1, vec!["y"]);
    assert_eq!(labeled(&ast, cols[2]).1, vec!["\"Z\""]);
}

#[test]
fn non_reserved_keyword_as_label() {
    let ast = parse("SELECT count(*) first, a group");
    let cols = columns(&ast);
    assert_eq!(labeled(&ast, cols[0]).1, vec!["first"]);
    assert_eq!(labeled(&ast, cols[1]).1, vec!["group"]);
}

#[test]
fn join_words_label_columns() {
    let ast = parse("SELECT a left, b inner, c natural, d outer, e cross FROM t");
    let labels: Vec<_> = columns(&ast)
        .into_iter()
        .map(|id| labeled(&ast, id).1)
        .collect();
    assert_eq!(
        labels,
        vec![vec!["left"], vec!["inner"], vec!["natural"], vec!["outer"], vec!["cross"]]
    );
    assert_eq!(relations(&ast).len(), 1);
    round_trip("SELECT a left, x inner FROM t");
}

#[test]
fn group_not_followed_by_by_is_a_label() {
    let ast = parse("SELECT a group FROM t GROUP BY a");
    let cols = columns(&ast);
    assert_eq!(labeled(&ast, cols[0]).1, vec!["group"]);
    assert!(ast.query().group_by.is_some());
}

#[test]
fn as_requires_a_label() {
    assert_eq!(err_kind("SELECT a AS"), ParseErrorKind::Expected("label after AS"));
    assert_eq!(err_kind("SELECT a AS FROM t"), ParseErrorKind::Expected("label after AS"));
}

#[test]
fn named_column() {
    let ast = parse("SELECT total => a + b AS s");
    let (value, label) = labeled(&ast, first_column(&ast));
    assert_eq!(label, vec!["s"]);
    let Node::NamedExpr(named) = *ast.node(value) else {
        panic!("Expected named expr");
    };
    assert_eq!(ast.ident_parts(named.name), vec!["total"]);
    assert_eq!(expr(&ast, named.value).op, "+");
}

#[test]
fn star_with_label() {
    let ast = parse("SELECT t.* AS everything");
    let (value, _) = labeled(&ast, first_column(&ast));
    assert!(matches!(ast.node(value), Node::Star(_)));
}

#[test]
fn column_list_is_mandatory() {
    assert_eq!(err_kind("SELECT"), ParseErrorKind::Expected("column list"));
    assert_eq!(err_kind("SELECT FROM t"), ParseErrorKind::Expected("column list"));
    assert_eq!(err_kind("SELECT a,"), ParseErrorKind::Expected("column"));
}

// ===================================================================
// Optional clauses
// ===================================================================

#[test]
fn all_clauses() {
    let ast = parse(
        "SELECT a, count(*) FROM t WHERE b > 0 GROUP BY a, c HAVING count(*) > 1 \
         ORDER BY a LIMIT 10 OFFSET 20",
    );
    let query = ast.query();
    assert!(query.from.is_some());
    assert!(query.where_clause.is_some());
    assert_eq!(ast.list_items(query.group_by.unwrap()).count(), 2);
    assert!(query.having.is_some());
    assert_eq!(ast.list_items(query.order_by.unwrap()).count(), 1);
    assert_eq!(ast.node(query.limit.unwrap()), &Node::Numeric("10"));
    assert_eq!(ast.node(query.offset.unwrap()), &Node::Numeric("20"));
}

#[test]
fn clauses_without_from() {
    let ast = parse("SELECT 1 WHERE true LIMIT 1");
    let query = ast.query();
    assert!(query.from.is_none());
    assert!(query.where_clause.is_some());
    assert!(query.limit.is_some());
    assert!(query.group_by.is_none());
}

#[test]
fn group_by_spacing_and_case() {
    for sql in [
        "SELECT a GROUP BY a",
        "select a group by a",
        "SELECT a Group\n\tBy a",
        "SELECT a group /* c */ by a",
    ] {
        assert!(parse(sql).query().group_by.is_some(), "{sql}");
    }
}

#[test]
fn clause_body_is_mandatory() {
    assert_eq!(err_kind("SELECT a FROM"), ParseErrorKind::Expected("relation"));
    assert_eq!(err_kind("SELECT a WHERE"), ParseErrorKind::Expected("expression"));
    assert_eq!(err_kind("SELECT a GROUP BY"), ParseErrorKind::Expected("expression"));
    assert_eq!(err_kind("SELECT a HAVING"), ParseErrorKind::Expected("expression"));
    assert_eq!(err_kind("SELECT a ORDER BY"), ParseErrorKind::Expected("expression"));
    assert_eq!(err_kind("SELECT a LIMIT"), ParseErrorKind::Expected("expression"));
    assert_eq!(err_kind("SELECT a OFFSET"), ParseErrorKind::Expected("expression"));
}

#[test]
fn clauses_out_of_order_fail() {
    assert_eq!(
        err_kind("SELECT a WHERE b FROM t"),
        ParseErrorKind::TrailingTokens
    );
    assert_eq!(
        err_kind("SELECT a LIMIT 1 ORDER BY a"),
        ParseErrorKind::TrailingTokens
    );
}

// ===================================================================
// ORDER BY
// ===================================================================

fn order_flags(sql: &str) -> sqlform_core::ast::Modifiers {
    let ast = parse(sql);
    let item = ast.list_items(ast.query().order_by.unwrap()).next().unwrap();
    *ast.node(item).flags().expect("order item carries modifiers")
}

#[test]
fn order_direction_and_nulls() {
    let flags = order_flags("SELECT a ORDER BY a DESC NULLS LAST");
    assert!(flags.desc && flags.nulls_last);
    assert!(!flags.asc && !flags.nulls_first);

    let flags = order_flags("SELECT a ORDER BY a NULLS FIRST ASC");
    assert!(flags.asc && flags.nulls_first);
}

#[test]
fn order_item_without_suffix_is_plain() {
    let ast = parse("SELECT a ORDER BY a, b");
    let items: Vec<_> = ast.list_items(ast.query().order_by.unwrap()).collect();
    assert_eq!(ast.ident_parts(items[0]), vec!["a"]);
    assert_eq!(ast.ident_parts(items[1]), vec!["b"]);
}

#[test]
fn order_flags_on_expression_node() {
    let ast = parse("SELECT a ORDER BY a + 1 DESC");
    let item = ast.list_items(ast.query().order_by.unwrap()).next().unwrap();
    let add = expr(&ast, item);
    assert_eq!(add.op, "+");
    assert!(add.flags.desc);
}

#[test]
fn order_direction_conflict() {
    assert_eq!(
        err_kind("SELECT a ORDER BY a ASC DESC"),
        ParseErrorKind::ConflictingOrder("sort direction")
    );
    assert_eq!(
        err_kind("SELECT a ORDER BY a DESC DESC"),
        ParseErrorKind::ConflictingOrder("sort direction")
    );
}

#[test]
fn order_nulls_conflict() {
    assert_eq!(
        err_kind("SELECT a ORDER BY a NULLS FIRST NULLS LAST"),
        ParseErrorKind::ConflictingOrder("null ordering")
    );
}

#[test]
fn order_nulls_needs_position() {
    assert_eq!(
        err_kind("SELECT a ORDER BY a NULLS ASC"),
        ParseErrorKind::Expected("FIRST or LAST after NULLS")
    );
}

// ===================================================================
// Statement end
// ===================================================================

#[test]
fn single_trailing_semicolon() {
    assert!(sqlform_core::parse("SELECT a;").is_ok());
    assert!(sqlform_core::parse("SELECT a; ").is_ok());
    assert!(sqlform_core::parse("SELECT a; -- done\n").is_ok());
    assert_eq!(err_kind("SELECT a;;"), ParseErrorKind::TrailingTokens);
    assert_eq!(err_kind("SELECT a; SELECT b"), ParseErrorKind::TrailingTokens);
}
