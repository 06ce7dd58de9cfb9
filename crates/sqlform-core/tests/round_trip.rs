//! Rendering tests: the SQL produced by `to_sql()` is normalized and
//! parses back into the same text.

mod common;
use common::*;

// ===================================================================
// Normalization
// ===================================================================

#[test]
fn keywords_are_uppercased() {
    renders_as(
        "select a from t where b is not null and c not in (1) order by a asc",
        "SELECT a FROM t WHERE b IS NOT NULL AND c NOT IN (1) ORDER BY a ASC",
    );
}

#[test]
fn whitespace_and_comments_are_normalized() {
    renders_as(
        "SELECT  a ,b\n\tFROM /* the table */ t -- done",
        "SELECT a, b FROM t",
    );
}

#[test]
fn labels_always_use_as() {
    renders_as("SELECT a x FROM t y", "SELECT a AS x FROM t AS y");
}

#[test]
fn identifiers_and_literals_keep_their_spelling() {
    renders_as(
        "SELECT \"Mixed Case\", MixedCase, 'It''s', 1.50e3 FROM \"T\"",
        "SELECT \"Mixed Case\", MixedCase, 'It''s', 1.50e3 FROM \"T\"",
    );
}

#[test]
fn folded_keywords_render_canonically() {
    renders_as(
        "SELECT a FROM t group   by a order\nby a",
        "SELECT a FROM t GROUP BY a ORDER BY a",
    );
}

#[test]
fn operators_get_single_spaces() {
    renders_as("SELECT a+b*c, d||e, f=-1", "SELECT a + b * c, d || e, f = -1");
}

#[test]
fn cast_keeps_no_spaces() {
    renders_as("SELECT a :: int + b::text", "SELECT a::int + b::text");
}

#[test]
fn named_arguments() {
    renders_as("SELECT f(a:=1, b=>2)", "SELECT f(a => 1, b => 2)");
}

// ===================================================================
// Structure survives the round trip
// ===================================================================

#[test]
fn parentheses_are_kept() {
    renders_as("SELECT (a + b) * c, ((d))", "SELECT (a + b) * c, ((d))");
}

#[test]
fn negation_and_signs() {
    renders_as(
        "SELECT NOT a, -b, - - c, NOT -d, NOT (e OR f)",
        "SELECT NOT a, -b, c, NOT -d, NOT (e OR f)",
    );
}

#[test]
fn predicates() {
    renders_as(
        "SELECT a WHERE b between 1 and 2 and c not ilike 'x' or d is not true",
        "SELECT a WHERE b BETWEEN 1 AND 2 AND c NOT ILIKE 'x' OR d IS NOT TRUE",
    );
}

#[test]
fn subqueries() {
    renders_as(
        "select a from (select b from t) s where exists (select 1) and c in (select d from u)",
        "SELECT a FROM (SELECT b FROM t) AS s WHERE EXISTS (SELECT 1) AND c IN (SELECT d FROM u)",
    );
}

#[test]
fn joins() {
    renders_as(
        "select * from a inner join b using (id) left join (c cross join d) on b.x = c.x",
        "SELECT * FROM a INNER JOIN b USING (id) LEFT JOIN (c CROSS JOIN d) ON b.x = c.x",
    );
}

#[test]
fn order_suffixes() {
    renders_as(
        "select a order by a nulls first desc, b asc",
        "SELECT a ORDER BY a DESC NULLS FIRST, b ASC",
    );
}

#[test]
fn semicolon_is_dropped() {
    renders_as("SELECT 1;", "SELECT 1");
}

#[test]
fn full_query() {
    round_trip(
        "SELECT c.id, c.name AS customer, count(o.*) AS orders, sum(o.total) total \
         FROM customers c LEFT OUTER JOIN orders o ON o.customer_id = c.id \
         WHERE c.active IS TRUE AND c.region NOT IN ('eu', 'us') \
         GROUP BY c.id, c.name HAVING count(o.*) > 3 \
         ORDER BY orders DESC NULLS LAST, customer LIMIT 50 OFFSET 100",
    );
}

#[test]
fn display_matches_to_sql() {
    let ast = parse("select a from t");
    assert_eq!(ast.to_string(), ast.to_sql());
}
