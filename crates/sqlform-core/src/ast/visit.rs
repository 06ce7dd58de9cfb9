//! Read-only traversal of an [`Ast`].
//!
//! [`Visit::visit_node`] dispatches on the node tag to one hook per tag.
//! Every hook defaults to [`walk_node`], which visits the children in parse
//! order; override a hook and call `walk_node` from it to keep descending.

use super::{
    Ast, Expr, ExprWrapper, Function, Ident, IsTruth, Join, LabeledExpr, List, NamedExpr, Node,
    NodeId, Query, Star,
};

/// A visitor over AST nodes.
#[allow(unused_variables)]
pub trait Visit<'a> {
    /// Dispatches to the hook of the node's tag.
    fn visit_node(&mut self, ast: &Ast<'a>, id: NodeId) {
        match *ast.node(id) {
            Node::Null => self.visit_null(ast, id),
            Node::True => self.visit_true(ast, id),
            Node::False => self.visit_false(ast, id),
            Node::Numeric(text) => self.visit_numeric(ast, id, text),
            Node::String(text) => self.visit_string(ast, id, text),
            Node::Ident(ref ident) => self.visit_ident(ast, id, ident),
            Node::Star(ref star) => self.visit_star(ast, id, star),
            Node::Expr(ref expr) => self.visit_expr(ast, id, expr),
            Node::ExprWrapper(ref wrapper) => self.visit_expr_wrapper(ast, id, wrapper),
            Node::Is(ref is) => self.visit_is(ast, id, is),
            Node::IsNull(value) => self.visit_is_null(ast, id, value),
            Node::IsNotNull(value) => self.visit_is_not_null(ast, id, value),
            Node::NamedExpr(ref named) => self.visit_named_expr(ast, id, named),
            Node::LabeledExpr(ref labeled) => self.visit_labeled_expr(ast, id, labeled),
            Node::List(ref list) => self.visit_list(ast, id, list),
            Node::Composite(list) => self.visit_composite(ast, id, list),
            Node::Function(ref function) => self.visit_function(ast, id, function),
            Node::Exists(query) => self.visit_exists(ast, id, query),
            Node::Join(ref join) => self.visit_join(ast, id, join),
            Node::Query(ref query) => self.visit_query(ast, id, query),
        }
    }

    fn visit_null(&mut self, ast: &Ast<'a>, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_true(&mut self, ast: &Ast<'a>, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_false(&mut self, ast: &Ast<'a>, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_numeric(&mut self, ast: &Ast<'a>, id: NodeId, text: &'a str) {
        walk_node(self, ast, id);
    }

    fn visit_string(&mut self, ast: &Ast<'a>, id: NodeId, text: &'a str) {
        walk_node(self, ast, id);
    }

    fn visit_ident(&mut self, ast: &Ast<'a>, id: NodeId, ident: &Ident<'a>) {
        walk_node(self, ast, id);
    }

    fn visit_star(&mut self, ast: &Ast<'a>, id: NodeId, star: &Star) {
        walk_node(self, ast, id);
    }

    fn visit_expr(&mut self, ast: &Ast<'a>, id: NodeId, expr: &Expr<'a>) {
        walk_node(self, ast, id);
    }

    fn visit_expr_wrapper(&mut self, ast: &Ast<'a>, id: NodeId, wrapper: &ExprWrapper) {
        walk_node(self, ast, id);
    }

    fn visit_is(&mut self, ast: &Ast<'a>, id: NodeId, is: &IsTruth) {
        walk_node(self, ast, id);
    }

    fn visit_is_null(&mut self, ast: &Ast<'a>, id: NodeId, value: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_is_not_null(&mut self, ast: &Ast<'a>, id: NodeId, value: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_named_expr(&mut self, ast: &Ast<'a>, id: NodeId, named: &NamedExpr) {
        walk_node(self, ast, id);
    }

    fn visit_labeled_expr(&mut self, ast: &Ast<'a>, id: NodeId, labeled: &LabeledExpr) {
        walk_node(self, ast, id);
    }

    fn visit_list(&mut self, ast: &Ast<'a>, id: NodeId, list: &List) {
        walk_node(self, ast, id);
    }

    fn visit_composite(&mut self, ast: &Ast<'a>, id: NodeId, list: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_function(&mut self, ast: &Ast<'a>, id: NodeId, function: &Function) {
        walk_node(self, ast, id);
    }

    fn visit_exists(&mut self, ast: &Ast<'a>, id: NodeId, query: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_join(&mut self, ast: &Ast<'a>, id: NodeId, join: &Join) {
        walk_node(self, ast, id);
    }

    fn visit_query(&mut self, ast: &Ast<'a>, id: NodeId, query: &Query) {
        walk_node(self, ast, id);
    }
}

/// Visits the children of `id` in parse order.
pub fn walk_node<'a, V: Visit<'a> + ?Sized>(visitor: &mut V, ast: &Ast<'a>, id: NodeId) {
    let mut children: [Option<NodeId>; 8] = [None; 8];
    match *ast.node(id) {
        Node::Null | Node::True | Node::False | Node::Numeric(_) | Node::String(_) => {}
        Node::Ident(ident) => children[0] = ident.next,
        Node::Star(star) => children[0] = star.qualifier,
        Node::Expr(expr) => children[..2].copy_from_slice(&[Some(expr.value), Some(expr.other)]),
        Node::ExprWrapper(ExprWrapper { value, .. })
        | Node::Is(IsTruth { value, .. })
        | Node::IsNull(value)
        | Node::IsNotNull(value)
        | Node::Composite(value)
        | Node::Exists(value) => children[0] = Some(value),
        Node::NamedExpr(named) => {
            children[..2].copy_from_slice(&[Some(named.name), Some(named.value)]);
        }
        Node::LabeledExpr(labeled) => {
            children[..2].copy_from_slice(&[Some(labeled.value), Some(labeled.label)]);
        }
        Node::List(list) => children[..2].copy_from_slice(&[Some(list.value), list.next]),
        Node::Function(function) => {
            children[..2].copy_from_slice(&[Some(function.name), function.args]);
        }
        Node::Join(join) => {
            children[..4].copy_from_slice(&[Some(join.left), Some(join.right), join.on, join.using]);
        }
        Node::Query(query) => {
            children = [
                Some(query.columns),
                query.from,
                query.where_clause,
                query.group_by,
                query.having,
                query.order_by,
                query.limit,
                query.offset,
            ];
        }
    }
    for child in children.into_iter().flatten() {
        visitor.visit_node(ast, child);
    }
}
