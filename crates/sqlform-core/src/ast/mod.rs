//! Abstract Syntax Tree (AST) of a parsed query.
//!
//! Nodes are stored in a [`NodeArena`] owned by the [`Ast`]; links between
//! nodes are [`NodeId`] handles. Once the parser returns, the tree is
//! read-only.

mod arena;
mod dump;
mod node;
mod render;
mod visit;

pub use arena::{NodeArena, NodeId, BLOCK_CAPACITY};
pub use dump::dump;
pub use node::{
    Expr, ExprKind, ExprWrapper, Function, Ident, IsTruth, Join, JoinKind, LabeledExpr, List,
    Modifiers, NamedExpr, Node, Query, Star, Truth,
};
pub use visit::{walk_node, Visit};

use serde::Serialize;

/// A parsed query: the arena with every node, and the root `Query` node.
#[derive(Debug, Clone, Serialize)]
pub struct Ast<'a> {
    #[serde(skip)]
    source: &'a str,
    root: NodeId,
    #[serde(rename = "nodes")]
    arena: NodeArena<'a>,
    max_pushback: usize,
}

impl<'a> Ast<'a> {
    pub(crate) const fn new(
        source: &'a str,
        arena: NodeArena<'a>,
        root: NodeId,
        max_pushback: usize,
    ) -> Self {
        Self {
            source,
            root,
            arena,
            max_pushback,
        }
    }

    /// The parsed text.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Handle of the root `Query` node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node behind a handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node<'a> {
        self.arena.get(id)
    }

    /// The root query.
    ///
    /// # Panics
    ///
    /// Never for an `Ast` returned by the parser, whose root is always a
    /// `Query`.
    #[must_use]
    pub fn query(&self) -> &Query {
        match self.node(self.root) {
            Node::Query(query) => query,
            other => panic!("AST root is a {} node", other.tag()),
        }
    }

    /// Elements of the list starting at `head`, in parse order.
    pub fn list_items(&self, head: NodeId) -> ListItems<'_, 'a> {
        ListItems {
            ast: self,
            next: Some(head),
        }
    }

    /// Segment names of the ident chain starting at `head` (`a.b.c` gives
    /// `["a", "b", "c"]`).
    #[must_use]
    pub fn ident_parts(&self, head: NodeId) -> Vec<&'a str> {
        let mut parts = Vec::new();
        let mut next = Some(head);
        while let Some(id) = next {
            match self.node(id) {
                Node::Ident(ident) => {
                    parts.push(ident.name);
                    next = ident.next;
                }
                _ => break,
            }
        }
        parts
    }

    /// The node arena.
    #[must_use]
    pub const fn arena(&self) -> &NodeArena<'a> {
        &self.arena
    }

    /// Number of nodes allocated by the parse.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Largest number of tokens that were pushed back at once while parsing.
    #[must_use]
    pub const fn max_pushback(&self) -> usize {
        self.max_pushback
    }
}

/// Iterator over the elements of a `List` chain.
#[derive(Debug, Clone)]
pub struct ListItems<'ast, 'a> {
    ast: &'ast Ast<'a>,
    next: Option<NodeId>,
}

impl Iterator for ListItems<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        match self.ast.node(id) {
            Node::List(cell) => {
                self.next = cell.next;
                Some(cell.value)
            }
            _ => {
                self.next = None;
                None
            }
        }
    }
}
