//! Indented, human-readable dump of an AST, one line per node.

use super::{walk_node, Ast, ExprKind, JoinKind, Modifiers, Node, NodeId, Visit};

/// Renders the tree under the root, children indented by two spaces.
#[must_use]
pub fn dump(ast: &Ast<'_>) -> String {
    let mut dumper = Dumper::default();
    dumper.visit_node(ast, ast.root());
    dumper.out
}

#[derive(Default)]
struct Dumper {
    out: String,
    depth: usize,
}

impl<'a> Visit<'a> for Dumper {
    fn visit_node(&mut self, ast: &Ast<'a>, id: NodeId) {
        let node = ast.node(id);
        self.out.push_str(&" ".repeat(self.depth * 2));
        self.out.push_str(node.tag());
        self.out.push_str(&describe(node));
        self.out.push('\n');
        self.depth += 1;
        walk_node(self, ast, id);
        self.depth -= 1;
    }
}

/// The payload shown after the tag, with a leading space when not empty.
fn describe(node: &Node<'_>) -> String {
    match node {
        Node::Numeric(text) | Node::String(text) => format!(" {text}"),
        Node::Ident(ident) => format!(" {}", ident.name),
        Node::Expr(expr) => {
            let mut out = format!(" {}", expr.op);
            if expr.kind != ExprKind::Plain {
                out.push_str(&format!(" {:?}", expr.kind));
            }
            out + &flag_names(&expr.flags)
        }
        Node::ExprWrapper(wrapper) => flag_names(&wrapper.flags),
        Node::Is(is) => format!(
            " {}{}",
            if is.negate { "not " } else { "" },
            is.truth.as_sql().to_ascii_lowercase()
        ),
        Node::Join(join) => {
            let mut out = String::new();
            if join.kind != JoinKind::Plain {
                out.push_str(&format!(" {:?}", join.kind));
            }
            for (set, name) in [
                (join.natural, "natural"),
                (join.outer, "outer"),
                (join.parenthesized, "parenthesized"),
            ] {
                if set {
                    out.push(' ');
                    out.push_str(name);
                }
            }
            out
        }
        _ => String::new(),
    }
}

fn flag_names(flags: &Modifiers) -> String {
    [
        (flags.negate, "negate"),
        (flags.negative, "negative"),
        (flags.parenthesized, "parenthesized"),
        (flags.asc, "asc"),
        (flags.desc, "desc"),
        (flags.nulls_first, "nulls_first"),
        (flags.nulls_last, "nulls_last"),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, name)| format!(" [{name}]"))
    .collect()
}
