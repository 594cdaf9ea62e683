use std::fmt::Write;

use crate::compile::ast::{NodeArena, NodeId};

use super::{INDENT_STEP, indent};

/// Dumps the subtree below `root`, one node per line. Inner nodes open
/// with `(kind` and close with `)` at their own depth.
pub fn export(arena: &NodeArena, root: NodeId) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    dump_node(&mut out, arena, root, 0)?;

    Ok(out)
}

fn dump_node(
    out: &mut String,
    arena: &NodeArena,
    id: NodeId,
    depth: usize,
) -> std::fmt::Result {
    let Some(node) = arena.get(id) else {
        return Ok(());
    };

    indent(out, depth)?;

    if node.is_leaf() {
        return writeln!(out, "{}", node.label());
    }

    writeln!(out, "({}", node.kind)?;
    for child in node.children.iter() {
        dump_node(out, arena, *child, depth + INDENT_STEP)?;
    }

    indent(out, depth)?;
    writeln!(out, ")")
}

#[cfg(test)]
mod tests {
    use crate::compile::ast::NodeKind;

    use super::*;

    #[test]
    fn dumps_nested_nodes() {
        let mut arena = NodeArena::new();
        let atom = arena.atom("5");
        let lit = arena.create(NodeKind::LitInteger, &[atom]);
        let expr = arena.create(NodeKind::ExprLit, &[lit]);

        let expected = "\
(ExprLit
|   (LitInteger
|   |   5
|   )
)
";

        assert_eq!(export(&arena, expr).unwrap(), expected);
    }

    #[test]
    fn leaves_print_kind_or_text() {
        let mut arena = NodeArena::new();
        let none = arena.none();
        let atom = arena.atom("x");

        assert_eq!(export(&arena, none).unwrap(), "<none>\n");
        assert_eq!(export(&arena, atom).unwrap(), "x\n");
    }
}
