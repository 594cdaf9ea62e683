use std::fmt::Write;

use crate::{
    compile::semantic::symbols::SymbolTable, datstructures::scope_tree::ScopeId,
};

use super::{INDENT_STEP, indent};

/// Prints every scope reachable from the root. Bindings are listed in name
/// order; a binding that refers to another scope (a function and its body)
/// is followed by that scope, one step deeper.
pub fn export(table: &SymbolTable) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    export_scope(&mut out, table, table.root(), 0)?;

    Ok(out)
}

fn export_scope(
    out: &mut String,
    table: &SymbolTable,
    scope: ScopeId,
    depth: usize,
) -> std::fmt::Result {
    for (name, symbol) in table.bindings(scope) {
        let identity = match symbol.scope {
            Some(id) => format!("scope#{id}"),
            None => String::from("-"),
        };

        indent(out, depth)?;
        writeln!(
            out,
            "{name:>15}{identity:>15}{ty:>15}",
            ty = symbol.ty.to_string()
        )?;

        if let Some(child) = symbol.scope.filter(|child| *child != scope) {
            export_scope(out, table, child, depth + INDENT_STEP)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::compile::semantic::{
        Diagnostics,
        symbols::Symbol,
        types::CanonicalSort,
    };

    use super::*;

    #[test]
    fn nests_function_bodies() {
        let mut table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let root = table.root();
        let body = table.push_scope(root);

        table.insert(root, "main", Symbol::function(body), &mut diagnostics);
        table.insert(body, "x", Symbol::variable(CanonicalSort::Integer, body), &mut diagnostics);

        let expected = format!(
            "{:>15}{:>15}{:>15}\n|   {:>15}{:>15}{:>15}\n",
            "main", "scope#1", "func_decl", "x", "scope#1", "integer"
        );

        assert_eq!(export(&table).unwrap(), expected);
    }

    #[test]
    fn lists_bindings_in_name_order() {
        let mut table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let root = table.root();

        table.insert(root, "b", Symbol::variable(CanonicalSort::Bool, root), &mut diagnostics);
        table.insert(root, "a", Symbol::variable(CanonicalSort::Float, root), &mut diagnostics);

        let printed = export(&table).unwrap();
        let names: Vec<_> = printed
            .lines()
            .map(|line| line.split_whitespace().next().unwrap())
            .collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn empty_table_prints_nothing() {
        assert_eq!(export(&SymbolTable::new()).unwrap(), "");
    }
}
