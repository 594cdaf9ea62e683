use std::fmt::Display;

use crate::datstructures::scope_tree::{ScopeError, ScopeId, ScopeTree};

use super::{Diagnostics, SemanticError, types::CanonicalSort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    Value(CanonicalSort),
    FuncDecl,
}

impl Display for SymbolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(sort) => write!(f, "{sort}"),
            Self::FuncDecl => write!(f, "func_decl"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    // Body scope for functions, owning scope for variables.
    pub scope: Option<ScopeId>,
    pub ty: SymbolType,
}

impl Symbol {
    pub fn function(body: ScopeId) -> Self {
        Symbol {
            scope: Some(body),
            ty: SymbolType::FuncDecl,
        }
    }

    pub fn variable(sort: CanonicalSort, owner: ScopeId) -> Self {
        Symbol {
            scope: Some(owner),
            ty: SymbolType::Value(sort),
        }
    }
}

/// Scope tree of one compilation, keyed by identifier name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    scopes: ScopeTree<String, Symbol>,
}

impl SymbolTable {
    pub const ROOT: ScopeId = ScopeTree::<String, Symbol>::ROOT;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> ScopeId {
        Self::ROOT
    }

    /// Opens a scope below `parent`. Unknown parents fall back to the root.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let scope = match self.scopes.push(parent) {
            Ok(scope) => scope,
            Err(err) => {
                tracing::warn!(%err, "opening scope below the root instead");
                self.scopes.push(Self::ROOT).unwrap_or(Self::ROOT)
            }
        };

        tracing::trace!(scope, parent, "new scope");

        scope
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.parent(scope)
    }

    pub fn is_declared_in(&self, scope: ScopeId, name: &str) -> bool {
        self.scopes.contains_local(scope, &name.to_string())
    }

    /// Binds `name` in `scope` itself. A second binding of the same name in
    /// the same scope is reported and leaves the table untouched.
    pub fn insert(
        &mut self,
        scope: ScopeId,
        name: &str,
        symbol: Symbol,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        match self.scopes.insert(scope, name.to_string(), symbol) {
            Ok(()) => true,
            Err(err @ ScopeError::AlreadyBound(_)) => {
                tracing::trace!(name, %err, "insert rejected");
                diagnostics.report(SemanticError::Redeclared(name.to_string()));
                false
            }
            Err(err) => {
                diagnostics.report(SemanticError::Scope(err));
                false
            }
        }
    }

    /// Resolves `name` from `scope` outwards. A miss is reported, except for
    /// empty names which only come from malformed subtrees.
    pub fn lookup(
        &self,
        scope: ScopeId,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<SymbolType> {
        if name.is_empty() {
            return None;
        }

        let found = self.get(scope, name).map(|symbol| symbol.ty);
        if found.is_none() {
            diagnostics.report(SemanticError::IdentifierNotFound(name.to_string()));
        }

        found
    }

    /// Like `lookup`, without reporting.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes.lookup(scope, &name.to_string())
    }

    pub fn get_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes.get_local(scope, &name.to_string())
    }

    pub fn bindings(&self, scope: ScopeId) -> impl Iterator<Item = (&str, &Symbol)> {
        self.scopes
            .elements_at(scope)
            .map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaration_is_reported_once_and_keeps_first_binding() {
        let mut table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let root = table.root();

        let first = Symbol::variable(CanonicalSort::Integer, root);
        let second = Symbol::variable(CanonicalSort::Bool, root);

        assert!(table.insert(root, "x", first, &mut diagnostics));
        assert!(!table.insert(root, "x", second, &mut diagnostics));

        assert_eq!(
            diagnostics.errors(),
            &[SemanticError::Redeclared(String::from("x"))]
        );
        assert_eq!(table.get_local(root, "x"), Some(&first));
    }

    #[test]
    fn insert_into_missing_scope_is_malformed() {
        let mut table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();

        let symbol = Symbol::variable(CanonicalSort::Integer, 7);
        assert!(!table.insert(7, "x", symbol, &mut diagnostics));

        assert_eq!(
            diagnostics.errors(),
            &[SemanticError::Scope(ScopeError::UnknownScope(7))]
        );
        assert_eq!(table.get(SymbolTable::ROOT, "x"), None);
    }

    #[test]
    fn lookup_prefers_innermost_binding() {
        let mut table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let root = table.root();
        let inner = table.push_scope(root);

        table.insert(root, "x", Symbol::variable(CanonicalSort::Integer, root), &mut diagnostics);
        table.insert(root, "y", Symbol::variable(CanonicalSort::Float, root), &mut diagnostics);
        table.insert(inner, "x", Symbol::variable(CanonicalSort::Bool, inner), &mut diagnostics);

        assert_eq!(
            table.lookup(inner, "x", &mut diagnostics),
            Some(SymbolType::Value(CanonicalSort::Bool))
        );
        assert_eq!(
            table.lookup(inner, "y", &mut diagnostics),
            Some(SymbolType::Value(CanonicalSort::Float))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_identifier_is_reported() {
        let table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();

        assert_eq!(table.lookup(SymbolTable::ROOT, "ghost", &mut diagnostics), None);
        assert_eq!(
            diagnostics.messages(),
            vec![String::from("Identifier ghost not found")]
        );
        assert!(!diagnostics.is_success());
    }

    #[test]
    fn empty_name_is_not_reported() {
        let table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();

        assert_eq!(table.lookup(SymbolTable::ROOT, "", &mut diagnostics), None);
        assert!(diagnostics.is_success());
    }

    #[test]
    fn function_symbols_print_as_func_decl() {
        assert_eq!(SymbolType::FuncDecl.to_string(), "func_decl");
        assert_eq!(
            SymbolType::Value(CanonicalSort::Float).to_string(),
            "float"
        );
    }
}
