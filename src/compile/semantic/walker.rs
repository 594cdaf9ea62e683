use crate::{
    compile::ast::{NodeArena, NodeId, NodeKind},
    datstructures::scope_tree::ScopeId,
};

use super::{
    Analysis, Diagnostics, SemanticError,
    symbols::{Symbol, SymbolTable, SymbolType},
    typecheck::Inferred,
    types::{self, CanonicalSort},
};

/// Pre-order walk over the node arena that fills the symbol table and
/// records semantic errors. Errors never stop the walk: the offending
/// declaration or assignment is dropped and every node is still visited.
pub struct SemanticAnalysis<'a> {
    pub(super) arena: &'a NodeArena,
    pub(super) table: SymbolTable,
    pub(super) diagnostics: Diagnostics,
}

impl<'a> SemanticAnalysis<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        SemanticAnalysis {
            arena,
            table: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn run(mut self, root: NodeId) -> Analysis {
        let ok = match self.arena.get(root) {
            Some(_) => {
                let scope = self.table.root();
                self.walk(root, scope)
            }
            None => {
                self.diagnostics
                    .report(SemanticError::Malformed(NodeKind::Crate));
                false
            }
        };

        tracing::debug!(
            ok,
            errors = self.diagnostics.len(),
            scopes = self.table.scope_count(),
            "semantic analysis finished"
        );

        Analysis {
            table: self.table,
            diagnostics: self.diagnostics,
            ok,
        }
    }

    /// Checks `node`, then its children in order. Returns the conjunction of
    /// every check in the subtree.
    pub fn walk(&mut self, node: NodeId, scope: ScopeId) -> bool {
        let (mut ok, scope) = match self.arena.kind(node) {
            NodeKind::ItemFn => self.check_item_fn(node, scope),
            NodeKind::Arg => (self.check_arg(node, scope), scope),
            NodeKind::DeclLocal => (self.check_decl_local(node, scope), scope),
            NodeKind::ExprAssign => (self.check_assign(node, scope), scope),
            NodeKind::ExprIf => (self.check_predicate(node, 0, scope, "if"), scope),
            NodeKind::ExprWhile => (self.check_predicate(node, 1, scope, "while"), scope),
            NodeKind::Crate
            | NodeKind::Items
            | NodeKind::FnDecl
            | NodeKind::Args
            | NodeKind::PatIdent
            | NodeKind::TyPath
            | NodeKind::Ident
            | NodeKind::ExprBlock
            | NodeKind::ExprLit
            | NodeKind::ExprPath
            | NodeKind::ExprUnary
            | NodeKind::ExprBinary
            | NodeKind::LitInteger
            | NodeKind::LitFloat
            | NodeKind::LitStr
            | NodeKind::LitBool
            | NodeKind::None
            | NodeKind::Atom => (true, scope),
        };

        let arena = self.arena;
        for child in arena.children(node) {
            // No short-circuit: every child is visited.
            ok &= self.walk(*child, scope);
        }

        ok
    }

    fn check_item_fn(&mut self, node: NodeId, scope: ScopeId) -> (bool, ScopeId) {
        let body = self.table.push_scope(scope);

        let arena = self.arena;
        let Some(name) = arena.child(node, 0).and_then(|ident| arena.find_ident(ident)) else {
            self.diagnostics
                .report(SemanticError::Malformed(NodeKind::ItemFn));
            return (false, body);
        };

        let ok = self
            .table
            .insert(scope, name, Symbol::function(body), &mut self.diagnostics);

        (ok, body)
    }

    fn check_arg(&mut self, node: NodeId, scope: ScopeId) -> bool {
        let arena = self.arena;
        let (Some(name), Some(ty)) = (
            arena.child(node, 0).and_then(|pat| arena.find_ident(pat)),
            arena.child(node, 1),
        ) else {
            self.diagnostics.report(SemanticError::Malformed(NodeKind::Arg));
            return false;
        };

        if self.table.is_declared_in(scope, name) {
            self.diagnostics
                .report(SemanticError::Redeclared(name.to_string()));
            return false;
        }

        let Some(sort) = self.declared_sort(name, ty) else {
            return false;
        };

        match sort {
            Some(sort) => self.table.insert(
                scope,
                name,
                Symbol::variable(sort, scope),
                &mut self.diagnostics,
            ),
            None => {
                self.diagnostics
                    .report(SemanticError::CannotInfer(name.to_string()));
                false
            }
        }
    }

    fn check_decl_local(&mut self, node: NodeId, scope: ScopeId) -> bool {
        let arena = self.arena;
        let &[pat, ty, init] = arena.children(node) else {
            self.diagnostics
                .report(SemanticError::Malformed(NodeKind::DeclLocal));
            return false;
        };

        let Some(name) = arena.find_ident(pat) else {
            self.diagnostics
                .report(SemanticError::Malformed(NodeKind::DeclLocal));
            return false;
        };

        if self.table.is_declared_in(scope, name) {
            self.diagnostics
                .report(SemanticError::Redeclared(name.to_string()));
            return false;
        }

        let Some(declared) = self.declared_sort(name, ty) else {
            return false;
        };

        let inferred = match arena.kind(init) {
            NodeKind::None => Inferred::Unknown,
            _ => self.infer(scope, init, &format!("declaration of {name}")),
        };

        let sort = match (declared, inferred) {
            (_, Inferred::Failed) => return false,
            (Some(declared), Inferred::Sort(inferred)) if declared != inferred => {
                self.diagnostics.report(SemanticError::DeclarationMismatch {
                    name: name.to_string(),
                    declared,
                    inferred,
                });
                return false;
            }
            (Some(declared), _) => declared,
            (None, Inferred::Sort(inferred)) => inferred,
            (None, Inferred::Unknown) => {
                self.diagnostics
                    .report(SemanticError::CannotInfer(name.to_string()));
                return false;
            }
        };

        self.table.insert(
            scope,
            name,
            Symbol::variable(sort, scope),
            &mut self.diagnostics,
        )
    }

    /// Resolves a type position. `Some(None)` means no type was written,
    /// `None` that the written type is unknown (and has been reported).
    fn declared_sort(&mut self, name: &str, ty: NodeId) -> Option<Option<CanonicalSort>> {
        if self.arena.kind(ty) == NodeKind::None {
            return Some(None);
        }

        let tag = self.arena.find_ident(ty).unwrap_or_default();
        match types::resolve(tag) {
            Some(sort) => Some(Some(sort)),
            None => {
                self.diagnostics.report(SemanticError::UnknownType {
                    name: name.to_string(),
                    ty: tag.to_string(),
                });
                None
            }
        }
    }

    fn check_assign(&mut self, node: NodeId, scope: ScopeId) -> bool {
        let arena = self.arena;
        let &[target, source] = arena.children(node) else {
            self.diagnostics
                .report(SemanticError::Malformed(NodeKind::ExprAssign));
            return false;
        };

        // Only plain paths can be assigned to.
        let name = match arena.kind(target) {
            NodeKind::ExprPath => arena.find_ident(target),
            _ => None,
        };
        let Some(name) = name else {
            self.diagnostics
                .report(SemanticError::Malformed(NodeKind::ExprAssign));
            return false;
        };

        let expected = match self.table.lookup(scope, name, &mut self.diagnostics) {
            Some(SymbolType::Value(sort)) => sort,
            Some(SymbolType::FuncDecl) => {
                self.diagnostics
                    .report(SemanticError::NotAValue(name.to_string()));
                return false;
            }
            None => return false,
        };

        // The binding keeps its declared sort whatever happens here.
        match self.infer(scope, source, &format!("assignment to {name}")) {
            Inferred::Failed => false,
            Inferred::Unknown => true,
            Inferred::Sort(found) if found != expected => {
                self.diagnostics.report(SemanticError::AssignmentMismatch {
                    name: name.to_string(),
                    expected: SymbolType::Value(expected),
                    found,
                });
                false
            }
            Inferred::Sort(_) => true,
        }
    }

    fn check_predicate(
        &mut self,
        node: NodeId,
        position: usize,
        scope: ScopeId,
        construct: &'static str,
    ) -> bool {
        let Some(predicate) = self.arena.child(node, position) else {
            self.diagnostics
                .report(SemanticError::Malformed(self.arena.kind(node)));
            return false;
        };

        self.flow_predicate_check(scope, predicate, construct)
    }
}
