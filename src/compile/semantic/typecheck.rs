use crate::{
    compile::ast::{
        NodeId, NodeKind,
        parsed::UnaryOp,
    },
    datstructures::scope_tree::ScopeId,
};

use super::{
    SemanticError,
    symbols::SymbolType,
    types::{self, CanonicalSort},
    walker::SemanticAnalysis,
};

/// Outcome of typing an initializer or assignment source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inferred {
    Sort(CanonicalSort),
    // The expression carries no sort, which is not an error in itself.
    Unknown,
    // Typing failed and the failure has been reported.
    Failed,
}

pub fn homogeneous(sorts: &[CanonicalSort]) -> bool {
    sorts.windows(2).all(|pair| pair[0] == pair[1])
}

impl SemanticAnalysis<'_> {
    /// Collects the sorts of the leaf operands of a binary expression, left
    /// to right. `ok` is false when some leaf could not be classified; that
    /// leaf has already been reported. Homogeneity is left to the caller.
    pub fn binary_expr_types(
        &mut self,
        scope: ScopeId,
        node: NodeId,
    ) -> (Vec<CanonicalSort>, bool) {
        let mut sorts = Vec::new();
        let ok = self.collect_operand_sorts(scope, node, &mut sorts);

        (sorts, ok)
    }

    fn collect_operand_sorts(
        &mut self,
        scope: ScopeId,
        node: NodeId,
        sorts: &mut Vec<CanonicalSort>,
    ) -> bool {
        match self.arena.kind(node) {
            NodeKind::ExprBinary => {
                let (Some(lhs), Some(rhs)) = (self.arena.child(node, 1), self.arena.child(node, 2))
                else {
                    self.diagnostics
                        .report(SemanticError::Malformed(NodeKind::ExprBinary));
                    return false;
                };

                // Both sides are visited so every bad leaf gets reported.
                let lhs_ok = self.collect_operand_sorts(scope, lhs, sorts);
                let rhs_ok = self.collect_operand_sorts(scope, rhs, sorts);

                lhs_ok && rhs_ok
            }
            NodeKind::ExprUnary => {
                let Some(operand) = self.arena.child(node, 1) else {
                    self.diagnostics
                        .report(SemanticError::Malformed(NodeKind::ExprUnary));
                    return false;
                };

                self.collect_operand_sorts(scope, operand, sorts)
            }
            NodeKind::ExprPath | NodeKind::ExprLit => match self.leaf_sort(scope, node) {
                Some(sort) => {
                    sorts.push(sort);
                    true
                }
                None => false,
            },
            other => {
                self.diagnostics.report(SemanticError::InvalidOperand(other));
                false
            }
        }
    }

    /// Sort of a path or literal node. Failures are reported here, except
    /// for undeclared identifiers which the lookup reports itself.
    fn leaf_sort(&mut self, scope: ScopeId, node: NodeId) -> Option<CanonicalSort> {
        match self.arena.kind(node) {
            NodeKind::ExprPath => {
                let arena = self.arena;
                let name = arena.find_ident(node).unwrap_or_default();
                if name.is_empty() {
                    self.diagnostics
                        .report(SemanticError::Malformed(NodeKind::ExprPath));
                    return None;
                }

                match self.table.lookup(scope, name, &mut self.diagnostics)? {
                    SymbolType::Value(sort) => Some(sort),
                    SymbolType::FuncDecl => {
                        self.diagnostics
                            .report(SemanticError::NotAValue(name.to_string()));
                        None
                    }
                }
            }
            NodeKind::ExprLit => {
                let sort = self
                    .arena
                    .child(node, 0)
                    .map(|lit| self.arena.kind(lit))
                    .filter(NodeKind::is_literal)
                    .and_then(|kind| types::resolve(kind.as_str()));

                if sort.is_none() {
                    self.diagnostics
                        .report(SemanticError::Malformed(NodeKind::ExprLit));
                }

                sort
            }
            other => {
                self.diagnostics.report(SemanticError::InvalidOperand(other));
                None
            }
        }
    }

    /// Types the initializer of a declaration or the source of an
    /// assignment. `context` names the declaration or assignment for
    /// diagnostics.
    pub fn infer(&mut self, scope: ScopeId, node: NodeId, context: &str) -> Inferred {
        match self.arena.kind(node) {
            NodeKind::ExprLit | NodeKind::ExprPath => match self.leaf_sort(scope, node) {
                Some(sort) => Inferred::Sort(sort),
                None => Inferred::Failed,
            },
            NodeKind::ExprBinary => {
                let (sorts, ok) = self.binary_expr_types(scope, node);
                if !ok {
                    return Inferred::Failed;
                }

                if !homogeneous(&sorts) {
                    self.diagnostics
                        .report(SemanticError::BinaryMismatch(context.to_string()));
                    return Inferred::Failed;
                }

                // The expression takes the common sort of its operands,
                // comparisons included.
                match sorts.first() {
                    Some(sort) => Inferred::Sort(*sort),
                    None => Inferred::Unknown,
                }
            }
            NodeKind::ExprUnary => {
                let operand = self.arena.child(node, 1);
                let op = self
                    .arena
                    .child(node, 0)
                    .and_then(|op| self.arena.text(op))
                    .and_then(UnaryOp::from_tag);

                match (op, operand) {
                    (Some(_), Some(operand)) => self.infer(scope, operand, context),
                    _ => {
                        self.diagnostics
                            .report(SemanticError::Malformed(NodeKind::ExprUnary));
                        Inferred::Failed
                    }
                }
            }
            _ => Inferred::Unknown,
        }
    }

    /// Checks an `if`/`while` predicate. Only binary predicates are typed;
    /// anything else is accepted as is.
    pub fn flow_predicate_check(
        &mut self,
        scope: ScopeId,
        node: NodeId,
        construct: &'static str,
    ) -> bool {
        if self.arena.kind(node) != NodeKind::ExprBinary {
            return true;
        }

        let (sorts, ok) = self.binary_expr_types(scope, node);
        if !ok {
            return false;
        }

        if !homogeneous(&sorts) {
            self.diagnostics
                .report(SemanticError::FlowPredicate(construct));
            return false;
        }

        true
    }
}
