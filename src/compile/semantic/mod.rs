use thiserror::Error;

use crate::{
    compile::ast::{NodeArena, NodeId, NodeKind},
    datstructures::scope_tree::ScopeError,
};

use symbols::{SymbolTable, SymbolType};
use types::CanonicalSort;

pub mod symbols;
pub mod typecheck;
pub mod types;
pub mod walker;

#[cfg(test)]
mod tests;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Redeclaration of {0}, identifier already declared in this scope")]
    Redeclared(String),

    #[error("Declaration of {name} invalid, unknown type `{ty}`")]
    UnknownType { name: String, ty: String },

    #[error("Declaration of {name} invalid, types mismatch (declared `{declared}`, inferred `{inferred}`)")]
    DeclarationMismatch {
        name: String,
        declared: CanonicalSort,
        inferred: CanonicalSort,
    },

    #[error("Declaration of {0} invalid, no type given and none can be inferred")]
    CannotInfer(String),

    #[error("Identifier {0} not found")]
    IdentifierNotFound(String),

    #[error("Assignment to {name} invalid, types mismatch (expected `{expected}`, found `{found}`)")]
    AssignmentMismatch {
        name: String,
        expected: SymbolType,
        found: CanonicalSort,
    },

    #[error("Identifier {0} names a function, not a value")]
    NotAValue(String),

    #[error("Invalid operand `{0}` in binary expression")]
    InvalidOperand(NodeKind),

    #[error("Invalid types for binary operation in {0}")]
    BinaryMismatch(String),

    #[error("Invalid types in flow control predicate of `{0}`")]
    FlowPredicate(&'static str),

    #[error("Malformed `{0}` node")]
    Malformed(NodeKind),

    #[error("Malformed scope: {0}")]
    Scope(ScopeError),
}

/// Ordered log of semantic errors. A single error anywhere clears the
/// success flag for good.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    errors: Vec<SemanticError>,
    success: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics {
            errors: Vec::new(),
            success: true,
        }
    }

    pub fn report(&mut self, error: SemanticError) {
        tracing::debug!(%error, "semantic error");

        self.errors.push(error);
        self.success = false;
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one analysis run: the populated symbol table, the diagnostics
/// and the conjunction of every local check.
#[derive(Debug)]
pub struct Analysis {
    pub table: SymbolTable,
    pub diagnostics: Diagnostics,
    pub ok: bool,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

pub fn analyze(arena: &NodeArena, root: NodeId) -> Analysis {
    walker::SemanticAnalysis::new(arena).run(root)
}
