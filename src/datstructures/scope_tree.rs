use std::collections::BTreeMap;

use thiserror::Error;

pub type ScopeId = usize;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Scope {0} does not exist")]
    UnknownScope(ScopeId),

    #[error("The key is already bound in scope {0}")]
    AlreadyBound(ScopeId),
}

#[derive(Clone, Debug)]
struct Scope<K, V> {
    parent: Option<ScopeId>,
    bindings: BTreeMap<K, V>,
}

/// A tree of lexical scopes. Every scope except the root has a parent, and
/// lookups walk from a scope towards the root, so inner bindings shadow
/// outer ones.
#[derive(Clone, Debug)]
pub struct ScopeTree<K, V> {
    scopes: Vec<Scope<K, V>>,
}

impl<K: Ord, V> ScopeTree<K, V> {
    pub const ROOT: ScopeId = 0;

    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope {
                parent: None,
                bindings: BTreeMap::new(),
            }],
        }
    }

    pub fn push(&mut self, parent: ScopeId) -> Result<ScopeId, ScopeError> {
        self.scope(parent)?;

        let id = self.scopes.len();
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: BTreeMap::new(),
        });

        Ok(id)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope).and_then(|s| s.parent)
    }

    /// Binds `k` in `scope` itself. Ancestors are not consulted, so a
    /// binding may shadow one further up, but never replace one in the
    /// same scope.
    pub fn insert(&mut self, scope: ScopeId, k: K, v: V) -> Result<(), ScopeError> {
        let bindings = &mut self.scope_mut(scope)?.bindings;

        if bindings.contains_key(&k) {
            return Err(ScopeError::AlreadyBound(scope));
        }

        bindings.insert(k, v);
        Ok(())
    }

    pub fn contains_local(&self, scope: ScopeId, k: &K) -> bool {
        self.scopes
            .get(scope)
            .is_some_and(|s| s.bindings.contains_key(k))
    }

    pub fn get_local(&self, scope: ScopeId, k: &K) -> Option<&V> {
        self.scopes.get(scope).and_then(|s| s.bindings.get(k))
    }

    pub fn lookup(&self, scope: ScopeId, k: &K) -> Option<&V> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = self.scopes.get(id)?;
            if let Some(v) = scope.bindings.get(k) {
                return Some(v);
            }

            current = scope.parent;
        }

        None
    }

    pub fn elements_at(&self, scope: ScopeId) -> impl Iterator<Item = (&K, &V)> {
        self.scopes
            .get(scope)
            .into_iter()
            .flat_map(|s| s.bindings.iter())
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.iter().all(|s| s.bindings.is_empty())
    }

    fn scope(&self, id: ScopeId) -> Result<&Scope<K, V>, ScopeError> {
        self.scopes.get(id).ok_or(ScopeError::UnknownScope(id))
    }

    fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope<K, V>, ScopeError> {
        self.scopes.get_mut(id).ok_or(ScopeError::UnknownScope(id))
    }
}

impl<K: Ord, V> Default for ScopeTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
