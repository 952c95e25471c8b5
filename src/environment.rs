use std::collections::HashMap;

use tracing::trace;

use crate::{error::RuntimeError, token::Token, value::Value};

/// Handle to a scope stored in an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Default)]
struct Scope {
    bindings: HashMap<String, Value>,
    enclosing: Option<ScopeId>,
}

/// Chain of lexical scopes. Scopes live in an arena and point at their
/// parent by handle; the global scope is created up front and never removed.
///
/// Declarations always land in the current (innermost) scope, while lookups
/// and assignments walk outward through the `enclosing` links.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
            current: ScopeId(0),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Number of scopes in the active chain, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Opens a child of the current scope and makes it current.
    pub fn nest(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            bindings: HashMap::new(),
            enclosing: Some(self.current),
        });
        self.current = id;
        trace!(depth = self.scopes.len(), "scope opened");
        id
    }

    /// Discards the current scope and returns to its parent. The global
    /// scope is never discarded.
    pub fn unnest(&mut self) {
        if self.scopes.len() == 1 {
            return;
        }

        if let Some(scope) = self.scopes.pop() {
            self.current = scope.enclosing.unwrap_or(ScopeId(0));
        }
        trace!(depth = self.scopes.len(), "scope closed");
    }

    /// Binds `name` in the current scope, replacing any binding of the same
    /// name there. Bindings in enclosing scopes are left untouched.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.scopes[self.current.0]
            .bindings
            .insert(name.into(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.resolve(&name.lexeme)
            .and_then(|id| self.scopes[id.0].bindings.get(&name.lexeme))
            .cloned()
            .ok_or_else(|| undefined(name))
    }

    /// Overwrites the nearest existing binding of `name`. Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let id = self.resolve(&name.lexeme).ok_or_else(|| undefined(name))?;
        self.scopes[id.0]
            .bindings
            .insert(name.lexeme.clone(), value);
        Ok(())
    }

    fn resolve(&self, name: &str) -> Option<ScopeId> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0];
            if scope.bindings.contains_key(name) {
                return Some(id);
            }
            scope_id = scope.enclosing;
        }

        None
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(name, format!("undefined variable '{}'.", name.lexeme))
}
