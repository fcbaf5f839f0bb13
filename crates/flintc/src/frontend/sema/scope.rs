//! Scope management

use super::Symbol;
use std::collections::HashMap;

/// A lexical scope mapping names to symbols
#[derive(Debug)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            parent: None,
        }
    }

    pub fn with_parent(parent: Scope) -> Self {
        Self {
            symbols: HashMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Bind `name` in this scope; on conflict returns the existing binding
    pub fn define(&mut self, name: &str, symbol: Symbol) -> Result<(), Symbol> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(*existing);
        }
        self.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        if let Some(sym) = self.symbols.get(name) {
            Some(*sym)
        } else if let Some(parent) = &self.parent {
            parent.lookup(name)
        } else {
            None
        }
    }

    pub fn lookup_local(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    /// Number of enclosing scopes
    pub fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |p| p.depth() + 1)
    }

    /// Take the parent scope, replacing self with the parent
    pub fn pop_to_parent(&mut self) -> bool {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
            true
        } else {
            false
        }
    }

    /// Push a new child scope
    pub fn push_child(&mut self) {
        let old_scope = std::mem::replace(self, Scope::new());
        *self = Scope::with_parent(old_scope);
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::{DeclId, LocalId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shadowing_and_pop() {
        let outer = Symbol::Local(LocalId(0));
        let inner = Symbol::Local(LocalId(1));

        let mut scope = Scope::new();
        scope.define("x", outer).unwrap();

        scope.push_child();
        assert_eq!(scope.depth(), 1);
        assert_eq!(scope.lookup("x"), Some(outer));
        assert_eq!(scope.lookup_local("x"), None);
        scope.define("x", inner).unwrap();
        assert_eq!(scope.lookup("x"), Some(inner));

        assert!(scope.pop_to_parent());
        assert_eq!(scope.lookup("x"), Some(outer));
        assert!(!scope.pop_to_parent());
    }

    #[test]
    fn test_redefinition_returns_existing() {
        let first = Symbol::Function(DeclId(0));
        let mut scope = Scope::new();
        scope.define("f", first).unwrap();
        assert_eq!(scope.define("f", Symbol::Function(DeclId(1))), Err(first));
        assert_eq!(scope.lookup("f"), Some(first));
    }
}
