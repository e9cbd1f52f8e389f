//! Scopes and symbols for semantic analysis.
//!
//! Scopes live in an arena and are addressed by [`ScopeId`]. The active chain
//! is tracked through `parent` links: pushing a scope makes it current,
//! popping it discards its symbols and makes the parent current again.

use std::collections::HashMap;

use lexa_syntax::ast::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Declared type
    pub ty: DataType,
    /// Line of the declaration (1-based)
    pub line: usize,
    pub col: usize,
    /// Scope that owns this symbol
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    /// Enclosing scope (None for the function body scope)
    pub parent: Option<ScopeId>,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    current: Option<ScopeId>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope nested in the current one and make it current.
    pub fn push(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: self.current,
            symbols: HashMap::new(),
        });
        self.current = Some(id);
        id
    }

    /// Close the current scope, dropping its symbols.
    pub fn pop(&mut self) -> Option<ScopeId> {
        let id = self.current?;
        let scope = &mut self.scopes[id.0];
        scope.symbols.clear();
        self.current = scope.parent;
        Some(id)
    }

    pub fn current(&self) -> Option<ScopeId> {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// Number of scopes on the active chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.current;
        while let Some(id) = cursor {
            depth += 1;
            cursor = self.scopes[id.0].parent;
        }
        depth
    }

    /// Declare `name` in the current scope. On a same-scope redeclaration the
    /// existing symbol is returned and nothing changes.
    pub fn declare(&mut self, name: &str, ty: DataType, line: usize, col: usize) -> Result<(), Symbol> {
        let id = match self.current {
            Some(id) => id,
            None => self.push(),
        };
        let scope = &mut self.scopes[id.0];
        if let Some(existing) = scope.symbols.get(name) {
            return Err(existing.clone());
        }
        scope.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                ty,
                line,
                col,
                scope: id,
            },
        );
        Ok(())
    }

    /// Resolve `name` from the current scope outward; first match wins.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut cursor = self.current;
        while let Some(id) = cursor {
            let scope = &self.scopes[id.0];
            if let Some(sym) = scope.symbols.get(name) {
                return Some(sym);
            }
            cursor = scope.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward_and_shadows() {
        let mut arena = ScopeArena::new();
        let outer = arena.push();
        arena.declare("x", DataType::Int, 1, 1).unwrap();
        let inner = arena.push();
        assert_eq!(arena.lookup("x").unwrap().scope, outer);
        arena.declare("x", DataType::String, 2, 1).unwrap();
        assert_eq!(arena.lookup("x").unwrap().ty, DataType::String);
        assert_eq!(arena.lookup("x").unwrap().scope, inner);
        assert_eq!(arena.depth(), 2);

        assert_eq!(arena.pop(), Some(inner));
        assert_eq!(arena.lookup("x").unwrap().ty, DataType::Int);
        assert!(arena.scope(inner).unwrap().is_empty());
        assert_eq!(arena.scope(inner).unwrap().parent, Some(outer));
    }

    #[test]
    fn redeclaration_returns_existing_symbol() {
        let mut arena = ScopeArena::new();
        arena.push();
        arena.declare("n", DataType::Int, 3, 5).unwrap();
        let existing = arena.declare("n", DataType::Float, 7, 5).unwrap_err();
        assert_eq!(existing.line, 3);
        assert_eq!(arena.lookup("n").unwrap().ty, DataType::Int);
    }

    #[test]
    fn popped_symbols_are_gone() {
        let mut arena = ScopeArena::new();
        arena.push();
        arena.push();
        arena.declare("tmp", DataType::Bool, 1, 1).unwrap();
        arena.pop();
        assert!(arena.lookup("tmp").is_none());
        arena.pop();
        assert_eq!(arena.current(), None);
        assert_eq!(arena.pop(), None);
    }
}
