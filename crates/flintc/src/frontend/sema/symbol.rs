//! Symbols and the tables that describe them

use crate::common::Span;
use crate::frontend::ast::{DeclId, Ident, LocalId};
use crate::types::TypeId;

/// The declaration or binding a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Top-level function
    Function(DeclId),
    /// Parameter `index` of function `func`
    Param { func: DeclId, index: usize },
    /// `let` binding
    Local(LocalId),
}

impl Symbol {
    pub fn is_function(self) -> bool {
        matches!(self, Symbol::Function(_))
    }
}

/// What analysis knows about a symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub span: Span,
    /// Resolved type; `None` when resolution failed
    pub ty: Option<TypeId>,
}

impl SymbolInfo {
    pub fn new(ident: &Ident, ty: Option<TypeId>) -> Self {
        Self {
            name: ident.name.clone(),
            span: ident.span,
            ty,
        }
    }
}

/// Resolved struct field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub span: Span,
    pub ty: Option<TypeId>,
}
