//! Declaration AST nodes

use super::Block;
use crate::common::Span;
use crate::types::TypeId;

/// Index of a top-level declaration in [`super::Module::decls`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

/// Identity of a `let` binding, assigned during name resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u32);

/// A name as written in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Top-level declaration node
#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn name(&self) -> &Ident {
        match &self.kind {
            DeclKind::Function(func) => &func.name,
            DeclKind::Struct(s) => &s.name,
        }
    }
}

/// Declaration kinds
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// Function definition: fn name(a: T, ...): R { ... }
    Function(FunctionDecl),

    /// Struct definition: struct S { f: T, ... }
    Struct(StructDecl),
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    /// Declared return type (builtin `void` when omitted)
    pub ret: TypeId,
    pub body: Block,
    /// Resolved return type (filled in during name resolution)
    pub resolved_ret: Option<TypeId>,
    /// Callable signature, with array parameters decayed to pointers
    pub ty: Option<TypeId>,
}

impl FunctionDecl {
    pub fn new(name: Ident, params: Vec<Param>, ret: TypeId, body: Block) -> Self {
        Self {
            name,
            params,
            ret,
            body,
            resolved_ret: None,
            ty: None,
        }
    }
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    /// Type annotation; `None` when the source omitted it
    pub ty: Option<TypeId>,
    /// Declared type as seen inside the body (arrays stay arrays)
    pub resolved: Option<TypeId>,
}

impl Param {
    pub fn new(name: Ident, ty: Option<TypeId>) -> Self {
        Self {
            name,
            ty,
            resolved: None,
        }
    }
}

/// Struct definition
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: Ident,
    pub fields: Vec<FieldDecl>,
    /// Nominal struct type (registered by the declaration validator)
    pub ty: Option<TypeId>,
}

impl StructDecl {
    pub fn new(name: Ident, fields: Vec<FieldDecl>) -> Self {
        Self {
            name,
            fields,
            ty: None,
        }
    }
}

/// Struct field
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TypeId,
}

impl FieldDecl {
    pub fn new(name: Ident, ty: TypeId) -> Self {
        Self { name, ty }
    }
}
