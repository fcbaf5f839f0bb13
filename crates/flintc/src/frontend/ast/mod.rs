//! Abstract Syntax Tree definitions
//!
//! The parser produces a tree whose type annotations are `Unresolved`
//! handles and whose name references are unbound. Semantic analysis fills in
//! the `Option` annotation slots in place.

mod decl;
mod expr;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use stmt::*;

use crate::types::TypeContext;

/// A complete source file together with the types it mentions
#[derive(Debug)]
pub struct Module {
    pub decls: Vec<Decl>,
    pub types: TypeContext,
}

impl Module {
    pub fn new(decls: Vec<Decl>, types: TypeContext) -> Self {
        Self { decls, types }
    }

    /// Declarations paired with their ids, in source order
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId(i as u32), decl))
    }

    pub fn functions(&self) -> impl Iterator<Item = (DeclId, &FunctionDecl)> {
        self.iter().filter_map(|(id, decl)| match &decl.kind {
            DeclKind::Function(func) => Some((id, func)),
            DeclKind::Struct(_) => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = (DeclId, &StructDecl)> {
        self.iter().filter_map(|(id, decl)| match &decl.kind {
            DeclKind::Struct(s) => Some((id, s)),
            DeclKind::Function(_) => None,
        })
    }
}
