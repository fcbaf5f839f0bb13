//! Statement AST nodes

use super::{Expr, Ident, LocalId};
use crate::common::Span;
use crate::types::TypeId;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// If statement: if (cond) then [else else]
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop: while (cond) body
    While { condition: Expr, body: Box<Stmt> },

    /// Local binding: let x: T = value;
    Let(LetStmt),

    /// Return statement: return [expr];
    Return(Option<Expr>),

    /// Assignment: target = value;
    Assign { target: Expr, value: Expr },

    /// Expression statement: expr;
    Expr(Expr),

    /// Compound statement: { ... }
    Compound(Block),
}

/// `let` binding
#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: Ident,
    /// Type annotation; `None` when the source omitted it
    pub ty: Option<TypeId>,
    pub value: Option<Expr>,
    /// Resolved declared type
    pub resolved: Option<TypeId>,
    /// Binding identity (filled in during name resolution)
    pub local: Option<LocalId>,
}

impl LetStmt {
    pub fn new(name: Ident, ty: Option<TypeId>, value: Option<Expr>) -> Self {
        Self {
            name,
            ty,
            value,
            resolved: None,
            local: None,
        }
    }
}

/// Block (compound statement)
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }
}
