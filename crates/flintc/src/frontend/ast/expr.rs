//! Expression AST nodes

use super::Ident;
use crate::common::Span;
use crate::frontend::sema::Symbol;
use crate::types::TypeId;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Type of this expression (filled in during semantic analysis)
    pub ty: Option<TypeId>,
    /// Whether this expression denotes addressable storage
    pub lvalue: bool,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
            lvalue: false,
        }
    }

    /// Record the checked type of this expression
    pub fn annotate(&mut self, ty: Option<TypeId>, lvalue: bool) {
        debug_assert!(self.ty.is_none(), "expression type set twice");
        self.ty = ty;
        self.lvalue = lvalue;
    }

    /// Symbol bound to a name reference, if this is one
    pub fn symbol(&self) -> Option<Symbol> {
        match &self.kind {
            ExprKind::Named { symbol, .. } => *symbol,
            _ => None,
        }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Literal: 42, 1.5, true
    Literal(Literal),

    /// Binary operation: a + b, x < y
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation: -x, !flag, *ptr, &x
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Function call: foo(a, b)
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// Name reference: foo
    Named {
        ident: Ident,
        /// Bound declaration (filled in during name resolution)
        symbol: Option<Symbol>,
    },

    /// Field access: obj.field
    Dot { base: Box<Expr>, field: Ident },

    /// Cast: expr as T
    Cast {
        operand: Box<Expr>,
        target: TypeId,
        /// Resolved target type
        resolved: Option<TypeId>,
    },

    /// Subscript: arr[i]
    Subscript { base: Box<Expr>, index: Box<Expr> },

    /// Array literal: [a, b, c]
    ArrayLiteral(Vec<Expr>),
}

/// Literal values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(u64),
    Float(f64),
    Bool(bool),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Bitwise
    BitOr,
    BitXor,
    Shl,
    Shr,

    // Logical
    LogAnd,
    LogOr,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::LogAnd => "&&",
            BinaryOp::LogOr => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,   // +x
    Neg,    // -x
    Not,    // !x
    BitNot, // ~x
    Deref,  // *p
    AddrOf, // &x
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Deref => "*",
            UnaryOp::AddrOf => "&",
        }
    }
}
