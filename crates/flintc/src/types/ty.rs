//! Type representation

use crate::common::Span;
use crate::frontend::ast::DeclId;

/// Handle to a type owned by a [`super::TypeContext`]
///
/// Handles are plain indices: copying one never copies the type, and two
/// handles are equal iff they name the same arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(super) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `bool` and `void`
    Primitive { name: &'static str },

    /// Signed or unsigned integer of the given bit width
    Integer { width: u8, signed: bool },

    /// IEEE float of the given bit width
    FloatingPoint { width: u8 },

    /// Function signature
    Function { ret: TypeId, params: Vec<TypeId> },

    /// Pointer to `element`
    Pointer(TypeId),

    /// Fixed-size array, embedded by value
    Array { element: TypeId, size: u32 },

    /// Nominal struct type, one per valid struct declaration
    Struct { name: String, decl: DeclId },

    /// Type name written in source, not yet looked up
    Unresolved { name: String, span: Span },
}

impl TypeKind {
    pub fn is_integer(&self) -> bool {
        matches!(self, TypeKind::Integer { .. })
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, TypeKind::FloatingPoint { .. })
    }

    /// Integers and floats
    pub fn is_arithmetic(&self) -> bool {
        self.is_integer() || self.is_floating_point()
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeKind::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeKind::Array { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeKind::Unresolved { .. })
    }

    /// Element type of a pointer or array
    pub fn element(&self) -> Option<TypeId> {
        match self {
            TypeKind::Pointer(element) | TypeKind::Array { element, .. } => Some(*element),
            _ => None,
        }
    }
}
