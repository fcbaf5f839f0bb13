//! Type arena and interner

use std::collections::HashMap;
use std::fmt;

use super::ty::{TypeId, TypeKind};
use crate::common::Span;
use crate::frontend::ast::DeclId;

/// Handles of the builtin types, created once per context
#[derive(Debug, Clone, Copy)]
struct Builtins {
    i8: TypeId,
    i16: TypeId,
    i32: TypeId,
    i64: TypeId,
    f32: TypeId,
    f64: TypeId,
    bool: TypeId,
    void: TypeId,
}

/// Sole owner of every type in a compilation
///
/// Pointer, array and function types are deduplicated on their structural
/// key. Unresolved and struct types are created fresh on every call. Nothing
/// is ever removed or changed once handed out.
#[derive(Debug)]
pub struct TypeContext {
    types: Vec<TypeKind>,
    pointers: HashMap<TypeId, TypeId>,
    arrays: HashMap<(TypeId, u32), TypeId>,
    functions: HashMap<(TypeId, Vec<TypeId>), TypeId>,
    builtins: Builtins,
    builtin_list: Vec<TypeId>,
}

impl TypeContext {
    pub fn new() -> Self {
        let mut types = Vec::new();
        let mut push = |kind: TypeKind| {
            types.push(kind);
            TypeId((types.len() - 1) as u32)
        };

        let builtins = Builtins {
            i8: push(TypeKind::Integer { width: 8, signed: true }),
            i16: push(TypeKind::Integer { width: 16, signed: true }),
            i32: push(TypeKind::Integer { width: 32, signed: true }),
            i64: push(TypeKind::Integer { width: 64, signed: true }),
            f32: push(TypeKind::FloatingPoint { width: 32 }),
            f64: push(TypeKind::FloatingPoint { width: 64 }),
            bool: push(TypeKind::Primitive { name: "bool" }),
            void: push(TypeKind::Primitive { name: "void" }),
        };
        let builtin_list = vec![
            builtins.i8,
            builtins.i16,
            builtins.i32,
            builtins.i64,
            builtins.f32,
            builtins.f64,
            builtins.bool,
            builtins.void,
        ];

        Self {
            types,
            pointers: HashMap::new(),
            arrays: HashMap::new(),
            functions: HashMap::new(),
            builtins,
            builtin_list,
        }
    }

    fn push(&mut self, kind: TypeKind) -> TypeId {
        self.types.push(kind);
        TypeId((self.types.len() - 1) as u32)
    }

    pub fn kind(&self, ty: TypeId) -> &TypeKind {
        &self.types[ty.index()]
    }

    /// Number of types allocated so far
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ==================== Interned composites ====================

    pub fn intern_pointer(&mut self, element: TypeId) -> TypeId {
        if let Some(&existing) = self.pointers.get(&element) {
            return existing;
        }
        let id = self.push(TypeKind::Pointer(element));
        self.pointers.insert(element, id);
        id
    }

    pub fn intern_array(&mut self, element: TypeId, size: u32) -> TypeId {
        if let Some(&existing) = self.arrays.get(&(element, size)) {
            return existing;
        }
        let id = self.push(TypeKind::Array { element, size });
        self.arrays.insert((element, size), id);
        id
    }

    pub fn intern_function(&mut self, ret: TypeId, params: Vec<TypeId>) -> TypeId {
        let key = (ret, params);
        if let Some(&existing) = self.functions.get(&key) {
            return existing;
        }
        let id = self.push(TypeKind::Function {
            ret,
            params: key.1.clone(),
        });
        self.functions.insert(key, id);
        id
    }

    // ==================== Fresh nodes ====================

    /// New placeholder for a type name written at `span`
    pub fn create_unresolved(&mut self, name: impl Into<String>, span: Span) -> TypeId {
        self.push(TypeKind::Unresolved {
            name: name.into(),
            span,
        })
    }

    /// New nominal type for the struct declared by `decl`
    pub fn create_struct(&mut self, name: impl Into<String>, decl: DeclId) -> TypeId {
        self.push(TypeKind::Struct {
            name: name.into(),
            decl,
        })
    }

    // ==================== Builtins ====================

    pub fn i8_type(&self) -> TypeId {
        self.builtins.i8
    }

    pub fn i16_type(&self) -> TypeId {
        self.builtins.i16
    }

    pub fn i32_type(&self) -> TypeId {
        self.builtins.i32
    }

    pub fn i64_type(&self) -> TypeId {
        self.builtins.i64
    }

    pub fn f32_type(&self) -> TypeId {
        self.builtins.f32
    }

    pub fn f64_type(&self) -> TypeId {
        self.builtins.f64
    }

    pub fn bool_type(&self) -> TypeId {
        self.builtins.bool
    }

    pub fn void_type(&self) -> TypeId {
        self.builtins.void
    }

    /// Every builtin, in declaration order
    pub fn builtin_types(&self) -> &[TypeId] {
        &self.builtin_list
    }

    // ==================== Queries ====================

    pub fn is_bool(&self, ty: TypeId) -> bool {
        ty == self.builtins.bool
    }

    pub fn is_integer(&self, ty: TypeId) -> bool {
        self.kind(ty).is_integer()
    }

    pub fn is_arithmetic(&self, ty: TypeId) -> bool {
        self.kind(ty).is_arithmetic()
    }

    pub fn is_pointer(&self, ty: TypeId) -> bool {
        self.kind(ty).is_pointer()
    }

    pub fn is_array(&self, ty: TypeId) -> bool {
        self.kind(ty).is_array()
    }

    /// Element type of a pointer or array type
    pub fn element_type(&self, ty: TypeId) -> Option<TypeId> {
        self.kind(ty).element()
    }

    /// Array element count
    pub fn array_size(&self, ty: TypeId) -> Option<u32> {
        match self.kind(ty) {
            TypeKind::Array { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Formats a type the way it is written in source
    pub fn display(&self, ty: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { ctx: self, ty }
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `Display` adapter returned by [`TypeContext::display`]
pub struct TypeDisplay<'a> {
    ctx: &'a TypeContext,
    ty: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ctx.kind(self.ty) {
            TypeKind::Primitive { name } => f.write_str(name),
            TypeKind::Integer { width, signed: true } => write!(f, "i{}", width),
            TypeKind::Integer { width, signed: false } => write!(f, "u{}", width),
            TypeKind::FloatingPoint { width } => write!(f, "f{}", width),
            TypeKind::Function { ret, params } => {
                write!(f, "{}(", self.ctx.display(*ret))?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", self.ctx.display(*param))?;
                }
                f.write_str(")")
            }
            TypeKind::Pointer(element) => write!(f, "*{}", self.ctx.display(*element)),
            TypeKind::Array { element, size } => {
                write!(f, "[{}, {}]", self.ctx.display(*element), size)
            }
            TypeKind::Struct { name, .. } | TypeKind::Unresolved { name, .. } => f.write_str(name),
        }
    }
}
