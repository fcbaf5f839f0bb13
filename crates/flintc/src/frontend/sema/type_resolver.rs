//! Type name resolution

use std::collections::HashMap;

use crate::types::{TypeContext, TypeId, TypeKind};

/// Rewrites unresolved type trees into canonical concrete types
///
/// The name table holds every builtin plus every validated struct.
#[derive(Debug)]
pub struct TypeResolver {
    names: HashMap<String, TypeId>,
}

impl TypeResolver {
    pub fn new(types: &TypeContext, struct_types: &[TypeId]) -> Self {
        let mut names = HashMap::new();
        for &ty in types.builtin_types().iter().chain(struct_types) {
            names.insert(types.display(ty).to_string(), ty);
        }
        Self { names }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Resolve `ty`, rebuilding pointer, array and function wrappers through
    /// the interner.
    ///
    /// On failure returns the `Unresolved` leaf whose name is unknown.
    pub fn resolve(&self, types: &mut TypeContext, ty: TypeId) -> Result<TypeId, TypeId> {
        match types.kind(ty).clone() {
            TypeKind::Unresolved { name, .. } => self.lookup(&name).ok_or(ty),
            TypeKind::Pointer(element) => {
                let element = self.resolve(types, element)?;
                Ok(types.intern_pointer(element))
            }
            TypeKind::Array { element, size } => {
                let element = self.resolve(types, element)?;
                Ok(types.intern_array(element, size))
            }
            TypeKind::Function { ret, params } => {
                let ret = self.resolve(types, ret)?;
                let params = params
                    .into_iter()
                    .map(|p| self.resolve(types, p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(types.intern_function(ret, params))
            }
            TypeKind::Primitive { .. }
            | TypeKind::Integer { .. }
            | TypeKind::FloatingPoint { .. }
            | TypeKind::Struct { .. } => Ok(ty),
        }
    }
}
