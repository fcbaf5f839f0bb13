//! Struct cycle detection
//!
//! A struct that contains itself by value, directly, through another struct
//! or through a fixed-size array, has no finite layout. Pointers break the
//! chain.

use std::collections::HashMap;

use super::{Diagnostics, SemaInfo};
use crate::common::{SemaErrorKind, Span};
use crate::types::{TypeContext, TypeId, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

pub struct TypeValidator<'a> {
    types: &'a TypeContext,
    info: &'a SemaInfo,
    diags: &'a mut Diagnostics,
    marks: HashMap<TypeId, Mark>,
}

impl<'a> TypeValidator<'a> {
    pub fn new(types: &'a TypeContext, info: &'a SemaInfo, diags: &'a mut Diagnostics) -> Self {
        Self {
            types,
            info,
            diags,
            marks: HashMap::new(),
        }
    }

    pub fn validate(&mut self, ty: TypeId) {
        if self.marks.contains_key(&ty) {
            return;
        }

        let (types, info) = (self.types, self.info);
        debug_assert!(
            !types.kind(ty).is_unresolved(),
            "unresolved type reached cycle detection"
        );
        match types.kind(ty) {
            TypeKind::Struct { name, .. } => {
                self.marks.insert(ty, Mark::Visiting);
                for field in info.fields(ty) {
                    if let Some(field_ty) = field.ty {
                        self.validate_field(name, &field.name, field_ty, field.span);
                    }
                }
                self.marks.insert(ty, Mark::Visited);
            }
            TypeKind::Unresolved { name, .. } => {
                log::error!("unresolved type '{}' reached cycle detection", name);
            }
            _ => {
                self.marks.insert(ty, Mark::Visited);
            }
        }
    }

    /// Check the type of field `field` of struct `owner`
    fn validate_field(&mut self, owner: &str, field: &str, ty: TypeId, span: Span) {
        let types = self.types;
        match types.kind(ty) {
            TypeKind::Pointer(_) => {}
            TypeKind::Array { element, .. } => self.validate_field(owner, field, *element, span),
            _ if self.marks.get(&ty) == Some(&Mark::Visiting) => {
                self.diags.error(
                    SemaErrorKind::CyclicStructDefinition,
                    format!(
                        "field '{}' makes struct '{}' contain '{}' by value",
                        field,
                        owner,
                        types.display(ty)
                    ),
                    span,
                );
            }
            _ => self.validate(ty),
        }
    }
}
