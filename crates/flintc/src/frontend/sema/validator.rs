//! Declaration validation
//!
//! A flat pass over top-level declarations. Functions with duplicate
//! parameter names and structs with duplicate field names or an already
//! taken name are recorded in [`SemaInfo::invalid_decls`] and skipped by every
//! later pass. Every other struct gets its nominal type here.

use std::collections::{HashMap, HashSet};

use super::{Diagnostics, SemaInfo};
use crate::common::SemaErrorKind;
use crate::frontend::ast::{Decl, DeclId, DeclKind, FunctionDecl, StructDecl};
use crate::types::TypeContext;

pub struct Validator<'a> {
    types: &'a mut TypeContext,
    info: &'a mut SemaInfo,
    diags: &'a mut Diagnostics,
    /// Taken type names: builtins and registered structs
    type_names: HashMap<String, Option<DeclId>>,
}

impl<'a> Validator<'a> {
    pub fn new(types: &'a mut TypeContext, info: &'a mut SemaInfo, diags: &'a mut Diagnostics) -> Self {
        let type_names = types
            .builtin_types()
            .iter()
            .map(|&ty| (types.display(ty).to_string(), None))
            .collect();
        Self {
            types,
            info,
            diags,
            type_names,
        }
    }

    pub fn run(&mut self, decls: &mut [Decl]) {
        for (i, decl) in decls.iter_mut().enumerate() {
            let id = DeclId(i as u32);
            let valid = match &mut decl.kind {
                DeclKind::Function(func) => self.validate_function(func),
                DeclKind::Struct(s) => self.validate_struct(id, s),
            };
            if !valid {
                log::trace!("excluding declaration '{}'", decl.name().name);
                self.info.invalid_decls.insert(id);
            }
        }
    }

    fn validate_function(&mut self, func: &FunctionDecl) -> bool {
        let mut seen = HashSet::new();
        let mut valid = true;
        for param in &func.params {
            if !seen.insert(param.name.name.as_str()) {
                self.diags.error(
                    SemaErrorKind::DuplicateParameter,
                    format!(
                        "parameter '{}' is declared more than once in function '{}'",
                        param.name.name, func.name.name
                    ),
                    param.name.span,
                );
                valid = false;
            }
        }
        valid
    }

    fn validate_struct(&mut self, id: DeclId, s: &mut StructDecl) -> bool {
        let mut seen = HashSet::new();
        let mut valid = true;
        for field in &s.fields {
            if !seen.insert(field.name.name.as_str()) {
                self.diags.error(
                    SemaErrorKind::DuplicateField,
                    format!(
                        "field '{}' is declared more than once in struct '{}'",
                        field.name.name, s.name.name
                    ),
                    field.name.span,
                );
                valid = false;
            }
        }

        if let Some(previous) = self.type_names.get(&s.name.name) {
            let message = match previous {
                Some(_) => format!("struct '{}' is already defined", s.name.name),
                None => format!("struct '{}' conflicts with a builtin type", s.name.name),
            };
            self.diags.error(SemaErrorKind::DuplicateStructName, message, s.name.span);
            return false;
        }

        if valid {
            let ty = self.types.create_struct(s.name.name.clone(), id);
            debug_assert!(s.ty.is_none(), "struct type registered twice");
            s.ty = Some(ty);
            self.info.struct_types.push(ty);
            self.type_names.insert(s.name.name.clone(), Some(id));
        }
        valid
    }
}
