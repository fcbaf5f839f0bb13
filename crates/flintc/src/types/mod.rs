//! Type model and the program-wide type context
//!
//! Every `Type` lives in a [`TypeContext`] arena and is referred to through a
//! [`TypeId`] handle. Composite types are hash-consed, so two handles compare
//! equal exactly when they denote the same type.

mod context;
mod ty;

pub use context::{TypeContext, TypeDisplay};
pub use ty::{TypeId, TypeKind};
