//! Flint compiler - front end and semantic analyzer for the Flint language
//!
//! Flint is a small statically typed language with C-like syntax: functions,
//! structs, pointers, fixed-size arrays and explicit casts.
//!
//! ## Architecture
//!
//! The compiler is organized into:
//! - **Frontend** (`frontend/`): lexing, parsing and semantic analysis
//! - **Driver** (`driver/`): file handling and pipeline orchestration
//! - **Common** (`common/`): shared infrastructure (errors, spans, diagnostics)
//! - **Types** (`types/`): the type model and the interning type context

pub mod common;
pub mod driver;
pub mod frontend;
pub mod types;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, SemaErrorKind, Span};
pub use driver::{Pipeline, Summary};
pub use frontend::{CompileContext, Compilation, Frontend, FrontendConfig};
pub use types::{TypeContext, TypeId, TypeKind};
