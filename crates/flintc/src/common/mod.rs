//! Common infrastructure shared across the front end and the semantic passes

mod error;
mod span;

pub use error::{
    CompileError, CompileResult, DiagnosticBuffer, DiagnosticReporter, DiagnosticSink,
    SemaErrorKind,
};
pub use span::Span;
