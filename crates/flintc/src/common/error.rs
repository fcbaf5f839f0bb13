//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::fmt;
use super::Span;
use thiserror::Error;

/// Every error the semantic passes can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemaErrorKind {
    DuplicateParameter,
    DuplicateField,
    DuplicateStructName,
    MissingTypeAnnotation,
    Redefinition,
    UndefinedSymbol,
    UnresolvedTypeName,
    CyclicStructDefinition,
    InvalidOperands,
    NotAPointer,
    NotAnLValue,
    ArityMismatch,
    ArgTypeMismatch,
    UnknownField,
    InvalidCast,
    HeterogeneousArrayLiteral,
    ArrayAssignmentForbidden,
    TypeMismatch,
    ReturnTypeMismatch,
    ConditionNotBool,
    NotCallable,
    NotIndexable,
    InvalidIndexType,
    NotAStruct,
}

impl SemaErrorKind {
    /// Stable code shown next to rendered diagnostics
    pub fn code(self) -> &'static str {
        match self {
            SemaErrorKind::DuplicateParameter => "E0001",
            SemaErrorKind::DuplicateField => "E0002",
            SemaErrorKind::DuplicateStructName => "E0003",
            SemaErrorKind::MissingTypeAnnotation => "E0101",
            SemaErrorKind::Redefinition => "E0102",
            SemaErrorKind::UndefinedSymbol => "E0103",
            SemaErrorKind::UnresolvedTypeName => "E0104",
            SemaErrorKind::CyclicStructDefinition => "E0105",
            SemaErrorKind::InvalidOperands => "E0201",
            SemaErrorKind::NotAPointer => "E0202",
            SemaErrorKind::NotAnLValue => "E0203",
            SemaErrorKind::ArityMismatch => "E0204",
            SemaErrorKind::ArgTypeMismatch => "E0205",
            SemaErrorKind::UnknownField => "E0206",
            SemaErrorKind::InvalidCast => "E0207",
            SemaErrorKind::HeterogeneousArrayLiteral => "E0208",
            SemaErrorKind::ArrayAssignmentForbidden => "E0209",
            SemaErrorKind::TypeMismatch => "E0210",
            SemaErrorKind::ReturnTypeMismatch => "E0211",
            SemaErrorKind::ConditionNotBool => "E0212",
            SemaErrorKind::NotCallable => "E0213",
            SemaErrorKind::NotIndexable => "E0214",
            SemaErrorKind::InvalidIndexType => "E0215",
            SemaErrorKind::NotAStruct => "E0216",
        }
    }

    /// Short headline used as the diagnostic title
    pub fn title(self) -> &'static str {
        match self {
            SemaErrorKind::DuplicateParameter => "duplicate parameter",
            SemaErrorKind::DuplicateField => "duplicate field",
            SemaErrorKind::DuplicateStructName => "duplicate struct",
            SemaErrorKind::MissingTypeAnnotation => "missing type annotation",
            SemaErrorKind::Redefinition => "redefinition",
            SemaErrorKind::UndefinedSymbol => "undefined symbol",
            SemaErrorKind::UnresolvedTypeName => "unknown type",
            SemaErrorKind::CyclicStructDefinition => "recursive struct",
            SemaErrorKind::InvalidOperands => "invalid operands",
            SemaErrorKind::NotAPointer => "not a pointer",
            SemaErrorKind::NotAnLValue => "not an lvalue",
            SemaErrorKind::ArityMismatch => "wrong number of arguments",
            SemaErrorKind::ArgTypeMismatch => "mismatched argument type",
            SemaErrorKind::UnknownField => "unknown field",
            SemaErrorKind::InvalidCast => "invalid cast",
            SemaErrorKind::HeterogeneousArrayLiteral => "mixed array literal",
            SemaErrorKind::ArrayAssignmentForbidden => "array assignment",
            SemaErrorKind::TypeMismatch => "mismatched types",
            SemaErrorKind::ReturnTypeMismatch => "mismatched return type",
            SemaErrorKind::ConditionNotBool => "non-bool condition",
            SemaErrorKind::NotCallable => "not callable",
            SemaErrorKind::NotIndexable => "not indexable",
            SemaErrorKind::InvalidIndexType => "invalid index",
            SemaErrorKind::NotAStruct => "not a struct",
        }
    }
}

impl fmt::Display for SemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Compile error with source location
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Semantic error at {span:?}: {message}")]
    Semantic {
        kind: SemaErrorKind,
        message: String,
        span: Span,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(kind: SemaErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self::Semantic {
            kind,
            message: message.into(),
            span,
        }
    }

    /// Semantic error kind, if this is a semantic error
    pub fn kind(&self) -> Option<SemaErrorKind> {
        match self {
            CompileError::Semantic { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lexer { span, .. }
            | CompileError::Parser { span, .. }
            | CompileError::Semantic { span, .. } => Some(*span),
            CompileError::Io(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CompileError::Lexer { message, .. }
            | CompileError::Parser { message, .. }
            | CompileError::Semantic { message, .. } => message.clone(),
            CompileError::Io(message) => message.clone(),
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        CompileError::Io(err.to_string())
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Consumer of located errors
///
/// The analysis core hands every error it finds to a sink; it never formats
/// or prints on its own.
pub trait DiagnosticSink {
    fn report(&mut self, file_id: usize, error: CompileError);
}

/// Sink that keeps every reported error, in report order
#[derive(Debug, Default)]
pub struct DiagnosticBuffer {
    errors: Vec<(usize, CompileError)>,
}

impl DiagnosticBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter().map(|(_, e)| e)
    }

    pub fn into_errors(self) -> Vec<CompileError> {
        self.errors.into_iter().map(|(_, e)| e).collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl DiagnosticSink for DiagnosticBuffer {
    fn report(&mut self, file_id: usize, error: CompileError) {
        self.errors.push((file_id, error));
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
    error_count: usize,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
            error_count: 0,
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Number of errors rendered so far
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Build the codespan diagnostic for an error without emitting it
    pub fn to_diagnostic(file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        match error {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Semantic { kind, message, span } => Diagnostic::error()
                .with_message(kind.title())
                .with_code(kind.code())
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    pub fn report_error(&mut self, file_id: usize, error: &CompileError) {
        self.error_count += 1;
        let diagnostic = Self::to_diagnostic(file_id, error);
        if let Err(err) = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic) {
            log::warn!("failed to render diagnostic: {}", err);
        }
    }
}

impl DiagnosticSink for DiagnosticReporter {
    fn report(&mut self, file_id: usize, error: CompileError) {
        self.report_error(file_id, &error);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::diagnostic::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_semantic_diagnostic_has_code_and_label() {
        let err = CompileError::semantic(
            SemaErrorKind::UnknownField,
            "no field 'z' on struct 'P'",
            Span::new(10, 13),
        );
        let diag = DiagnosticReporter::to_diagnostic(0, &err);

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.as_deref(), Some("E0206"));
        assert_eq!(diag.message, "unknown field");
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].range, 10..13);
        assert_eq!(diag.labels[0].message, "no field 'z' on struct 'P'");
    }

    #[test]
    fn test_buffer_preserves_order() {
        let mut buffer = DiagnosticBuffer::new();
        buffer.report(0, CompileError::parser("first", Span::new(0, 1)));
        buffer.report(0, CompileError::semantic(SemaErrorKind::TypeMismatch, "second", Span::new(2, 3)));

        let messages: Vec<_> = buffer.errors().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(buffer.into_errors()[1].kind(), Some(SemaErrorKind::TypeMismatch));
    }

    #[test]
    fn test_reporter_counts_errors() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("a.fl", "fn f() {}");
        reporter.report(file_id, CompileError::parser("oops", Span::new(0, 2)));
        assert_eq!(reporter.error_count(), 1);
    }
}
