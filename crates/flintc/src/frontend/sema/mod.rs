//! Semantic analysis module
//!
//! Three passes run in order over a parsed [`Module`]:
//!
//! 1. [`Validator`] rejects duplicate parameters, fields and struct names and
//!    registers struct types.
//! 2. [`NameResolver`] binds every name reference and resolves every type
//!    annotation through the [`TypeResolver`].
//! 3. [`TypeChecker`] validates struct layouts for cycles with the
//!    [`TypeValidator`] and types every expression.
//!
//! Errors never abort analysis. Each pass reports and continues, so a single
//! run surfaces every independent problem in the module.

mod name_resolver;
mod scope;
mod symbol;
mod type_check;
mod type_resolver;
mod type_validator;
mod validator;

use std::collections::{HashMap, HashSet};

pub use name_resolver::NameResolver;
pub use scope::Scope;
pub use symbol::{FieldInfo, Symbol, SymbolInfo};
pub use type_check::{ExprResult, TypeChecker};
pub use type_resolver::TypeResolver;
pub use type_validator::TypeValidator;
pub use validator::Validator;

use crate::common::{CompileError, DiagnosticSink, SemaErrorKind, Span};
use crate::frontend::ast::{DeclId, Module};
use crate::types::TypeId;

/// Facts established by analysis that do not live on AST nodes
#[derive(Debug, Default)]
pub struct SemaInfo {
    pub symbols: HashMap<Symbol, SymbolInfo>,
    pub struct_fields: HashMap<TypeId, Vec<FieldInfo>>,
    /// Registered struct types, in declaration order
    pub struct_types: Vec<TypeId>,
    /// Declarations excluded from analysis after a validation failure
    pub invalid_decls: HashSet<DeclId>,
}

impl SemaInfo {
    pub fn symbol(&self, symbol: Symbol) -> Option<&SymbolInfo> {
        self.symbols.get(&symbol)
    }

    pub fn symbol_type(&self, symbol: Symbol) -> Option<TypeId> {
        self.symbols.get(&symbol).and_then(|info| info.ty)
    }

    pub fn fields(&self, struct_ty: TypeId) -> &[FieldInfo] {
        self.struct_fields
            .get(&struct_ty)
            .map_or(&[], |fields| fields.as_slice())
    }

    pub fn field(&self, struct_ty: TypeId, name: &str) -> Option<&FieldInfo> {
        self.fields(struct_ty).iter().find(|f| f.name == name)
    }

    pub fn is_valid(&self, decl: DeclId) -> bool {
        !self.invalid_decls.contains(&decl)
    }
}

/// Errors collected during analysis, in report order
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<CompileError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, kind: SemaErrorKind, message: impl Into<String>, span: Span) {
        let error = CompileError::semantic(kind, message, span);
        log::trace!("{}", error);
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<CompileError> {
        self.errors
    }
}

/// Result of analyzing one module
#[derive(Debug)]
pub struct Analysis {
    pub info: SemaInfo,
    pub error_count: usize,
}

impl Analysis {
    /// Whether the module may proceed to code generation
    pub fn is_ok(&self) -> bool {
        self.error_count == 0
    }
}

/// Runs the semantic passes over a module
pub struct SemanticAnalyzer {
    file_id: usize,
}

impl SemanticAnalyzer {
    /// `file_id` is the id the module's source was registered under with the
    /// diagnostic sink
    pub fn new(file_id: usize) -> Self {
        Self { file_id }
    }

    /// Analyze a module in place, reporting every error to `sink`
    pub fn analyze(&self, module: &mut Module, sink: &mut dyn DiagnosticSink) -> Analysis {
        let mut info = SemaInfo::default();
        let mut diags = Diagnostics::new();

        log::debug!("validating {} declarations", module.decls.len());
        Validator::new(&mut module.types, &mut info, &mut diags).run(&mut module.decls);

        log::debug!("resolving names");
        NameResolver::new(&mut module.types, &mut info, &mut diags).run(&mut module.decls);

        log::debug!("type checking");
        TypeChecker::new(&mut module.types, &info, &mut diags).run(&mut module.decls);

        let error_count = diags.len();
        log::debug!("semantic analysis finished with {} error(s)", error_count);
        for error in diags.into_errors() {
            sink.report(self.file_id, error);
        }

        Analysis { info, error_count }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Parse and analyze `source`, collecting errors instead of rendering them
#[cfg(test)]
pub(crate) fn analyze_source(source: &str) -> (Module, Analysis, Vec<CompileError>) {
    use crate::common::DiagnosticBuffer;
    use crate::frontend::parser::Parser;

    let mut module = Parser::new(source)
        .and_then(Parser::parse)
        .unwrap_or_else(|e| panic!("test source failed to parse: {}", e));
    let mut buffer = DiagnosticBuffer::new();
    let analysis = SemanticAnalyzer::new(0).analyze(&mut module, &mut buffer);
    (module, analysis, buffer.into_errors())
}

/// Error kinds of `errors`, in report order
#[cfg(test)]
pub(crate) fn error_kinds(errors: &[CompileError]) -> Vec<SemaErrorKind> {
    errors.iter().filter_map(CompileError::kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::{DeclKind, ExprKind, StmtKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_function_types_cleanly() {
        let (module, analysis, errors) =
            analyze_source("fn add(a: i32, b: i32): i32 { return a + b; }");
        assert_eq!(errors, vec![]);
        assert!(analysis.is_ok());

        let DeclKind::Function(add) = &module.decls[0].kind else {
            panic!("expected function");
        };
        let ty = add.ty.unwrap();
        assert_eq!(module.types.display(ty).to_string(), "i32(i32,i32)");
        assert_eq!(analysis.info.symbol_type(Symbol::Function(DeclId(0))), Some(ty));
    }

    #[test]
    fn test_let_initializer_mismatch() {
        let source = "fn f() : i32 { let x: bool = 1; }";
        let (_, analysis, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::TypeMismatch]);
        assert_eq!(errors[0].span().map(|s| s.text(source)), Some("1"));
        assert_eq!(analysis.error_count, 1);
    }

    #[test]
    fn test_unknown_field() {
        let source = "struct P { x: i32, y: i32 } fn f(p: P): i32 { return p.z; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::UnknownField]);
        assert_eq!(errors[0].span().map(|s| s.text(source)), Some("z"));
    }

    #[test]
    fn test_duplicate_parameter_excludes_function() {
        let source = "fn f(a: i32, a: i32): i32 { return a; } fn g(): i32 { return f(1, 2); }";
        let (_, analysis, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::DuplicateParameter, SemaErrorKind::UndefinedSymbol]
        );
        assert!(!analysis.info.is_valid(DeclId(0)));
        assert!(analysis.info.symbol(Symbol::Function(DeclId(0))).is_none());
    }

    #[test]
    fn test_non_bool_while_condition() {
        let source = "fn f(): i32 { while (1) { } }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::ConditionNotBool]);
        assert_eq!(errors[0].span().map(|s| s.text(source)), Some("1"));
    }

    #[test]
    fn test_every_expression_is_typed() {
        let source = "
            struct P { x: i32, next: *P }
            fn f(p: *P, xs: [i32, 2]): i32 {
                let q: P = *p;
                let s: i32 = q.x + xs[1] * (p.next as i32 == 0) as i32;
                return s;
            }
        ";
        // `p.next` on a pointer is not a field access; everything built on it
        // stays quiet
        let (module, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::NotAStruct]);

        let DeclKind::Function(f) = &module.decls[1].kind else {
            panic!("expected function");
        };
        let StmtKind::Let(q) = &f.body.stmts[0].kind else {
            panic!("expected let");
        };
        let value = q.value.as_ref().unwrap();
        assert!(matches!(value.kind, ExprKind::Unary { .. }));
        assert_eq!(value.ty, q.resolved);
        assert!(value.lvalue);
    }

    #[test]
    fn test_errors_reach_the_sink_in_order() {
        let source = "fn f(): i32 { return y; } fn g() { let b: bool = 2; }";
        let (_, analysis, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::UndefinedSymbol, SemaErrorKind::TypeMismatch]
        );
        assert_eq!(analysis.error_count, errors.len());
    }
}
