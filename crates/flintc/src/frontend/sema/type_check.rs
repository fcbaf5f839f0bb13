//! Type checking
//!
//! The final pass. Every expression gets its type and lvalue flag written
//! back onto its node. A `None` type marks a subtree whose error has already
//! been reported; operations over it stay silent so one mistake produces one
//! diagnostic.

use super::{Diagnostics, SemaInfo, TypeValidator};
use crate::common::{SemaErrorKind, Span};
use crate::frontend::ast::*;
use crate::types::{TypeContext, TypeId, TypeKind};

/// Type and value category of a checked expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprResult {
    pub ty: Option<TypeId>,
    pub lvalue: bool,
}

impl ExprResult {
    pub fn rvalue(ty: TypeId) -> Self {
        Self {
            ty: Some(ty),
            lvalue: false,
        }
    }

    /// Result denoting addressable storage
    pub fn place(ty: TypeId) -> Self {
        Self {
            ty: Some(ty),
            lvalue: true,
        }
    }

    /// Result of a subtree that already reported an error
    pub fn error() -> Self {
        Self {
            ty: None,
            lvalue: false,
        }
    }
}

pub struct TypeChecker<'a> {
    types: &'a mut TypeContext,
    info: &'a SemaInfo,
    diags: &'a mut Diagnostics,
    /// Declared return type of the function being checked
    return_type: Option<TypeId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(types: &'a mut TypeContext, info: &'a SemaInfo, diags: &'a mut Diagnostics) -> Self {
        Self {
            types,
            info,
            diags,
            return_type: None,
        }
    }

    pub fn run(&mut self, decls: &mut [Decl]) {
        let info = self.info;
        {
            let mut validator = TypeValidator::new(&*self.types, info, &mut *self.diags);
            for &ty in &info.struct_types {
                validator.validate(ty);
            }
        }

        for (i, decl) in decls.iter_mut().enumerate() {
            if !info.is_valid(DeclId(i as u32)) {
                continue;
            }
            if let DeclKind::Function(func) = &mut decl.kind {
                self.check_function(func);
            }
        }
    }

    fn check_function(&mut self, func: &mut FunctionDecl) {
        log::trace!("checking function '{}'", func.name.name);
        self.return_type = func.resolved_ret;
        self.check_block(&mut func.body);
        self.return_type = None;
    }

    // =========================================================================
    // Diagnostics helpers
    // =========================================================================

    fn name(&self, ty: TypeId) -> String {
        self.types.display(ty).to_string()
    }

    fn mismatch(&mut self, kind: SemaErrorKind, expected: TypeId, found: TypeId, span: Span) {
        let message = format!("expected '{}', found '{}'", self.name(expected), self.name(found));
        self.diags.error(kind, message, span);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn check_block(&mut self, block: &mut Block) {
        for stmt in &mut block.stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition);
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.check_condition(condition);
                self.check_stmt(body);
            }
            StmtKind::Let(let_stmt) => self.check_let(let_stmt),
            StmtKind::Return(value) => self.check_return(value.as_mut(), span),
            StmtKind::Assign { target, value } => self.check_assign(target, value),
            StmtKind::Expr(expr) => {
                self.check_expr(expr);
            }
            StmtKind::Compound(block) => self.check_block(block),
        }
    }

    fn check_condition(&mut self, condition: &mut Expr) {
        let result = self.check_expr(condition);
        if let Some(ty) = result.ty {
            if !self.types.is_bool(ty) {
                let message = format!("expected 'bool' condition, found '{}'", self.name(ty));
                self.diags.error(SemaErrorKind::ConditionNotBool, message, condition.span);
            }
        }
    }

    fn check_let(&mut self, let_stmt: &mut LetStmt) {
        let Some(value) = &mut let_stmt.value else {
            return;
        };
        let result = self.check_expr(value);

        let (Some(declared), Some(actual)) = (let_stmt.resolved, result.ty) else {
            return;
        };
        if !self.initializer_fits(declared, actual) {
            self.mismatch(SemaErrorKind::TypeMismatch, declared, actual, value.span);
        }
    }

    /// An array initializer may be shorter than the declared buffer
    fn initializer_fits(&self, declared: TypeId, actual: TypeId) -> bool {
        if declared == actual {
            return true;
        }
        match (self.types.kind(declared), self.types.kind(actual)) {
            (
                TypeKind::Array { element: de, size: ds },
                TypeKind::Array { element: ae, size: as_ },
            ) => de == ae && ds >= as_,
            _ => false,
        }
    }

    fn check_return(&mut self, value: Option<&mut Expr>, span: Span) {
        let (actual, at) = match value {
            Some(value) => (self.check_expr(value).ty, value.span),
            None => (Some(self.types.void_type()), span),
        };

        if let (Some(expected), Some(actual)) = (self.return_type, actual) {
            if expected != actual {
                self.mismatch(SemaErrorKind::ReturnTypeMismatch, expected, actual, at);
            }
        }
    }

    fn check_assign(&mut self, target: &mut Expr, value: &mut Expr) {
        let place = self.check_place(target);
        let result = self.check_expr(value);

        let Some(target_ty) = place.ty else {
            return;
        };
        if !place.lvalue {
            self.diags.error(
                SemaErrorKind::NotAnLValue,
                "cannot assign to this expression",
                target.span,
            );
            return;
        }
        if self.types.is_array(target_ty) {
            let message = format!("cannot assign to array of type '{}'", self.name(target_ty));
            self.diags.error(SemaErrorKind::ArrayAssignmentForbidden, message, target.span);
            return;
        }
        if let Some(value_ty) = result.ty {
            if value_ty != target_ty {
                self.mismatch(SemaErrorKind::TypeMismatch, target_ty, value_ty, value.span);
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Check an expression read as a value
    ///
    /// Place expressions of array type decay to a pointer to their first
    /// element.
    pub fn check_expr(&mut self, expr: &mut Expr) -> ExprResult {
        let mut result = self.infer(expr);
        if Self::is_place(&expr.kind) {
            result.ty = result.ty.map(|ty| self.decay(ty));
        }
        expr.annotate(result.ty, result.lvalue);
        result
    }

    /// Check an expression used as storage: assignment targets and `&`
    /// operands keep their array type
    pub fn check_place(&mut self, expr: &mut Expr) -> ExprResult {
        let result = self.infer(expr);
        expr.annotate(result.ty, result.lvalue);
        result
    }

    fn is_place(kind: &ExprKind) -> bool {
        matches!(
            kind,
            ExprKind::Named { .. }
                | ExprKind::Subscript { .. }
                | ExprKind::Dot { .. }
                | ExprKind::Unary {
                    op: UnaryOp::Deref,
                    ..
                }
        )
    }

    fn decay(&mut self, ty: TypeId) -> TypeId {
        match *self.types.kind(ty) {
            TypeKind::Array { element, .. } => self.types.intern_pointer(element),
            _ => ty,
        }
    }

    fn infer(&mut self, expr: &mut Expr) -> ExprResult {
        let span = expr.span;
        match &mut expr.kind {
            ExprKind::Literal(literal) => ExprResult::rvalue(match literal {
                Literal::Int(_) => self.types.i32_type(),
                Literal::Float(_) => self.types.f32_type(),
                Literal::Bool(_) => self.types.bool_type(),
            }),
            ExprKind::Named { symbol, .. } => match *symbol {
                Some(symbol) => ExprResult {
                    ty: self.info.symbol_type(symbol),
                    lvalue: !symbol.is_function(),
                },
                None => ExprResult::error(),
            },
            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right, span),
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand, span),
            ExprKind::Call { callee, args } => self.check_call(callee, args, span),
            ExprKind::Dot { base, field } => self.check_dot(base, field),
            ExprKind::Cast {
                operand, resolved, ..
            } => self.check_cast(operand, *resolved, span),
            ExprKind::Subscript { base, index } => self.check_subscript(base, index),
            ExprKind::ArrayLiteral(elements) => self.check_array_literal(elements),
        }
    }

    fn check_binary(&mut self, op: BinaryOp, left: &mut Expr, right: &mut Expr, span: Span) -> ExprResult {
        let l = self.check_expr(left);
        let r = self.check_expr(right);
        let (Some(lt), Some(rt)) = (l.ty, r.ty) else {
            return ExprResult::error();
        };

        let t = &*self.types;
        let bool_ty = t.bool_type();
        let same = lt == rt;
        let result = match op {
            BinaryOp::Add | BinaryOp::Sub => {
                if same && t.is_arithmetic(lt) {
                    Some(lt)
                } else if t.is_pointer(lt) && t.is_integer(rt) {
                    Some(lt)
                } else if t.is_integer(lt) && t.is_pointer(rt) {
                    Some(rt)
                } else {
                    None
                }
            }
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (same && t.is_arithmetic(lt)).then_some(lt),
            BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr => {
                (same && t.is_integer(lt)).then_some(lt)
            }
            BinaryOp::LogAnd | BinaryOp::LogOr => (t.is_bool(lt) && t.is_bool(rt)).then_some(bool_ty),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                (same && (t.is_arithmetic(lt) || t.is_pointer(lt))).then_some(bool_ty)
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                let comparable = same && (t.is_arithmetic(lt) || t.is_pointer(lt));
                (comparable || t.is_bool(lt) || t.is_bool(rt)).then_some(bool_ty)
            }
        };

        match result {
            Some(ty) => ExprResult::rvalue(ty),
            None => {
                let message = format!(
                    "cannot apply '{}' to '{}' and '{}'",
                    op.as_str(),
                    self.name(lt),
                    self.name(rt)
                );
                self.diags.error(SemaErrorKind::InvalidOperands, message, span);
                ExprResult::error()
            }
        }
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &mut Expr, span: Span) -> ExprResult {
        if op == UnaryOp::AddrOf {
            let result = self.check_place(operand);
            let Some(ty) = result.ty else {
                return ExprResult::error();
            };
            if !result.lvalue {
                self.diags.error(
                    SemaErrorKind::NotAnLValue,
                    "cannot take the address of this expression",
                    operand.span,
                );
                return ExprResult::error();
            }
            return ExprResult::rvalue(self.types.intern_pointer(ty));
        }

        let result = self.check_expr(operand);
        let Some(ty) = result.ty else {
            return ExprResult::error();
        };

        if op == UnaryOp::Deref {
            return match self.types.kind(ty) {
                TypeKind::Pointer(element) => ExprResult::place(*element),
                _ => {
                    let message = format!("cannot dereference '{}'", self.name(ty));
                    self.diags.error(SemaErrorKind::NotAPointer, message, operand.span);
                    ExprResult::error()
                }
            };
        }

        let ok = match op {
            UnaryOp::Plus | UnaryOp::Neg => self.types.is_arithmetic(ty),
            UnaryOp::Not => self.types.is_bool(ty),
            UnaryOp::BitNot => self.types.is_integer(ty),
            UnaryOp::Deref | UnaryOp::AddrOf => unreachable!("handled above"),
        };
        if ok {
            ExprResult::rvalue(ty)
        } else {
            let message = format!("cannot apply unary '{}' to '{}'", op.as_str(), self.name(ty));
            self.diags.error(SemaErrorKind::InvalidOperands, message, span);
            ExprResult::error()
        }
    }

    fn check_call(&mut self, callee: &mut Expr, args: &mut [Expr], span: Span) -> ExprResult {
        let callee_result = self.check_expr(callee);
        let arg_results: Vec<ExprResult> = args.iter_mut().map(|arg| self.check_expr(arg)).collect();

        let Some(callee_ty) = callee_result.ty else {
            return ExprResult::error();
        };
        let TypeKind::Function { ret, params } = self.types.kind(callee_ty).clone() else {
            let message = format!("'{}' is not a function", self.name(callee_ty));
            self.diags.error(SemaErrorKind::NotCallable, message, callee.span);
            return ExprResult::error();
        };

        if params.len() != args.len() {
            let message = format!(
                "function takes {} argument(s) but {} were supplied",
                params.len(),
                args.len()
            );
            self.diags.error(SemaErrorKind::ArityMismatch, message, span);
        } else {
            for ((arg, result), &param) in args.iter().zip(&arg_results).zip(&params) {
                if let Some(actual) = result.ty {
                    if actual != param {
                        self.mismatch(SemaErrorKind::ArgTypeMismatch, param, actual, arg.span);
                    }
                }
            }
        }

        ExprResult::rvalue(ret)
    }

    fn check_dot(&mut self, base: &mut Expr, field: &Ident) -> ExprResult {
        let base_result = self.check_expr(base);
        let Some(base_ty) = base_result.ty else {
            return ExprResult::error();
        };

        let TypeKind::Struct { name, .. } = self.types.kind(base_ty) else {
            let message = format!("type '{}' has no fields", self.name(base_ty));
            self.diags.error(SemaErrorKind::NotAStruct, message, base.span);
            return ExprResult::error();
        };

        match self.info.field(base_ty, &field.name) {
            Some(info) => ExprResult {
                ty: info.ty,
                lvalue: base_result.lvalue,
            },
            None => {
                let message = format!("no field '{}' on struct '{}'", field.name, name);
                self.diags.error(SemaErrorKind::UnknownField, message, field.span);
                ExprResult::error()
            }
        }
    }

    fn check_cast(&mut self, operand: &mut Expr, target: Option<TypeId>, span: Span) -> ExprResult {
        let result = self.check_expr(operand);
        let (Some(from), Some(to)) = (result.ty, target) else {
            return ExprResult::error();
        };

        let t = &*self.types;
        let allowed = (t.is_arithmetic(from) && (t.is_arithmetic(to) || t.is_bool(to)))
            || (t.is_bool(from) && t.is_arithmetic(to));
        if !allowed {
            let message = format!("cannot cast '{}' to '{}'", self.name(from), self.name(to));
            self.diags.error(SemaErrorKind::InvalidCast, message, span);
        }
        ExprResult::rvalue(to)
    }

    fn check_subscript(&mut self, base: &mut Expr, index: &mut Expr) -> ExprResult {
        let base_result = self.check_expr(base);
        let index_result = self.check_expr(index);

        let Some(base_ty) = base_result.ty else {
            return ExprResult::error();
        };
        let element = match self.types.kind(base_ty) {
            TypeKind::Pointer(element) | TypeKind::Array { element, .. } => *element,
            _ => {
                let message = format!("cannot index into a value of type '{}'", self.name(base_ty));
                self.diags.error(SemaErrorKind::NotIndexable, message, base.span);
                return ExprResult::error();
            }
        };

        if let Some(index_ty) = index_result.ty {
            if !self.types.is_integer(index_ty) {
                let message = format!("index must be an integer, found '{}'", self.name(index_ty));
                self.diags.error(SemaErrorKind::InvalidIndexType, message, index.span);
            }
        }
        ExprResult::place(element)
    }

    fn check_array_literal(&mut self, elements: &mut [Expr]) -> ExprResult {
        let results: Vec<ExprResult> = elements.iter_mut().map(|e| self.check_expr(e)).collect();

        let mut element_ty: Option<TypeId> = None;
        for (element, result) in elements.iter().zip(&results) {
            let Some(ty) = result.ty else {
                return ExprResult::error();
            };
            match element_ty {
                None => element_ty = Some(ty),
                Some(first) if first != ty => {
                    let message = format!(
                        "array elements must share one type: expected '{}', found '{}'",
                        self.name(first),
                        self.name(ty)
                    );
                    self.diags.error(SemaErrorKind::HeterogeneousArrayLiteral, message, element.span);
                    return ExprResult::error();
                }
                Some(_) => {}
            }
        }

        match element_ty {
            Some(ty) => {
                let size = u32::try_from(elements.len()).unwrap_or(u32::MAX);
                ExprResult::rvalue(self.types.intern_array(ty, size))
            }
            None => ExprResult::error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{analyze_source, error_kinds};
    use super::*;
    use crate::common::CompileError;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<SemaErrorKind> {
        let (_, _, errors) = analyze_source(source);
        error_kinds(&errors)
    }

    fn spans<'s>(source: &'s str, errors: &[CompileError]) -> Vec<&'s str> {
        errors
            .iter()
            .filter_map(CompileError::span)
            .map(|s| s.text(source))
            .collect()
    }

    /// Type of the value of the `index`th statement of the first function,
    /// which must be a `let` or a `return`
    fn value_type(source: &str, index: usize) -> String {
        let (module, _, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);
        let func = module
            .functions()
            .next()
            .map(|(_, f)| f)
            .expect("source has a function");
        let value = match &func.body.stmts[index].kind {
            StmtKind::Let(let_stmt) => let_stmt.value.as_ref(),
            StmtKind::Return(value) => value.as_ref(),
            StmtKind::Expr(expr) => Some(expr),
            other => panic!("unexpected statement {:?}", other),
        };
        let ty = value.and_then(|v| v.ty).expect("value is typed");
        module.types.display(ty).to_string()
    }

    #[test]
    fn test_literals() {
        assert_eq!(value_type("fn f(): i32 { return 1; }", 0), "i32");
        assert_eq!(value_type("fn f(): f32 { return 1.5; }", 0), "f32");
        assert_eq!(value_type("fn f(): bool { return false; }", 0), "bool");
    }

    #[test]
    fn test_pointer_arithmetic_commutes() {
        let source = "fn f(p: *i32) { let a: *i32 = p + 1; let b: *i32 = 1 + p; let c: *i32 = p - 1; }";
        assert_eq!(kinds(source), vec![]);
        assert_eq!(value_type(source, 0), "*i32");
        assert_eq!(value_type(source, 1), "*i32");
    }

    #[test]
    fn test_arithmetic_rules() {
        assert_eq!(kinds("fn f(a: i32, b: i32): i32 { return a * b % b - a / b; }"), vec![]);
        assert_eq!(kinds("fn f(a: i32, b: i64) { a + b; }"), vec![SemaErrorKind::InvalidOperands]);
        assert_eq!(kinds("fn f(a: bool, b: bool) { a * b; }"), vec![SemaErrorKind::InvalidOperands]);
        assert_eq!(kinds("fn f(p: *i32, q: *i32) { p + q; }"), vec![SemaErrorKind::InvalidOperands]);
        assert_eq!(kinds("fn f(a: i32): i32 { return a << 2 | a ^ 1; }"), vec![]);
        assert_eq!(kinds("fn f(a: f32) { a | a; }"), vec![SemaErrorKind::InvalidOperands]);
    }

    #[test]
    fn test_comparison_and_logic() {
        let ok = "fn f(a: i32, p: *i32, q: *i32, c: bool): bool { return a < 2 && p == q || c != false; }";
        assert_eq!(kinds(ok), vec![]);
        assert_eq!(kinds("fn f(a: i32) { a && true; }"), vec![SemaErrorKind::InvalidOperands]);
        assert_eq!(kinds("fn f(a: bool) { a < a; }"), vec![SemaErrorKind::InvalidOperands]);
        assert_eq!(kinds("fn f(a: f32, p: *i32) { a == p; }"), vec![SemaErrorKind::InvalidOperands]);
    }

    #[test]
    fn test_equality_with_a_bool_operand() {
        assert_eq!(kinds("fn f(a: i32, b: bool): bool { return a == b; }"), vec![]);
        assert_eq!(kinds("fn f(): bool { return 1 != true; }"), vec![]);
        assert_eq!(value_type("fn f(p: *i32): bool { return false == p; }", 0), "bool");
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(kinds("fn f(a: f32, b: bool, c: i32) { -a; +a; !b; ~c; }"), vec![]);
        assert_eq!(
            kinds("fn f(a: bool, b: i32, c: f32) { -a; !b; ~c; }"),
            vec![
                SemaErrorKind::InvalidOperands,
                SemaErrorKind::InvalidOperands,
                SemaErrorKind::InvalidOperands
            ]
        );
    }

    #[test]
    fn test_deref_and_address_of() {
        let source = "fn f(p: *i32): i32 { let q: **i32 = &p; *p = 3; return **q; }";
        assert_eq!(kinds(source), vec![]);

        let source = "fn f(a: i32) { *a; &1; &(a + 1); }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::NotAPointer, SemaErrorKind::NotAnLValue, SemaErrorKind::NotAnLValue]
        );
        assert_eq!(spans(source, &errors), vec!["a", "1", "a + 1"]);
    }

    #[test]
    fn test_array_parameter_decays_when_read() {
        let source = "fn f(x: [i32, 4]): i32 { let p: *i32 = x; x[1] = 2; return x[0]; }";
        assert_eq!(kinds(source), vec![]);
        assert_eq!(value_type(source, 0), "*i32");
    }

    #[test]
    fn test_address_of_array_keeps_array_type() {
        let source = "fn f() { let a: [i32, 2] = [1, 2]; let p: *[i32, 2] = &a; }";
        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_assignment() {
        let source = "fn f(a: [i32, 2], b: [i32, 2], x: i32) { a = b; 1 = x; x = true; x = 2; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![
                SemaErrorKind::ArrayAssignmentForbidden,
                SemaErrorKind::NotAnLValue,
                SemaErrorKind::TypeMismatch
            ]
        );
        assert_eq!(spans(source, &errors), vec!["a", "1", "true"]);
    }

    #[test]
    fn test_call_checks() {
        let header = "fn g(a: i32, b: bool): f32 { return 1.0; }";
        assert_eq!(kinds(&format!("{} fn f(): f32 {{ return g(1, true); }}", header)), vec![]);

        // Every bad argument is reported
        let source = format!("{} fn f() {{ g(true, 1); }}", header);
        let (_, _, errors) = analyze_source(&source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::ArgTypeMismatch, SemaErrorKind::ArgTypeMismatch]
        );
        assert_eq!(spans(&source, &errors), vec!["true", "1"]);

        assert_eq!(
            kinds(&format!("{} fn f() {{ g(1); }}", header)),
            vec![SemaErrorKind::ArityMismatch]
        );
        // Arguments are checked even when the arity is wrong
        assert_eq!(
            kinds(&format!("{} fn f() {{ g(nope); }}", header)),
            vec![SemaErrorKind::UndefinedSymbol, SemaErrorKind::ArityMismatch]
        );
        assert_eq!(kinds("fn f(a: i32) { a(1); }"), vec![SemaErrorKind::NotCallable]);
    }

    #[test]
    fn test_call_yields_return_type() {
        let source = "fn f(): bool { return g(2) < 3; } fn g(x: i32): i32 { return x; }";
        assert_eq!(value_type(source, 0), "bool");
    }

    #[test]
    fn test_field_access() {
        let source = "
            struct Inner { v: i32 }
            struct Outer { inner: Inner, xs: [i32, 3] }
            fn f(o: Outer, p: *Outer): i32 {
                o.inner.v = 1;
                (*p).xs[2] = o.xs[0];
                return o.inner.v;
            }
        ";
        assert_eq!(kinds(source), vec![]);

        let source = "struct P { x: i32 } fn f(p: P, i: i32) { p.y; i.x; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::UnknownField, SemaErrorKind::NotAStruct]
        );
        assert_eq!(spans(source, &errors), vec!["y", "i"]);
    }

    #[test]
    fn test_field_of_rvalue_is_not_assignable() {
        let source = "struct P { x: i32 } fn mk(): P { let p: P; return p; } fn f() { mk().x = 1; }";
        assert_eq!(kinds(source), vec![SemaErrorKind::NotAnLValue]);
    }

    #[test]
    fn test_casts() {
        let ok = "fn f(a: i32, b: bool, c: f32) { a as f32; c as i8; a as bool; b as i64; }";
        assert_eq!(kinds(ok), vec![]);

        let source = "fn f(p: *i32, b: bool) { p as i32; b as bool; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::InvalidCast, SemaErrorKind::InvalidCast]
        );
        assert_eq!(spans(source, &errors), vec!["p as i32", "b as bool"]);
    }

    #[test]
    fn test_subscript() {
        let source = "fn f(p: *i32, a: i32, b: bool): i32 { a[0]; p[b]; return p[a]; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::NotIndexable, SemaErrorKind::InvalidIndexType]
        );
        assert_eq!(spans(source, &errors), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_array_element_decays() {
        let source = "fn f(m: [[i32, 2], 3]) { let row: *i32 = m[1]; let v: i32 = m[1][0]; }";
        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_array_literals() {
        assert_eq!(value_type("fn f() { [1, 2, 3]; }", 0), "[i32, 3]");

        let source = "fn f() { [1, true, 2.0]; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::HeterogeneousArrayLiteral]);
        assert_eq!(spans(source, &errors), vec!["true"]);
    }

    #[test]
    fn test_let_array_widening() {
        assert_eq!(kinds("fn f() { let a: [i32, 4] = [1, 2]; }"), vec![]);
        assert_eq!(
            kinds("fn f() { let a: [i32, 1] = [1, 2]; }"),
            vec![SemaErrorKind::TypeMismatch]
        );
        assert_eq!(
            kinds("fn f() { let a: [f32, 4] = [1, 2]; }"),
            vec![SemaErrorKind::TypeMismatch]
        );
    }

    #[test]
    fn test_return_checks() {
        assert_eq!(kinds("fn f() { return; }"), vec![]);
        assert_eq!(kinds("fn f(): i32 { return; }"), vec![SemaErrorKind::ReturnTypeMismatch]);

        let source = "fn f(): i32 { return true; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::ReturnTypeMismatch]);
        assert_eq!(spans(source, &errors), vec!["true"]);
    }

    #[test]
    fn test_conditions() {
        assert_eq!(kinds("fn f(b: bool) { if (b) {} else {} while (!b) {} }"), vec![]);
        assert_eq!(
            kinds("fn f(x: i32) { if (x) {} while (1.0) {} }"),
            vec![SemaErrorKind::ConditionNotBool, SemaErrorKind::ConditionNotBool]
        );
    }

    #[test]
    fn test_errors_do_not_cascade() {
        let source = "fn f(): bool { let x: i32 = y + 1; return (z * 2) as f32 < 1.0; }";
        assert_eq!(
            kinds(source),
            vec![SemaErrorKind::UndefinedSymbol, SemaErrorKind::UndefinedSymbol]
        );
    }

    #[test]
    fn test_lvalue_flags() {
        let source = "fn f(p: *i32, a: i32) { *p; a + 1; a; }";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);

        let (_, func) = module.functions().next().unwrap();
        let flags: Vec<bool> = func
            .body
            .stmts
            .iter()
            .map(|stmt| match &stmt.kind {
                StmtKind::Expr(expr) => expr.lvalue,
                other => panic!("unexpected statement {:?}", other),
            })
            .collect();
        assert_eq!(flags, vec![true, false, true]);
    }
}
