//! Name resolution
//!
//! Walks every valid declaration with a stack of lexical scopes, binding each
//! name reference to the symbol it denotes and resolving each type
//! annotation. Functions are registered in the root scope before any body is
//! visited, so forward and recursive calls resolve.

use super::{Diagnostics, FieldInfo, Scope, SemaInfo, Symbol, SymbolInfo, TypeResolver};
use crate::common::SemaErrorKind;
use crate::frontend::ast::*;
use crate::types::{TypeContext, TypeId, TypeKind};

pub struct NameResolver<'a> {
    types: &'a mut TypeContext,
    info: &'a mut SemaInfo,
    diags: &'a mut Diagnostics,
    resolver: TypeResolver,
    scope: Scope,
    next_local: u32,
}

impl<'a> NameResolver<'a> {
    pub fn new(types: &'a mut TypeContext, info: &'a mut SemaInfo, diags: &'a mut Diagnostics) -> Self {
        let resolver = TypeResolver::new(types, &info.struct_types);
        Self {
            types,
            info,
            diags,
            resolver,
            scope: Scope::new(),
            next_local: 0,
        }
    }

    pub fn run(&mut self, decls: &mut [Decl]) {
        self.register_functions(decls);

        for (i, decl) in decls.iter_mut().enumerate() {
            let id = DeclId(i as u32);
            if !self.info.is_valid(id) {
                continue;
            }
            match &mut decl.kind {
                DeclKind::Function(func) => self.resolve_function(id, func),
                DeclKind::Struct(s) => self.resolve_struct(s),
            }
        }
    }

    /// Run `f` inside a fresh child scope
    fn in_child_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scope.push_child();
        let result = f(self);
        self.scope.pop_to_parent();
        result
    }

    fn register_functions(&mut self, decls: &[Decl]) {
        for (i, decl) in decls.iter().enumerate() {
            let id = DeclId(i as u32);
            let DeclKind::Function(func) = &decl.kind else {
                continue;
            };
            if !self.info.is_valid(id) {
                continue;
            }

            let symbol = Symbol::Function(id);
            match self.scope.define(&func.name.name, symbol) {
                Ok(()) => {
                    self.info.symbols.insert(symbol, SymbolInfo::new(&func.name, None));
                }
                Err(_) => self.diags.error(
                    SemaErrorKind::Redefinition,
                    format!("function '{}' is already defined", func.name.name),
                    func.name.span,
                ),
            }
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Resolve a type annotation, reporting the unknown leaf on failure
    fn resolve_type(&mut self, ty: TypeId) -> Option<TypeId> {
        match self.resolver.resolve(self.types, ty) {
            Ok(resolved) => Some(resolved),
            Err(leaf) => {
                if let TypeKind::Unresolved { name, span } = self.types.kind(leaf) {
                    self.diags.error(
                        SemaErrorKind::UnresolvedTypeName,
                        format!("cannot find type '{}'", name),
                        *span,
                    );
                }
                None
            }
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn resolve_struct(&mut self, s: &StructDecl) {
        let Some(struct_ty) = s.ty else {
            return;
        };

        let fields = s
            .fields
            .iter()
            .map(|field| FieldInfo {
                name: field.name.name.clone(),
                span: field.name.span,
                ty: self.resolve_type(field.ty),
            })
            .collect();
        self.info.struct_fields.insert(struct_ty, fields);
    }

    fn resolve_function(&mut self, id: DeclId, func: &mut FunctionDecl) {
        log::trace!("resolving function '{}'", func.name.name);

        self.in_child_scope(|this| {
            let mut signature = Some(Vec::with_capacity(func.params.len()));

            for (index, param) in func.params.iter_mut().enumerate() {
                let resolved = match param.ty {
                    Some(ty) => this.resolve_type(ty),
                    None => {
                        this.diags.error(
                            SemaErrorKind::MissingTypeAnnotation,
                            format!("parameter '{}' needs a type annotation", param.name.name),
                            param.name.span,
                        );
                        None
                    }
                };
                debug_assert!(param.resolved.is_none(), "parameter resolved twice");
                param.resolved = resolved;

                let symbol = Symbol::Param { func: id, index };
                this.info.symbols.insert(symbol, SymbolInfo::new(&param.name, resolved));
                let defined = this.scope.define(&param.name.name, symbol);
                debug_assert!(defined.is_ok(), "duplicate parameters reach name resolution");

                signature = match (signature, resolved) {
                    (Some(mut params), Some(ty)) => {
                        params.push(this.decay(ty));
                        Some(params)
                    }
                    _ => None,
                };
            }

            let ret = this.resolve_type(func.ret);
            func.resolved_ret = ret;

            if let (Some(params), Some(ret)) = (signature, ret) {
                let ty = this.types.intern_function(ret, params);
                func.ty = Some(ty);
                if let Some(info) = this.info.symbols.get_mut(&Symbol::Function(id)) {
                    info.ty = Some(ty);
                }
            }

            this.resolve_block(&mut func.body);
        });
    }

    /// Arrays are passed as pointers to their first element
    fn decay(&mut self, ty: TypeId) -> TypeId {
        match self.types.kind(ty) {
            TypeKind::Array { element, .. } => {
                let element = *element;
                self.types.intern_pointer(element)
            }
            _ => ty,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn resolve_block(&mut self, block: &mut Block) {
        self.in_child_scope(|this| {
            for stmt in &mut block.stmts {
                this.resolve_stmt(stmt);
            }
        });
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match &mut stmt.kind {
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            StmtKind::Let(let_stmt) => self.resolve_let(let_stmt),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            StmtKind::Assign { target, value } => {
                self.resolve_expr(target);
                self.resolve_expr(value);
            }
            StmtKind::Expr(expr) => self.resolve_expr(expr),
            StmtKind::Compound(block) => self.resolve_block(block),
        }
    }

    fn resolve_let(&mut self, let_stmt: &mut LetStmt) {
        // The initializer cannot see the binding it initializes
        if let Some(value) = &mut let_stmt.value {
            self.resolve_expr(value);
        }

        let resolved = match let_stmt.ty {
            Some(ty) => self.resolve_type(ty),
            None => {
                self.diags.error(
                    SemaErrorKind::MissingTypeAnnotation,
                    format!("variable '{}' needs a type annotation", let_stmt.name.name),
                    let_stmt.name.span,
                );
                None
            }
        };
        let_stmt.resolved = resolved;

        let local = LocalId(self.next_local);
        self.next_local += 1;
        debug_assert!(let_stmt.local.is_none(), "let binding resolved twice");
        let_stmt.local = Some(local);

        let symbol = Symbol::Local(local);
        self.info.symbols.insert(symbol, SymbolInfo::new(&let_stmt.name, resolved));
        if self.scope.define(&let_stmt.name.name, symbol).is_err() {
            self.diags.error(
                SemaErrorKind::Redefinition,
                format!("'{}' is already defined in this scope", let_stmt.name.name),
                let_stmt.name.span,
            );
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn resolve_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            ExprKind::Named { ident, symbol } => match self.scope.lookup(&ident.name) {
                Some(found) => {
                    debug_assert!(symbol.is_none(), "name bound twice");
                    *symbol = Some(found);
                }
                None => self.diags.error(
                    SemaErrorKind::UndefinedSymbol,
                    format!("cannot find '{}' in this scope", ident.name),
                    ident.span,
                ),
            },
            ExprKind::Dot { base, .. } => self.resolve_expr(base),
            ExprKind::Cast {
                operand,
                target,
                resolved,
            } => {
                self.resolve_expr(operand);
                *resolved = self.resolve_type(*target);
            }
            ExprKind::Subscript { base, index } => {
                self.resolve_expr(base);
                self.resolve_expr(index);
            }
            ExprKind::ArrayLiteral(elements) => {
                for element in elements {
                    self.resolve_expr(element);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{analyze_source, error_kinds};
    use super::*;
    use pretty_assertions::assert_eq;

    fn function(module: &Module, index: usize) -> &FunctionDecl {
        match &module.decls[index].kind {
            DeclKind::Function(f) => f,
            DeclKind::Struct(_) => panic!("expected function"),
        }
    }

    fn local_of(stmt: &Stmt) -> Symbol {
        match &stmt.kind {
            StmtKind::Let(let_stmt) => Symbol::Local(let_stmt.local.unwrap()),
            other => panic!("expected let, found {:?}", other),
        }
    }

    fn symbol_of_expr_stmt(stmt: &Stmt) -> Option<Symbol> {
        match &stmt.kind {
            StmtKind::Expr(expr) => expr.symbol(),
            other => panic!("expected expression statement, found {:?}", other),
        }
    }

    #[test]
    fn test_inner_let_shadows_outer() {
        let source = "fn f() { let x: i32 = 1; { let x: bool = true; x; } x; }";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);

        let body = &function(&module, 0).body;
        let outer = local_of(&body.stmts[0]);
        let StmtKind::Compound(inner_block) = &body.stmts[1].kind else {
            panic!("expected block");
        };
        let inner = local_of(&inner_block.stmts[0]);
        assert_ne!(outer, inner);

        assert_eq!(symbol_of_expr_stmt(&inner_block.stmts[1]), Some(inner));
        assert_eq!(symbol_of_expr_stmt(&body.stmts[2]), Some(outer));
    }

    #[test]
    fn test_redefinition_in_same_scope() {
        let source = "fn f() { let x: i32 = 1; let x: i32 = 2; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::Redefinition]);
        assert_eq!(errors[0].span().map(|s| s.start), Some(29));
    }

    #[test]
    fn test_let_may_shadow_parameter() {
        let (_, _, errors) = analyze_source("fn f(x: i32) { let x: bool = true; }");
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn test_initializer_sees_outer_binding() {
        let source = "fn f(x: i32) { { let x: i32 = x; } }";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);

        let StmtKind::Compound(block) = &function(&module, 0).body.stmts[0].kind else {
            panic!("expected block");
        };
        let StmtKind::Let(let_stmt) = &block.stmts[0].kind else {
            panic!("expected let");
        };
        assert_eq!(
            let_stmt.value.as_ref().unwrap().symbol(),
            Some(Symbol::Param { func: DeclId(0), index: 0 })
        );
    }

    #[test]
    fn test_forward_and_recursive_calls() {
        let source = "fn a(): i32 { return b(); } fn b(): i32 { return b(); }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn test_undefined_symbol() {
        let source = "fn f(): i32 { return missing; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::UndefinedSymbol]);
        assert_eq!(errors[0].span().map(|s| s.text(source)), Some("missing"));
    }

    #[test]
    fn test_binding_ends_with_its_block() {
        let source = "fn f() { { let y: i32 = 1; } y; }";
        let (_, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::UndefinedSymbol]);
    }

    #[test]
    fn test_duplicate_function_name() {
        let source = "fn f() {} fn f() { g(); }";
        let (_, analysis, errors) = analyze_source(source);
        // The second body is still resolved
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::Redefinition, SemaErrorKind::UndefinedSymbol]
        );
        assert!(analysis.info.is_valid(DeclId(1)));
        assert!(analysis.info.symbol(Symbol::Function(DeclId(0))).is_some());
        assert!(analysis.info.symbol(Symbol::Function(DeclId(1))).is_none());
    }

    #[test]
    fn test_duplicate_function_keeps_only_first_symbol() {
        let source = "fn f() {} fn f(): i32 { return 1; } fn g() { f(); }";
        let (module, analysis, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::Redefinition]);

        let void_fn = function(&module, 0).ty;
        assert_eq!(analysis.info.symbol_type(Symbol::Function(DeclId(0))), void_fn);
        assert!(analysis.info.symbol(Symbol::Function(DeclId(1))).is_none());
        let functions = analysis
            .info
            .symbols
            .keys()
            .filter(|symbol| symbol.is_function())
            .count();
        assert_eq!(functions, 2);
    }

    #[test]
    fn test_missing_annotations() {
        let source = "fn f(a) { let x = 1; }";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(
            error_kinds(&errors),
            vec![SemaErrorKind::MissingTypeAnnotation, SemaErrorKind::MissingTypeAnnotation]
        );
        assert!(function(&module, 0).ty.is_none());
    }

    #[test]
    fn test_unresolved_type_is_reported_at_the_leaf() {
        let source = "fn f(p: *[Nope, 2]) {}";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::UnresolvedTypeName]);
        assert_eq!(errors[0].span().map(|s| s.text(source)), Some("Nope"));
        assert!(function(&module, 0).params[0].resolved.is_none());
    }

    #[test]
    fn test_array_parameter_decays_in_signature() {
        let source = "fn f(x: [i32, 4]): i32 { return 0; }";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);

        let f = function(&module, 0);
        let sig = f.ty.unwrap();
        assert_eq!(module.types.display(sig).to_string(), "i32(*i32)");
        assert_eq!(
            module.types.display(f.params[0].resolved.unwrap()).to_string(),
            "[i32, 4]"
        );
    }

    #[test]
    fn test_struct_fields_and_forward_struct_references() {
        let source = "struct A { b: *B, n: i32 } struct B { a: A }";
        let (_, analysis, errors) = analyze_source(source);
        assert_eq!(errors, vec![]);

        let a = analysis.info.struct_types[0];
        let b = analysis.info.struct_types[1];
        let fields = analysis.info.fields(a);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "b");
        assert_eq!(analysis.info.field(b, "a").and_then(|f| f.ty), Some(a));
    }

    #[test]
    fn test_cast_target_is_resolved() {
        let source = "fn f(): f32 { return 1 as f32; } fn g() { 1 as Unknown; }";
        let (module, _, errors) = analyze_source(source);
        assert_eq!(error_kinds(&errors), vec![SemaErrorKind::UnresolvedTypeName]);

        let StmtKind::Return(Some(value)) = &function(&module, 0).body.stmts[0].kind else {
            panic!("expected return");
        };
        assert!(matches!(
            value.kind,
            ExprKind::Cast { resolved: Some(ty), .. } if ty == module.types.f32_type()
        ));
    }
}
