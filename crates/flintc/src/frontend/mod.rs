//! Flint frontend
//!
//! The frontend takes one source file through:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST with unresolved types
//! 3. Semantic analysis, annotating the AST in place
//!
//! Lexer and parser errors stop the file. Semantic errors are all reported
//! and leave a fully annotated module behind.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::{CompileResult, DiagnosticSink};

pub use ast::Module;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{Analysis, SemaInfo, SemanticAnalyzer};

/// Configuration options passed to the frontend
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    /// Print resolved signatures and struct layouts after a clean analysis
    pub dump_types: bool,
    pub verbose: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub sink: &'a mut dyn DiagnosticSink,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            filename,
            file_id,
            sink,
        }
    }
}

/// An analyzed module
#[derive(Debug)]
pub struct Compilation {
    pub module: Module,
    pub analysis: Analysis,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.analysis.is_ok()
    }
}

/// The Flint frontend
#[derive(Debug, Default)]
pub struct Frontend;

impl Frontend {
    pub fn new() -> Self {
        Self
    }

    /// Run the whole frontend pipeline over `source`
    ///
    /// Returns `Err` only for a lexer or parser error, which has already
    /// been reported to `ctx.sink`.
    pub fn compile(
        &self,
        source: &str,
        ctx: &mut CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<Compilation> {
        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            let dump = dump_tokens(source).inspect_err(|e| ctx.sink.report(ctx.file_id, e.clone()))?;
            eprintln!("=== Tokens ===");
            eprint!("{}", dump);
            eprintln!("=== End Tokens ===\n");
        }

        // Phase 2: Parsing
        if config.verbose {
            eprintln!("Parsing {}...", ctx.filename);
        }
        let mut module = Parser::new(source)
            .and_then(Parser::parse)
            .inspect_err(|e| ctx.sink.report(ctx.file_id, e.clone()))?;
        log::debug!("parsed {} declarations", module.decls.len());

        if config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", module.decls);
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic analysis
        if config.verbose {
            eprintln!("Analyzing {}...", ctx.filename);
        }
        let analysis = SemanticAnalyzer::new(ctx.file_id).analyze(&mut module, &mut *ctx.sink);

        if config.dump_types && analysis.is_ok() {
            eprintln!("=== Types ===");
            eprint!("{}", dump_types(&module, &analysis.info));
            eprintln!("=== End Types ===\n");
        }

        Ok(Compilation { module, analysis })
    }
}

/// One token per line with its byte range
pub fn dump_tokens(source: &str) -> CompileResult<String> {
    let tokens = Lexer::new(source).tokenize_all()?;
    Ok(tokens
        .iter()
        .map(|token| format!("{:>5}..{:<5} {}\n", token.span.start, token.span.end, token.kind))
        .collect())
}

/// Resolved function signatures and struct fields of every valid declaration
pub fn dump_types(module: &Module, info: &SemaInfo) -> String {
    let mut lines = Vec::new();
    for (id, decl) in module.iter() {
        if !info.is_valid(id) {
            continue;
        }
        match &decl.kind {
            ast::DeclKind::Function(func) => {
                let ty = func
                    .ty
                    .map_or_else(|| "<error>".to_string(), |ty| module.types.display(ty).to_string());
                lines.push(format!("fn {}: {}", func.name.name, ty));
            }
            ast::DeclKind::Struct(s) => {
                let Some(struct_ty) = s.ty else { continue };
                lines.push(format!("struct {}", s.name.name));
                for field in info.fields(struct_ty) {
                    let ty = field
                        .ty
                        .map_or_else(|| "<error>".to_string(), |ty| module.types.display(ty).to_string());
                    lines.push(format!("    {}: {}", field.name, ty));
                }
            }
        }
    }
    lines.iter().map(|line| format!("{}\n", line)).collect()
}
