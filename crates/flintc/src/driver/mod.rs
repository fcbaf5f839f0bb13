//! Compilation driver and pipeline orchestration

use std::fs;
use std::path::Path;

use crate::common::{CompileResult, DiagnosticReporter, DiagnosticSink};
use crate::frontend::{CompileContext, Compilation, Frontend, FrontendConfig};

/// Outcome of checking one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub functions: usize,
    pub structs: usize,
    pub errors: usize,
}

impl Summary {
    fn new(compilation: &Compilation) -> Self {
        Self {
            functions: compilation.module.functions().count(),
            structs: compilation.module.structs().count(),
            errors: compilation.analysis.error_count,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Compilation pipeline that drives the frontend over source files
pub struct Pipeline {
    frontend: Frontend,
    config: FrontendConfig,
}

impl Pipeline {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            frontend: Frontend::new(),
            config,
        }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Read, register and check the file at `path`
    ///
    /// An I/O error is returned without being reported, since there is no
    /// source to point into.
    pub fn compile_file(&self, path: &Path, reporter: &mut DiagnosticReporter) -> CompileResult<Summary> {
        let source = fs::read_to_string(path)?;
        let filename = path.display().to_string();
        let file_id = reporter.add_file(filename.clone(), source.clone());
        self.compile_source(&source, filename, file_id, reporter)
    }

    /// Check `source`, already registered with `sink` as `file_id`
    pub fn compile_source(
        &self,
        source: &str,
        filename: String,
        file_id: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> CompileResult<Summary> {
        let mut ctx = CompileContext::new(filename, file_id, sink);
        let compilation = self.frontend.compile(source, &mut ctx, &self.config)?;

        let summary = Summary::new(&compilation);
        log::info!(
            "checked {}: {} function(s), {} struct(s), {} error(s)",
            ctx.filename,
            summary.functions,
            summary.structs,
            summary.errors
        );
        Ok(summary)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FrontendConfig::default())
    }
}
