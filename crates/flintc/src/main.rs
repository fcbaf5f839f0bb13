//! Flint compiler front end
//!
//! Usage: flintc [OPTIONS] <input>

use std::path::PathBuf;
use std::process;

use anyhow::{Result, bail};
use clap::Parser as ClapParser;
use flint_compiler::common::{CompileError, DiagnosticReporter};
use flint_compiler::driver::Pipeline;
use flint_compiler::frontend::FrontendConfig;

#[derive(ClapParser, Debug)]
#[command(name = "flintc")]
#[command(author = "Flint Team")]
#[command(version)]
#[command(about = "Front end and semantic analyzer for the Flint language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump resolved function signatures and struct fields
    #[arg(long)]
    dump_types: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Check the input file; `Ok(false)` means errors were reported
fn run(args: &Args) -> Result<bool> {
    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_types: args.dump_types,
        verbose: args.verbose,
    };
    let pipeline = Pipeline::new(config);
    let mut reporter = DiagnosticReporter::new();

    let summary = match pipeline.compile_file(&args.input, &mut reporter) {
        Ok(summary) => summary,
        Err(CompileError::Io(message)) => {
            bail!("cannot read {}: {}", args.input.display(), message);
        }
        // Already rendered by the reporter
        Err(_) => {
            eprintln!("error: aborting due to previous error");
            return Ok(false);
        }
    };

    if !summary.is_ok() {
        eprintln!(
            "error: aborting due to {} previous error{}",
            summary.errors,
            if summary.errors == 1 { "" } else { "s" }
        );
        return Ok(false);
    }

    if args.verbose {
        eprintln!(
            "Checked {} ({} functions, {} structs)",
            args.input.display(),
            summary.functions,
            summary.structs
        );
    }
    Ok(true)
}
