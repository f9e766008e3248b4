//! `taint-summary`: check that the TaintSummary grammar loads, and lint
//! summary files.

use std::process::ExitCode;

use anyhow::{Context, Result};
use facet::Facet;
use tracing_subscriber::EnvFilter;
use tree_sitter_taint_summary::{language, lint, render_report, verify_grammar_loadable, GRAMMAR_NAME};

/// Command-line arguments.
#[derive(Facet, Debug)]
struct Args {
    /// Enable debug logging.
    #[facet(named, short = 'v', default)]
    verbose: bool,

    /// A TaintSummary source file to lint.
    #[facet(positional, default)]
    path: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<ExitCode> {
    if let Err(failure) = verify_grammar_loadable(GRAMMAR_NAME, language) {
        eprintln!("{failure}: {}", failure.reason());
        return Ok(ExitCode::FAILURE);
    }
    tracing::info!(grammar = GRAMMAR_NAME, "grammar loaded");

    let Some(path) = args.path.as_deref() else {
        println!("{GRAMMAR_NAME} grammar loaded successfully");
        return Ok(ExitCode::SUCCESS);
    };

    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let diagnostics = lint(&source);
    println!("{}", render_report(&diagnostics, &source, Some(path)));

    if diagnostics.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} error(s) found.", diagnostics.len());
        Ok(ExitCode::FAILURE)
    }
}

fn main() -> ExitCode {
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
