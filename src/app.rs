//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging
//! - builds the classifier from the compiled-in tables
//! - dispatches to the batch run, reports, TUI or web front-end

use std::path::Path;

use clap::Parser;

use crate::app::pipeline::BatchReport;
use crate::classify::{RiskClassifier, parse_score};
use crate::cli::{ClassifyArgs, Command, RunArgs, ServeArgs, TuiArgs};
use crate::domain::ProfilerConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `riskprof` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `riskprof` to behave like `riskprof tui`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; stderr logging would draw over it.
    if !matches!(cli.command, Command::Tui(_)) {
        crate::logging::init(cli.verbose);
    }

    let classifier = build_classifier();

    match cli.command {
        Command::Run(args) => handle_run(&classifier, args),
        Command::Allocations => handle_allocations(&classifier),
        Command::Classify(args) => handle_classify(&classifier, args),
        Command::Tui(args) => handle_tui(&classifier, args),
        Command::Serve(args) => handle_serve(classifier, args),
    }
}

fn build_classifier() -> RiskClassifier {
    let config = ProfilerConfig::reference();
    if config.has_uniform_allocations() {
        tracing::warn!("all risk categories share one allocation table; per-category splits are placeholders");
    }
    RiskClassifier::new(config)
}

fn handle_run(classifier: &RiskClassifier, args: RunArgs) -> Result<(), AppError> {
    let input = match args.input {
        Some(path) => path,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };

    let report = run_and_log(classifier, &input, &args.output)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(4, format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_batch_summary(&report));
    }
    Ok(())
}

fn run_and_log(classifier: &RiskClassifier, input: &Path, output: &Path) -> Result<BatchReport, AppError> {
    pipeline::run_batch_file(classifier, input, output).map_err(|err| {
        tracing::error!(%err, input = %input.display(), "batch failed");
        AppError::from(err)
    })
}

fn handle_allocations(classifier: &RiskClassifier) -> Result<(), AppError> {
    print!("{}", crate::report::format_allocation_table(classifier)?);
    Ok(())
}

fn handle_classify(classifier: &RiskClassifier, args: ClassifyArgs) -> Result<(), AppError> {
    for raw in &args.scores {
        let score = parse_score(raw.trim());
        let category = classifier
            .classify(score)
            .map(|c| c.as_str())
            .unwrap_or("unclassified");
        println!("{raw}\t{score}\t{category}");
    }
    Ok(())
}

fn handle_tui(classifier: &RiskClassifier, args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(classifier, args.output)
}

fn handle_serve(classifier: RiskClassifier, args: ServeArgs) -> Result<(), AppError> {
    crate::web::serve(classifier, args.output, args.port, !args.no_open)
}

/// Rewrite argv so `riskprof` defaults to `riskprof tui`.
///
/// Rules:
/// - `riskprof`                      -> `riskprof tui`
/// - `riskprof -o out.csv`           -> `riskprof tui -o out.csv`
/// - `riskprof --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "allocations" | "classify" | "tui" | "serve");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
