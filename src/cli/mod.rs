//! Command-line parsing for the risk profiler.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the classification code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::io::DEFAULT_OUTPUT_FILE;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "riskprof", version, about = "Customer risk profiler and portfolio generator")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a customer CSV and write the portfolio CSV.
    Run(RunArgs),
    /// Print the risk ranges, allocations and expected returns.
    Allocations,
    /// Classify raw score values (e.g. "27 (Moderate)").
    Classify(ClassifyArgs),
    /// Launch the interactive terminal window.
    Tui(TuiArgs),
    /// Serve the local web page.
    Serve(ServeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Input customer CSV. When omitted, pick one interactively.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Output portfolio CSV.
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    /// One or more raw score values.
    #[arg(required = true, value_name = "SCORE")]
    pub scores: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Output portfolio CSV.
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Port to listen on (127.0.0.1 only).
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Output portfolio CSV.
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Don't open a browser on startup.
    #[arg(long)]
    pub no_open: bool,
}
