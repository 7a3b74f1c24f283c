//! `risk-profiler` library crate.
//!
//! The binary (`riskprof`) is a thin wrapper around this library so that:
//!
//! - classification and batch logic is testable without spawning processes
//! - the terminal and web front-ends share one pipeline

pub mod app;
pub mod batch;
pub mod classify;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
pub mod web;
