//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed category/asset enums (`RiskCategory`, `AssetClass`)
//! - input and output rows (`CustomerRecord`, `PortfolioRecord`)
//! - the immutable range/allocation tables (`ProfilerConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
