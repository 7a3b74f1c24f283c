//! Risk classification.
//!
//! Responsibilities:
//!
//! - parse the raw score cell (`score`)
//! - map scores to categories and categories to allocations (`classifier`)
//! - compute the expected rate of return of an allocation

pub mod classifier;
pub mod score;

pub use classifier::*;
pub use score::*;
