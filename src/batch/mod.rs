//! Batch processing of customer rows into portfolio rows.

pub mod processor;

pub use processor::*;
