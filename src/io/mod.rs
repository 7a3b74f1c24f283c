//! Input/output helpers.
//!
//! - customer CSV ingest + header validation (`ingest`)
//! - portfolio CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
