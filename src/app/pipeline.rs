//! Shared batch pipeline used by the CLI, TUI and web front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! locate input -> read rows -> classify -> write output atomically
//!
//! The front-ends can then focus on presentation (printing vs widgets vs JSON).

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::{BatchSummary, ProfileBatchProcessor};
use crate::classify::RiskClassifier;
use crate::error::ProfileError;
use crate::io::{CustomerReader, open_customer_csv, write_portfolio_csv};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub count: usize,
    pub unclassified: usize,
    pub output: PathBuf,
}

impl BatchReport {
    fn new(summary: BatchSummary, output: &Path) -> Self {
        Self {
            count: summary.count,
            unclassified: summary.unclassified,
            output: output.to_path_buf(),
        }
    }
}

/// Classify a customer CSV on disk and write the portfolio CSV.
pub fn run_batch_file(classifier: &RiskClassifier, input: &Path, output: &Path) -> Result<BatchReport, ProfileError> {
    tracing::info!(input = %input.display(), output = %output.display(), "starting batch");
    let reader = open_customer_csv(input)?;
    run_rows(classifier, reader, output)
}

/// Classify raw CSV content (e.g. an uploaded file) and write the portfolio CSV.
pub fn run_batch_reader<R: Read>(classifier: &RiskClassifier, input: R, output: &Path) -> Result<BatchReport, ProfileError> {
    tracing::info!(output = %output.display(), "starting batch from uploaded content");
    let reader = CustomerReader::new(input)?;
    run_rows(classifier, reader, output)
}

fn run_rows<R: Read>(
    classifier: &RiskClassifier,
    reader: CustomerReader<R>,
    output: &Path,
) -> Result<BatchReport, ProfileError> {
    let batch = ProfileBatchProcessor::new(classifier).process(reader)?;
    write_portfolio_csv(output, &batch.records)?;

    tracing::info!(
        count = batch.summary.count,
        unclassified = batch.summary.unclassified,
        "batch complete"
    );
    Ok(BatchReport::new(batch.summary, output))
}
