//! Ordered, all-or-nothing batch classification.
//!
//! Each input row becomes exactly one output row, in arrival order. Unclassified
//! scores are kept with an empty category; the first structurally broken row
//! aborts the whole batch, and because output is buffered here nothing has been
//! written by the time that error is returned.

use serde::Serialize;

use crate::classify::{RiskClassifier, parse_score};
use crate::domain::{CustomerRecord, PortfolioRecord};
use crate::error::{ProfileError, RowFault};

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Rows processed, one per input row.
    pub count: usize,
    /// Rows whose score fell outside every range.
    pub unclassified: usize,
}

/// Buffered output of a successful batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub records: Vec<PortfolioRecord>,
    pub summary: BatchSummary,
}

/// Drives the classifier over a stream of customer rows.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBatchProcessor<'a> {
    classifier: &'a RiskClassifier,
}

impl<'a> ProfileBatchProcessor<'a> {
    pub fn new(classifier: &'a RiskClassifier) -> Self {
        Self { classifier }
    }

    /// Classify every row, preserving order.
    ///
    /// Fails with [`ProfileError::MalformedRow`] on the first faulty row; `row`
    /// is the 1-based position among data rows (the header is not counted).
    pub fn process<I>(&self, rows: I) -> Result<BatchOutput, ProfileError>
    where
        I: IntoIterator<Item = Result<CustomerRecord, RowFault>>,
    {
        let mut output = BatchOutput::default();

        for (idx, row) in rows.into_iter().enumerate() {
            let row_number = idx + 1;
            let customer = row.map_err(|cause| {
                tracing::error!(row = row_number, %cause, "aborting batch on malformed row");
                ProfileError::MalformedRow { row: row_number, cause }
            })?;

            let record = self.process_one(customer);
            if !record.is_classified() {
                output.summary.unclassified += 1;
                tracing::warn!(row = row_number, name = %record.name, "score outside every risk range");
            }

            output.records.push(record);
            output.summary.count += 1;
        }

        Ok(output)
    }

    /// Classify a single customer.
    pub fn process_one(&self, customer: CustomerRecord) -> PortfolioRecord {
        let score = parse_score(&customer.raw_score);
        let category = self.classifier.classify(score);
        tracing::debug!(raw = %customer.raw_score, score, category = ?category, "classified");
        PortfolioRecord::from_customer(customer, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str, score: &str) -> CustomerRecord {
        CustomerRecord {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            contact: "555-1234".to_string(),
            raw_score: score.to_string(),
        }
    }

    #[test]
    fn classifies_the_reference_scenario() {
        let classifier = RiskClassifier::default();
        let processor = ProfileBatchProcessor::new(&classifier);
        let alice = CustomerRecord {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            contact: "555-1234".to_string(),
            raw_score: "27 pts".to_string(),
        };

        let out = processor.process([Ok(alice)]).unwrap();

        assert_eq!(
            out.records,
            vec![PortfolioRecord {
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
                contact: "555-1234".to_string(),
                portfolio: "moderate".to_string(),
            }]
        );
        assert_eq!(out.summary, BatchSummary { count: 1, unclassified: 0 });
    }

    #[test]
    fn preserves_order_and_keeps_unclassified_rows() {
        let classifier = RiskClassifier::default();
        let processor = ProfileBatchProcessor::new(&classifier);
        let input = vec![
            Ok(customer("A", "100")),
            Ok(customer("B", "5")),
            Ok(customer("C", "45 (Very aggressive)")),
            Ok(customer("D", "15")),
            Ok(customer("E", "35")),
        ];

        let out = processor.process(input).unwrap();

        let names: Vec<_> = out.records.iter().map(|r| r.name.as_str()).collect();
        let portfolios: Vec<_> = out.records.iter().map(|r| r.portfolio.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
        assert_eq!(portfolios, ["", "conservative", "very_aggressive", "balanced", "aggressive"]);
        assert_eq!(out.summary.count, 5);
        assert_eq!(out.summary.unclassified, 1);
    }

    #[test]
    fn first_fault_aborts_with_its_position() {
        let classifier = RiskClassifier::default();
        let processor = ProfileBatchProcessor::new(&classifier);
        let input = vec![
            Ok(customer("A", "1")),
            Err(RowFault::MissingField("Total score")),
            Err(RowFault::EmptyScore),
        ];

        let err = processor.process(input).unwrap_err();
        match err {
            ProfileError::MalformedRow { row, cause } => {
                assert_eq!(row, 2);
                assert_eq!(cause, RowFault::MissingField("Total score"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_an_empty_batch() {
        let classifier = RiskClassifier::default();
        let out = ProfileBatchProcessor::new(&classifier)
            .process(std::iter::empty())
            .unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.summary.count, 0);
    }
}
