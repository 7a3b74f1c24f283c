//! Formatted terminal output: allocation table and run summaries.
//!
//! We keep formatting code in one place so:
//! - the classification code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::BatchReport;
use crate::classify::{RiskClassifier, expected_return};
use crate::domain::AssetClass;
use crate::error::ProfileError;

/// One line per configured score range: category, allocation split, expected return.
pub fn format_allocation_table(classifier: &RiskClassifier) -> Result<String, ProfileError> {
    let config = classifier.config();
    let mut out = String::new();

    out.push_str("=== Risk profiles ===\n");
    out.push_str(&format!("{:<16} {:>7} ", "category", "scores"));
    for class in AssetClass::ALL {
        out.push_str(&format!(" {:>width$}", class.label(), width = column_width(class)));
    }
    out.push_str(&format!("  {:>8}\n", "E[r]"));

    for range in config.ranges() {
        // The low end always falls inside its own range.
        let Some((category, dist)) = classifier.profile(range.low)? else {
            continue;
        };
        out.push_str(&format!("{:<16} {:>7} ", category.as_str(), format!("{}-{}", range.low, range.high)));
        for class in AssetClass::ALL {
            out.push_str(&format!(" {:>width$}%", dist.get(class), width = column_width(class) - 1));
        }
        out.push_str(&format!("  {:>8.2}\n", expected_return(dist)?));
    }

    if config.has_uniform_allocations() {
        out.push_str("\nnote: every category shares the same allocation; per-category splits still need business sign-off.\n");
    }

    Ok(out)
}

fn column_width(class: AssetClass) -> usize {
    class.label().len().max(6)
}

/// Human-readable success message for a finished batch.
pub fn format_batch_summary(report: &BatchReport) -> String {
    let mut out = format!("Success! Processed {} customers.", report.count);
    if report.unclassified > 0 {
        out.push_str(&format!(
            " {} could not be classified (empty Portfolio).",
            report.unclassified
        ));
    }
    out.push_str(&format!("\nOutput saved to: {}", report.output.display()));
    out
}
