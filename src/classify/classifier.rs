//! Score → category → allocation → expected return.
//!
//! Everything here is a pure function over the immutable [`ProfilerConfig`].

use crate::domain::{AllocationDistribution, AssetClass, ProfilerConfig, RiskCategory};
use crate::error::ProfileError;

/// Maps scores to risk categories and categories to allocations.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    config: ProfilerConfig,
}

impl RiskClassifier {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Category of the first range containing `score`, or `None` if the score
    /// falls outside every configured range.
    pub fn classify(&self, score: i64) -> Option<RiskCategory> {
        self.config
            .ranges()
            .iter()
            .find(|r| r.contains(score))
            .map(|r| r.category)
    }

    /// Configured allocation for a category.
    pub fn allocation_for(&self, category: RiskCategory) -> Result<&AllocationDistribution, ProfileError> {
        self.config
            .allocation(category)
            .ok_or_else(|| ProfileError::Configuration(format!("No allocation configured for `{category}`.")))
    }

    /// Category and allocation for a score in one lookup.
    pub fn profile(&self, score: i64) -> Result<Option<(RiskCategory, &AllocationDistribution)>, ProfileError> {
        match self.classify(score) {
            Some(category) => Ok(Some((category, self.allocation_for(category)?))),
            None => Ok(None),
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(ProfilerConfig::reference())
    }
}

/// Weighted average of the allocation percentages.
///
/// `(2·equity + 3·debt + 4·commodities + 7·cash) / 16`
pub fn expected_return(distribution: &AllocationDistribution) -> Result<f64, ProfileError> {
    if !distribution.is_valid() {
        return Err(ProfileError::InvalidDistribution {
            total: distribution.total(),
        });
    }

    let weight_sum: u32 = AssetClass::ALL.iter().map(|c| c.return_weight()).sum();
    let weighted: u32 = AssetClass::ALL
        .iter()
        .map(|&c| c.return_weight() * distribution.get(c))
        .sum();

    Ok(weighted as f64 / weight_sum as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::REFERENCE_ALLOCATION;

    #[test]
    fn reference_ranges_classify_inclusively() {
        let classifier = RiskClassifier::default();
        let cases = [
            (0..=10, RiskCategory::Conservative),
            (11..=20, RiskCategory::Balanced),
            (21..=30, RiskCategory::Moderate),
            (31..=40, RiskCategory::Aggressive),
            (41..=99, RiskCategory::VeryAggressive),
        ];
        for (range, expected) in cases {
            for score in range {
                assert_eq!(classifier.classify(score), Some(expected), "score {score}");
            }
        }
    }

    #[test]
    fn out_of_table_scores_are_unclassified() {
        let classifier = RiskClassifier::default();
        for score in [-1, -100, 100, 101, 999, i64::MAX, i64::MIN] {
            assert_eq!(classifier.classify(score), None, "score {score}");
        }
    }

    #[test]
    fn every_category_has_an_allocation_summing_to_100() {
        let classifier = RiskClassifier::default();
        for c in RiskCategory::ALL {
            let dist = classifier.allocation_for(c).unwrap();
            assert_eq!(dist.total(), 100);
        }
    }

    #[test]
    fn expected_return_of_reference_allocation() {
        // (20 + 60 + 160 + 210) / 16
        let r = expected_return(&REFERENCE_ALLOCATION).unwrap();
        assert!((r - 450.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn expected_return_rejects_bad_totals() {
        let err = expected_return(&AllocationDistribution::new(50, 50, 50, 0)).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidDistribution { total: 150 }));
    }

    #[test]
    fn expected_return_bounds_hold_for_single_asset_portfolios() {
        // All-in on one class gives weight × 100 / 16; a blend lies between
        // the cheapest and the richest of those.
        let equity_only = expected_return(&AllocationDistribution::new(100, 0, 0, 0)).unwrap();
        let cash_only = expected_return(&AllocationDistribution::new(0, 0, 0, 100)).unwrap();
        let blended = expected_return(&AllocationDistribution::new(25, 25, 25, 25)).unwrap();
        assert!((equity_only - 12.5).abs() < 1e-12);
        assert!((cash_only - 43.75).abs() < 1e-12);
        assert!(equity_only <= blended && blended <= cash_only);
    }

    #[test]
    fn profile_pairs_category_with_allocation() {
        let classifier = RiskClassifier::default();
        let (category, dist) = classifier.profile(27).unwrap().unwrap();
        assert_eq!(category, RiskCategory::Moderate);
        assert_eq!(*dist, REFERENCE_ALLOCATION);
        assert!(classifier.profile(100).unwrap().is_none());
    }
}
