//! Static classifier configuration.
//!
//! The range table and the allocation table are compiled-in constants, but they
//! are wrapped in an immutable [`ProfilerConfig`] that is built once and handed to
//! the classifier explicitly.

use std::collections::BTreeMap;

use crate::domain::{AllocationDistribution, RiskCategory, RiskRange};
use crate::error::ProfileError;

/// Reference score ranges.
pub const REFERENCE_RANGES: [RiskRange; 5] = [
    RiskRange::new(0, 10, RiskCategory::Conservative),
    RiskRange::new(11, 20, RiskCategory::Balanced),
    RiskRange::new(21, 30, RiskCategory::Moderate),
    RiskRange::new(31, 40, RiskCategory::Aggressive),
    RiskRange::new(41, 99, RiskCategory::VeryAggressive),
];

/// Reference allocation shared by every category.
///
/// Every tier currently receives the same split. This needs real per-category
/// numbers from the business before production use; see
/// [`ProfilerConfig::has_uniform_allocations`].
pub const REFERENCE_ALLOCATION: AllocationDistribution = AllocationDistribution::new(10, 20, 40, 30);

/// Validated range + allocation tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerConfig {
    ranges: Vec<RiskRange>,
    allocations: BTreeMap<RiskCategory, AllocationDistribution>,
}

impl ProfilerConfig {
    /// Build a configuration, rejecting malformed tables.
    ///
    /// Checks:
    /// - every range has `low <= high`
    /// - no two ranges overlap (so evaluation order never matters)
    /// - every category has an allocation, and every allocation sums to 100
    pub fn new(
        ranges: Vec<RiskRange>,
        allocations: BTreeMap<RiskCategory, AllocationDistribution>,
    ) -> Result<Self, ProfileError> {
        for r in &ranges {
            if r.low > r.high {
                return Err(ProfileError::Configuration(format!(
                    "Range [{}, {}] for `{}` has low > high.",
                    r.low, r.high, r.category
                )));
            }
        }

        for (i, a) in ranges.iter().enumerate() {
            if let Some(b) = ranges[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(ProfileError::Configuration(format!(
                    "Ranges [{}, {}] ({}) and [{}, {}] ({}) overlap.",
                    a.low, a.high, a.category, b.low, b.high, b.category
                )));
            }
        }

        for category in RiskCategory::ALL {
            let dist = allocations.get(&category).ok_or_else(|| {
                ProfileError::Configuration(format!("No allocation configured for `{category}`."))
            })?;
            if !dist.is_valid() {
                return Err(ProfileError::InvalidDistribution { total: dist.total() });
            }
        }

        Ok(Self { ranges, allocations })
    }

    /// The compiled-in reference tables.
    pub fn reference() -> Self {
        Self {
            ranges: REFERENCE_RANGES.to_vec(),
            allocations: RiskCategory::ALL
                .into_iter()
                .map(|c| (c, REFERENCE_ALLOCATION))
                .collect(),
        }
    }

    pub fn ranges(&self) -> &[RiskRange] {
        &self.ranges
    }

    pub fn allocation(&self, category: RiskCategory) -> Option<&AllocationDistribution> {
        self.allocations.get(&category)
    }

    /// Range configured for a category, if any.
    /// True when every category shares one distribution.
    pub fn has_uniform_allocations(&self) -> bool {
        let mut values = self.allocations.values();
        match values.next() {
            Some(first) => values.all(|d| d == first),
            None => false,
        }
    }
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self::reference()
    }
}
