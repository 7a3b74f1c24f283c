//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - used in-memory during classification
//! - exported to CSV/JSON
//! - rendered by any of the front-ends

use std::fmt;

use serde::{Deserialize, Serialize};

/// Risk appetite tier assigned to a customer.
///
/// The set is closed: categories are only ever produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Conservative,
    Balanced,
    Moderate,
    Aggressive,
    VeryAggressive,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Conservative,
        RiskCategory::Balanced,
        RiskCategory::Moderate,
        RiskCategory::Aggressive,
        RiskCategory::VeryAggressive,
    ];

    /// Text form written to the `Portfolio` column.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Conservative => "conservative",
            RiskCategory::Balanced => "balanced",
            RiskCategory::Moderate => "moderate",
            RiskCategory::Aggressive => "aggressive",
            RiskCategory::VeryAggressive => "very_aggressive",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset classes a portfolio is split across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Equity,
    Debt,
    Commodities,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Equity,
        AssetClass::Debt,
        AssetClass::Commodities,
        AssetClass::Cash,
    ];

    /// Per-unit weight used by the expected-return calculation.
    pub fn return_weight(self) -> u32 {
        match self {
            AssetClass::Equity => 2,
            AssetClass::Debt => 3,
            AssetClass::Commodities => 4,
            AssetClass::Cash => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Equity => "equity",
            AssetClass::Debt => "debt",
            AssetClass::Commodities => "commodities",
            AssetClass::Cash => "cash",
        }
    }
}

/// Percentage split of a portfolio across the four asset classes.
///
/// A valid distribution sums to exactly 100; see [`AllocationDistribution::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationDistribution {
    pub equity: u32,
    pub debt: u32,
    pub commodities: u32,
    pub cash: u32,
}

impl AllocationDistribution {
    pub const fn new(equity: u32, debt: u32, commodities: u32, cash: u32) -> Self {
        Self {
            equity,
            debt,
            commodities,
            cash,
        }
    }

    pub fn get(&self, class: AssetClass) -> u32 {
        match class {
            AssetClass::Equity => self.equity,
            AssetClass::Debt => self.debt,
            AssetClass::Commodities => self.commodities,
            AssetClass::Cash => self.cash,
        }
    }

    pub fn total(&self) -> u32 {
        AssetClass::ALL.iter().map(|&c| self.get(c)).sum()
    }

    pub fn is_valid(&self) -> bool {
        self.total() == 100
    }
}

/// Closed interval `[low, high]` of scores mapped to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRange {
    pub low: i64,
    pub high: i64,
    pub category: RiskCategory,
}

impl RiskRange {
    pub const fn new(low: i64, high: i64, category: RiskCategory) -> Self {
        Self { low, high, category }
    }

    pub fn contains(&self, score: i64) -> bool {
        self.low <= score && score <= self.high
    }

    pub fn overlaps(&self, other: &RiskRange) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

/// One customer row as read from the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub name: String,
    /// Username column; written to the output's `Email` column.
    pub email: String,
    pub contact: String,
    /// Raw `Total score` text, e.g. `"27 (Moderate)"`.
    pub raw_score: String,
}

/// One output row. `portfolio` is empty when the score was unclassified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub portfolio: String,
}

impl PortfolioRecord {
    pub fn from_customer(customer: CustomerRecord, category: Option<RiskCategory>) -> Self {
        Self {
            name: customer.name,
            email: customer.email,
            contact: customer.contact,
            portfolio: category.map(|c| c.as_str().to_string()).unwrap_or_default(),
        }
    }

    pub fn is_classified(&self) -> bool {
        !self.portfolio.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_text_matches_serde_form() {
        for c in RiskCategory::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), c.as_str());
            assert_eq!(c.to_string(), c.as_str());
        }
        assert_eq!(RiskCategory::VeryAggressive.to_string(), "very_aggressive");
    }

    #[test]
    fn ranges_overlap_on_shared_endpoint() {
        let a = RiskRange::new(0, 10, RiskCategory::Conservative);
        let b = RiskRange::new(10, 20, RiskCategory::Balanced);
        let c = RiskRange::new(11, 20, RiskCategory::Balanced);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(10));
        assert!(!a.contains(11));
    }

    #[test]
    fn unclassified_customer_gets_empty_portfolio() {
        let customer = CustomerRecord {
            name: "Bob".to_string(),
            email: "bob@x.com".to_string(),
            contact: "1".to_string(),
            raw_score: "150".to_string(),
        };
        let out = PortfolioRecord::from_customer(customer, None);
        assert_eq!(out.portfolio, "");
        assert!(!out.is_classified());
    }
}
