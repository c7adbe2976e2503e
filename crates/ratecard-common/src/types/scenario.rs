//! Calculation results and one-dimension comparison output

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::record::PricingRecord;
use crate::DEFAULT_CURRENCY;

/// Aggregate of a single price calculation.
///
/// Invariant: `total_cost` equals the sum of the record amounts rounded to 2
/// decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// Catalog version the calculation was priced against
    pub version: String,
    /// Region code the calculation was priced in
    pub region: String,
    /// Total cost, rounded to 2 decimal places
    pub total_cost: Decimal,
    /// Currency of every amount in this result
    pub currency: String,
    /// Line items, in evaluation order
    pub pricing_records: Vec<PricingRecord>,
    /// Snapshot of the validated input dimensions
    pub dimensions: serde_json::Value,
}

impl PricingResult {
    pub fn new(
        version: impl Into<String>,
        region: impl Into<String>,
        total_cost: Decimal,
        pricing_records: Vec<PricingRecord>,
        dimensions: serde_json::Value,
    ) -> Self {
        Self {
            version: version.into(),
            region: region.into(),
            total_cost: total_cost.round_dp(2),
            currency: DEFAULT_CURRENCY.to_string(),
            pricing_records,
            dimensions,
        }
    }
}

/// One ranked point in a one-dimension comparison sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingScenario {
    /// Candidate value this scenario priced, e.g. a region code
    pub id: String,
    /// Report label for the candidate (region label, or the candidate itself)
    pub display_name: String,
    /// Snapshot of the input dimensions used for this candidate
    pub dimensions: serde_json::Value,
    pub pricing_records: Vec<PricingRecord>,
    pub total_cost: Decimal,
    /// Cost difference to the previous (next-cheaper) scenario
    pub delta_previous: Decimal,
    /// Percent difference to the previous scenario, 0 when it cost 0
    pub pct_to_previous: Decimal,
    /// Cost difference to the cheapest scenario
    pub delta_cheapest: Decimal,
    /// Percent difference to the cheapest scenario, 0 when it cost 0
    pub pct_to_cheapest: Decimal,
}

/// Ranked output of a comparison sweep, cheapest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    /// Catalog version taken from the cheapest scenario
    pub version: String,
    /// Dimension the sweep varied, e.g. `region` or `storage-class`
    pub sort_criteria: String,
    pub scenarios: Vec<PricingScenario>,
}
