//! Priced line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced line item, produced per matching catalog rate tier with a
/// positive billable band.
///
/// Amounts are rounded to 4 decimal places at the record level; result totals
/// round to 2 decimal places on top of the already-rounded record amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecord {
    /// Service identifier this line item belongs to
    pub service: String,
    /// Monetary amount, rounded to 4 decimal places
    pub amount: Decimal,
    /// Human-readable rate description from the catalog
    pub description: String,
    /// Rate applied, per unit
    pub price_per_unit: Decimal,
    /// Usage units billed in this tier, rounded to a whole number
    pub usage_units: Decimal,
    /// Catalog rate code
    pub rate_code: String,
}

impl PricingRecord {
    pub fn new(
        service: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
        price_per_unit: Decimal,
        usage_units: Decimal,
        rate_code: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            amount: amount.round_dp(4),
            description: description.into(),
            price_per_unit,
            usage_units: usage_units.round_dp(0),
            rate_code: rate_code.into(),
        }
    }
}
