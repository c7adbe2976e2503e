//! Record accumulator shared across the usage components of one calculation

use rust_decimal::Decimal;

use ratecard_common::{PricingRecord, PricingResult};

/// Collects line items and a running total across evaluator calls.
///
/// A calculation prices several usage components against different partitions
/// and predicates; one accumulator threads through all of them and is then
/// folded into a [`PricingResult`].
#[derive(Debug, Clone, Default)]
pub struct PriceAccumulator {
    records: Vec<PricingRecord>,
    total: Decimal,
}

impl PriceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line item and adds its rounded amount to the running total.
    pub fn add(&mut self, record: PricingRecord) {
        self.total += record.amount;
        self.records.push(record);
    }

    /// Running total: the exact sum of the rounded record amounts.
    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn records(&self) -> &[PricingRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Folds the accumulated records into a result stamped with the catalog
    /// version and the validated input dimensions.
    pub fn into_result(
        self,
        version: impl Into<String>,
        region: impl Into<String>,
        dimensions: serde_json::Value,
    ) -> PricingResult {
        PricingResult::new(version, region, self.total, self.records, dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(amount: Decimal) -> PricingRecord {
        PricingRecord::new(
            "compute",
            amount,
            "per On Demand Linux m5.large Instance Hour",
            dec!(0.096),
            dec!(730),
            "HZC9FAP4F9Y8JW67.JRTCKXETXF.6YS6EN2CT7",
        )
    }

    #[test]
    fn test_total_tracks_rounded_record_amounts() {
        let mut acc = PriceAccumulator::new();
        acc.add(record(dec!(5.00004)));
        acc.add(record(dec!(1.50)));
        // 5.0000 + 1.5000, the first amount rounded at the record level
        assert_eq!(acc.total(), dec!(6.5000));
        assert_eq!(acc.records().len(), 2);
    }

    #[test]
    fn test_into_result_rounds_the_total() {
        let mut acc = PriceAccumulator::new();
        acc.add(record(dec!(5.0037)));
        acc.add(record(dec!(1.5011)));
        let result = acc.into_result("20190730231906", "us-east-1", serde_json::json!({}));
        assert_eq!(result.total_cost, dec!(6.50));
        assert_eq!(result.pricing_records.len(), 2);
    }
}
