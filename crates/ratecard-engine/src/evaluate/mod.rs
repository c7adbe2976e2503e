//! Tiered billable-band evaluator
//!
//! The evaluator takes a loaded partition, a structural predicate, and a
//! usage amount, and prices the usage against every matching rate tier:
//!
//! - **Predicate** ([`predicate`]): conjunction of exact field equalities
//! - **Band math** ([`band`]): how much usage falls inside one tier
//! - **Accumulator** ([`accumulator`]): line items and running total shared
//!   across the components of one calculation

pub mod accumulator;
pub mod band;
pub mod predicate;

pub use accumulator::PriceAccumulator;
pub use band::billable_band;
pub use predicate::{Predicate, Unit};

use rust_decimal::Decimal;
use tracing::debug;

use ratecard_common::error::{NoDataFoundError, Result};
use ratecard_common::PricingRecord;

use crate::catalog::Partition;

/// Prices `usage` against every rate tier in `partition` matching `predicate`.
///
/// Appends one [`PricingRecord`] per tier with a positive billable band. Fails
/// with [`NoDataFoundError`] when the predicate matches no rows at all; zero
/// usage against matching rows is not an error, it just records nothing.
pub fn evaluate(
    service: &str,
    partition: &Partition,
    predicate: &Predicate,
    usage: Decimal,
    acc: &mut PriceAccumulator,
) -> Result<()> {
    let mut matched = 0usize;
    let mut recorded = 0usize;
    for row in partition.rows() {
        if !predicate.matches(row) {
            continue;
        }
        matched += 1;

        let begin = row.begin_range()?;
        let end = row.end_range()?;
        let band = billable_band(usage, begin, end);
        if band > Decimal::ZERO {
            let price = row.price_per_unit()?;
            acc.add(PricingRecord::new(
                service,
                price * band,
                row.description(),
                price,
                band,
                row.rate_code(),
            ));
            recorded += 1;
        }
    }

    if matched == 0 {
        return Err(NoDataFoundError::new(service, predicate.to_string()).into());
    }
    debug!(service, query = %predicate, matched, recorded, "evaluated rate tiers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRow;
    use ratecard_common::error::{CatalogError, RatecardError};
    use rust_decimal_macros::dec;

    fn tier(begin: &str, end: &str, price: &str, code: &str) -> CatalogRow {
        CatalogRow::from_pairs([
            ("StartingRange", begin),
            ("EndingRange", end),
            ("PricePerUnit", price),
            ("PriceDescription", "per GB of data processed"),
            ("RateCode", code),
            ("Unit", "GB"),
            ("Group", "Data Processing"),
        ])
    }

    fn group() -> Predicate {
        Predicate::new().with_field("Group", "Data Processing")
    }

    #[test]
    fn test_single_open_tier_prices_full_usage() {
        let partition = Partition::from_rows(vec![tier("0", "Inf", "0.10", "CODE.1")]);
        let mut acc = PriceAccumulator::new();

        evaluate("compute", &partition, &group(), dec!(250), &mut acc).unwrap();

        assert_eq!(acc.records().len(), 1);
        assert_eq!(acc.records()[0].amount, dec!(25.00));
        assert_eq!(acc.records()[0].usage_units, dec!(250));
        assert_eq!(acc.total(), dec!(25.00));
    }

    #[test]
    fn test_usage_spanning_two_tiers_bills_each_band() {
        let partition = Partition::from_rows(vec![
            tier("0", "100", "0.05", "CODE.1"),
            tier("100", "Inf", "0.03", "CODE.2"),
        ]);
        let mut acc = PriceAccumulator::new();

        evaluate("compute", &partition, &group(), dec!(150), &mut acc).unwrap();

        assert_eq!(acc.records().len(), 2);
        assert_eq!(acc.records()[0].usage_units, dec!(100));
        assert_eq!(acc.records()[0].amount, dec!(5.00));
        assert_eq!(acc.records()[1].usage_units, dec!(50));
        assert_eq!(acc.records()[1].amount, dec!(1.50));

        let result = acc.into_result("20190730231906", "us-east-1", serde_json::json!({}));
        assert_eq!(result.total_cost, dec!(6.50));
    }

    #[test]
    fn test_zero_usage_records_nothing_without_error() {
        let partition = Partition::from_rows(vec![tier("0", "Inf", "0.10", "CODE.1")]);
        let mut acc = PriceAccumulator::new();

        evaluate("compute", &partition, &group(), dec!(0), &mut acc).unwrap();

        assert!(acc.is_empty());
        assert_eq!(acc.total(), dec!(0));
    }

    #[test]
    fn test_unmatched_predicate_names_service_and_query() {
        let partition = Partition::from_rows(vec![tier("0", "Inf", "0.10", "CODE.1")]);
        let mut acc = PriceAccumulator::new();
        let predicate = Predicate::new()
            .with_field("Instance Type", "x9.gigantic")
            .with_unit(Unit::Hours);

        let err = evaluate("compute", &partition, &predicate, dec!(10), &mut acc).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find rate data for service:[compute] - query:[Instance Type=x9.gigantic, Unit=Hrs]"
        );
    }

    #[test]
    fn test_non_matching_rows_are_ignored() {
        let partition = Partition::from_rows(vec![
            tier("0", "Inf", "0.10", "CODE.1"),
            CatalogRow::from_pairs([
                ("StartingRange", "0"),
                ("EndingRange", "Inf"),
                ("PricePerUnit", "99.0"),
                ("PriceDescription", "per load balancer hour"),
                ("RateCode", "CODE.LB"),
                ("Group", "Load Balancing"),
            ]),
        ]);
        let mut acc = PriceAccumulator::new();

        evaluate("compute", &partition, &group(), dec!(10), &mut acc).unwrap();

        assert_eq!(acc.records().len(), 1);
        assert_eq!(acc.records()[0].rate_code, "CODE.1");
    }

    #[test]
    fn test_unparseable_price_is_a_catalog_error() {
        let partition = Partition::from_rows(vec![tier("0", "Inf", "n/a", "CODE.BAD")]);
        let mut acc = PriceAccumulator::new();

        let err = evaluate("compute", &partition, &group(), dec!(10), &mut acc).unwrap_err();
        assert!(matches!(
            err,
            RatecardError::Catalog(CatalogError::BadField { field: "PricePerUnit", .. })
        ));
    }

    #[test]
    fn test_repeated_evaluation_is_deterministic() {
        let partition = Partition::from_rows(vec![
            tier("0", "100", "0.05", "CODE.1"),
            tier("100", "Inf", "0.03", "CODE.2"),
        ]);

        let run = || {
            let mut acc = PriceAccumulator::new();
            evaluate("compute", &partition, &group(), dec!(150), &mut acc).unwrap();
            acc.into_result("20190730231906", "us-east-1", serde_json::json!({}))
        };
        assert_eq!(run(), run());
    }
}
