//! Reserved-commitment evaluation shared by compute and warehouse
//!
//! Reserved catalog partitions keep two row shapes for one commitment, told
//! apart by the `Unit` column: `Quantity` rows carry the one-time upfront fee
//! per reservation and `Hrs` rows carry the recurring hourly fee. The
//! purchase option decides which shapes apply: all-upfront commitments have
//! no hourly fee, no-upfront commitments have no upfront fee.

use rust_decimal::Decimal;

use ratecard_common::dimensions::terms::PurchaseOption;
use ratecard_common::error::Result;
use ratecard_common::{HOURS_IN_MONTH, MONTHS_IN_YEAR};
use ratecard_engine::{evaluate, Partition, Predicate, PriceAccumulator, Unit};

/// Hours billed by one reserved commitment: every instance, every billing
/// month, for the full term.
pub(crate) fn reserved_hours(instance_count: u32, years: u32) -> Decimal {
    Decimal::from(instance_count) * Decimal::from(HOURS_IN_MONTH * MONTHS_IN_YEAR * years)
}

/// Prices one reserved commitment against `partition`.
///
/// Runs a `Quantity` pass (usage = instance count) for the upfront fee and an
/// `Hrs` pass (usage = [`reserved_hours`]) for the recurring fee, each gated
/// on the purchase option.
pub(crate) fn evaluate_reserved(
    service: &str,
    partition: &Partition,
    base: &Predicate,
    purchase_option: PurchaseOption,
    instance_count: u32,
    years: u32,
    acc: &mut PriceAccumulator,
) -> Result<()> {
    if purchase_option.has_upfront_fee() {
        let upfront = base.clone().with_unit(Unit::Quantity);
        evaluate(
            service,
            partition,
            &upfront,
            Decimal::from(instance_count),
            acc,
        )?;
    }
    if purchase_option.has_hourly_fee() {
        let hourly = base.clone().with_unit(Unit::Hours);
        evaluate(
            service,
            partition,
            &hourly,
            reserved_hours(instance_count, years),
            acc,
        )?;
    }
    Ok(())
}
