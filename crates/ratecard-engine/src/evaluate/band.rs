//! Billable band arithmetic for tiered rates

use rust_decimal::Decimal;

use crate::catalog::RangeEnd;

/// Units of `usage` that fall inside the tier `(begin, end]`.
///
/// Usage fills tiers from the lowest boundary upward: a tier below the usage
/// amount bills its full width, the tier containing the usage amount bills the
/// remainder, and tiers above it bill nothing.
pub fn billable_band(usage: Decimal, begin: Decimal, end: RangeEnd) -> Decimal {
    match end {
        RangeEnd::Infinite => {
            if begin < usage {
                usage - begin
            } else {
                Decimal::ZERO
            }
        }
        RangeEnd::Finite(end) => {
            if begin < usage && usage <= end {
                usage - begin
            } else if usage > end {
                end - begin
            } else {
                Decimal::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_ended_tier_bills_everything_above_begin() {
        assert_eq!(
            billable_band(dec!(250), dec!(0), RangeEnd::Infinite),
            dec!(250)
        );
        assert_eq!(
            billable_band(dec!(150), dec!(100), RangeEnd::Infinite),
            dec!(50)
        );
    }

    #[test]
    fn test_usage_below_tier_bills_nothing() {
        assert_eq!(
            billable_band(dec!(50), dec!(100), RangeEnd::Infinite),
            dec!(0)
        );
        assert_eq!(
            billable_band(dec!(100), dec!(100), RangeEnd::Finite(dec!(200))),
            dec!(0)
        );
    }

    #[test]
    fn test_usage_above_tier_bills_full_width() {
        assert_eq!(
            billable_band(dec!(150), dec!(0), RangeEnd::Finite(dec!(100))),
            dec!(100)
        );
    }

    #[test]
    fn test_usage_inside_tier_bills_remainder() {
        assert_eq!(
            billable_band(dec!(150), dec!(100), RangeEnd::Finite(dec!(200))),
            dec!(50)
        );
    }

    #[test]
    fn test_contiguous_tiers_tile_usage_exactly() {
        // Catalog convention: each tier ends where the next begins.
        let tiers = [
            (dec!(0), RangeEnd::Finite(dec!(1024))),
            (dec!(1024), RangeEnd::Finite(dec!(10240))),
            (dec!(10240), RangeEnd::Infinite),
        ];
        for usage in [dec!(0), dec!(1), dec!(1024), dec!(5000), dec!(99999.5)] {
            let total: Decimal = tiers
                .iter()
                .map(|(begin, end)| billable_band(usage, *begin, *end))
                .sum();
            assert_eq!(total, usage);
        }
    }
}
