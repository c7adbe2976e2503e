//! Comparison and term-analysis engines built on the evaluator
//!
//! - [`compare`]: sweeps one input dimension across candidate values and
//!   ranks the priced results cheapest first
//! - [`term`]: sweeps commitment terms across regions, decomposes each
//!   scenario into upfront and recurring fees, and derives the amortization
//!   schedule with break-even months

pub mod compare;
pub mod term;

pub use compare::{compare, Candidate};
pub use term::{compare_terms, TermAnalysisRequest, TermPriceModel};

use rust_decimal::Decimal;

/// Delta and percent difference of `cost` against `baseline`, both rounded
/// to 2 decimal places. The percent is 0 when the baseline is 0.
pub(crate) fn rank_metrics(cost: Decimal, baseline: Decimal) -> (Decimal, Decimal) {
    let delta = cost - baseline;
    let pct = if baseline.is_zero() {
        Decimal::ZERO
    } else {
        (Decimal::ONE_HUNDRED * delta / baseline).round_dp(2)
    };
    (delta.round_dp(2), pct)
}
