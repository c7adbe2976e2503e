//! One-dimension comparison sweeps with delta-to-cheapest ranking

use rust_decimal::Decimal;
use tracing::{debug, warn};

use ratecard_common::error::{NoDataFoundError, RatecardError, Result};
use ratecard_common::{PriceComparison, PricingResult, PricingScenario};

use super::rank_metrics;

/// One candidate in a comparison sweep: an identifier, a report label, and
/// the request to price.
#[derive(Debug, Clone)]
pub struct Candidate<R> {
    pub id: String,
    pub display_name: String,
    pub request: R,
}

impl<R> Candidate<R> {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, request: R) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            request,
        }
    }
}

/// Prices every candidate and ranks the results by total cost, cheapest
/// first.
///
/// Candidates without rate data are skipped, as are candidates pricing to
/// zero. Ties keep the candidate input order. Fails with
/// [`NoDataFoundError`] only when no candidate produced a billable result.
pub fn compare<R>(
    service: &str,
    sort_criteria: &str,
    candidates: &[Candidate<R>],
    mut price: impl FnMut(&R) -> Result<PricingResult>,
) -> Result<PriceComparison> {
    let mut priced: Vec<(usize, PricingResult)> = Vec::with_capacity(candidates.len());
    let mut last_missing: Option<NoDataFoundError> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        match price(&candidate.request) {
            Ok(result) if result.total_cost > Decimal::ZERO => priced.push((index, result)),
            Ok(_) => {
                debug!(candidate = %candidate.id, "candidate priced to zero, dropped from ranking");
            }
            Err(RatecardError::NoDataFound(missing)) => {
                warn!(candidate = %candidate.id, error = %missing, "no rate data for candidate, skipping");
                last_missing = Some(missing);
            }
            Err(err) => return Err(err),
        }
    }

    if priced.is_empty() {
        let missing = last_missing.unwrap_or_else(|| {
            NoDataFoundError::new(service, format!("{sort_criteria} sweep over {} candidates", candidates.len()))
        });
        return Err(missing.into());
    }

    // Stable sort: tied costs keep candidate input order.
    priced.sort_by(|a, b| a.1.total_cost.cmp(&b.1.total_cost));

    let version = priced[0].1.version.clone();
    let cheapest = priced[0].1.total_cost;
    let mut previous: Option<Decimal> = None;
    let mut scenarios = Vec::with_capacity(priced.len());
    for (index, result) in priced {
        let candidate = &candidates[index];
        let cost = result.total_cost;
        let (delta_cheapest, pct_to_cheapest) = rank_metrics(cost, cheapest);
        let (delta_previous, pct_to_previous) = match previous {
            Some(prev) => rank_metrics(cost, prev),
            None => (Decimal::ZERO, Decimal::ZERO),
        };
        previous = Some(cost);

        scenarios.push(PricingScenario {
            id: candidate.id.clone(),
            display_name: candidate.display_name.clone(),
            dimensions: result.dimensions,
            pricing_records: result.pricing_records,
            total_cost: cost,
            delta_previous,
            pct_to_previous,
            delta_cheapest,
            pct_to_cheapest,
        });
    }

    debug!(
        service,
        sort_criteria,
        scenarios = scenarios.len(),
        "ranked comparison sweep"
    );
    Ok(PriceComparison {
        version,
        sort_criteria: sort_criteria.to_string(),
        scenarios,
    })
}
