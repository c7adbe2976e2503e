//! Term comparison and amortization over commitment horizons

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use ratecard_common::dimensions::{OfferingClass, PurchaseOption, Region, TermType};
use ratecard_common::error::{NoDataFoundError, RatecardError, Result};
use ratecard_common::types::term::{recurring_monthly_fee, upfront_fee};
use ratecard_common::{
    MonthlyCost, PricingResult, TermPricingAnalysis, TermPricingScenario, HOURS_IN_YEAR,
    MONTHS_IN_YEAR,
};

use super::rank_metrics;
use crate::catalog::CatalogStore;

/// Prices one service's usage under a given commitment model.
///
/// Implemented by the service modules that sell reserved capacity; the term
/// engine drives it across the commitment cross-product.
pub trait TermPriceModel {
    /// Service identifier stamped on records and errors.
    fn service(&self) -> &str;

    /// Prices the pay-as-you-go baseline for `hours` of usage in `region`.
    fn price_on_demand(
        &self,
        store: &CatalogStore,
        region: &'static Region,
        hours: Decimal,
    ) -> Result<PricingResult>;

    /// Prices one reserved commitment over `years` years.
    fn price_reserved(
        &self,
        store: &CatalogStore,
        region: &'static Region,
        years: u32,
        offering_class: OfferingClass,
        purchase_option: PurchaseOption,
    ) -> Result<PricingResult>;
}

/// Scope of a term comparison: regions, horizon, and the commitment
/// dimensions to sweep.
#[derive(Debug, Clone)]
pub struct TermAnalysisRequest {
    pub regions: Vec<&'static Region>,
    pub years: u32,
    pub term_types: Vec<TermType>,
    pub offering_classes: Vec<OfferingClass>,
    pub purchase_options: Vec<PurchaseOption>,
}

impl TermAnalysisRequest {
    /// Sweeps both term types across every offering class and purchase option.
    pub fn new(regions: Vec<&'static Region>, years: u32) -> Self {
        Self {
            regions,
            years,
            term_types: TermType::ALL.to_vec(),
            offering_classes: OfferingClass::ALL.to_vec(),
            purchase_options: PurchaseOption::ALL.to_vec(),
        }
    }
}

// Scenario plus the unrounded fees the schedule is derived from.
struct PricedScenario {
    scenario: TermPricingScenario,
    upfront: Decimal,
    monthly: Decimal,
}

/// Prices the {term type} x {offering class} x {purchase option} cross-product
/// in every requested region, ranks the scenarios, and derives the
/// month-by-month amortization schedule.
///
/// The on-demand baseline is priced once per region and feeds the savings and
/// break-even math of every scenario in that region. Regions without a
/// baseline and commitments without rate data are skipped; the sweep fails
/// with [`NoDataFoundError`] only when nothing priced at all.
pub fn compare_terms(
    model: &dyn TermPriceModel,
    store: &CatalogStore,
    request: &TermAnalysisRequest,
) -> Result<TermPricingAnalysis> {
    let service = model.service();
    let months = MONTHS_IN_YEAR * request.years;
    let horizon_hours = Decimal::from(HOURS_IN_YEAR * request.years);

    let mut priced: Vec<PricedScenario> = Vec::new();
    let mut version: Option<String> = None;
    let mut last_missing: Option<NoDataFoundError> = None;

    for region in &request.regions {
        // Every scenario in the region amortizes against this baseline.
        let baseline = match model.price_on_demand(store, region, horizon_hours) {
            Ok(result) => result,
            Err(RatecardError::NoDataFound(missing)) => {
                warn!(
                    service,
                    region = region.code,
                    error = %missing,
                    "no on-demand baseline, skipping region"
                );
                last_missing = Some(missing);
                continue;
            }
            Err(err) => return Err(err),
        };
        let on_demand_cost = baseline.total_cost;
        version.get_or_insert_with(|| baseline.version.clone());

        if request.term_types.contains(&TermType::OnDemand) {
            priced.push(PricedScenario::build(
                region,
                TermType::OnDemand,
                None,
                None,
                request.years,
                baseline,
                on_demand_cost,
            ));
        }

        if !request.term_types.contains(&TermType::Reserved) {
            continue;
        }
        for offering_class in &request.offering_classes {
            for purchase_option in &request.purchase_options {
                match model.price_reserved(
                    store,
                    region,
                    request.years,
                    *offering_class,
                    *purchase_option,
                ) {
                    Ok(result) => priced.push(PricedScenario::build(
                        region,
                        TermType::Reserved,
                        Some(*offering_class),
                        Some(*purchase_option),
                        request.years,
                        result,
                        on_demand_cost,
                    )),
                    Err(RatecardError::NoDataFound(missing)) => {
                        warn!(
                            service,
                            region = region.code,
                            offering_class = %offering_class,
                            purchase_option = %purchase_option,
                            error = %missing,
                            "no reserved rate data, skipping scenario"
                        );
                        last_missing = Some(missing);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }

    priced.retain(|entry| entry.scenario.total_cost > Decimal::ZERO);
    if priced.is_empty() {
        let missing = last_missing.unwrap_or_else(|| {
            NoDataFoundError::new(
                service,
                format!("term sweep over {} regions", request.regions.len()),
            )
        });
        return Err(missing.into());
    }

    // Stable sort: tied costs keep sweep order.
    priced.sort_by(|a, b| a.scenario.total_cost.cmp(&b.scenario.total_cost));

    let cheapest = priced[0].scenario.total_cost;
    let mut previous: Option<Decimal> = None;
    for entry in &mut priced {
        let cost = entry.scenario.total_cost;
        let (delta_cheapest, pct_to_cheapest) = rank_metrics(cost, cheapest);
        let (delta_previous, pct_to_previous) = match previous {
            Some(prev) => rank_metrics(cost, prev),
            None => (Decimal::ZERO, Decimal::ZERO),
        };
        previous = Some(cost);
        entry.scenario.delta_cheapest = delta_cheapest;
        entry.scenario.pct_to_cheapest = pct_to_cheapest;
        entry.scenario.delta_previous = delta_previous;
        entry.scenario.pct_to_previous = pct_to_previous;
    }

    let mut monthly_costs = BTreeMap::new();
    for month in 1..=months {
        let row = priced
            .iter()
            .map(|entry| MonthlyCost {
                scenario_id: entry.scenario.id.clone(),
                accumulated: (entry.upfront + entry.monthly * Decimal::from(month)).round_dp(2),
            })
            .collect();
        monthly_costs.insert(month, row);
    }

    debug!(
        service,
        regions = request.regions.len(),
        years = request.years,
        scenarios = priced.len(),
        "ranked term comparison"
    );
    Ok(TermPricingAnalysis {
        version: version.unwrap_or_default(),
        regions: request.regions.iter().map(|r| r.code.to_string()).collect(),
        years: request.years,
        scenarios: priced.into_iter().map(|entry| entry.scenario).collect(),
        monthly_costs,
    })
}

impl PricedScenario {
    fn build(
        region: &'static Region,
        term_type: TermType,
        offering_class: Option<OfferingClass>,
        purchase_option: Option<PurchaseOption>,
        years: u32,
        result: PricingResult,
        on_demand_cost: Decimal,
    ) -> Self {
        let cost = result.total_cost;
        let upfront = upfront_fee(&result.pricing_records);
        let monthly = recurring_monthly_fee(&result.pricing_records, years);

        let savings_pct = if on_demand_cost.is_zero() {
            Decimal::ZERO
        } else {
            (Decimal::ONE_HUNDRED * (cost - on_demand_cost) / on_demand_cost)
                .abs()
                .round_dp(2)
        };

        Self {
            scenario: TermPricingScenario {
                id: scenario_id(region, term_type, offering_class, purchase_option),
                region: region.code.to_string(),
                term_type,
                offering_class,
                purchase_option,
                dimensions: result.dimensions,
                pricing_records: result.pricing_records,
                total_cost: cost,
                on_demand_cost,
                savings_pct,
                total_savings: (on_demand_cost - cost).round_dp(2),
                upfront_fee: upfront.round_dp(2),
                monthly_fee: monthly.round_dp(2),
                months_to_break_even: break_even_month(on_demand_cost, upfront, monthly, years),
                delta_previous: Decimal::ZERO,
                pct_to_previous: Decimal::ZERO,
                delta_cheapest: Decimal::ZERO,
                pct_to_cheapest: Decimal::ZERO,
            },
            upfront,
            monthly,
        }
    }
}

fn scenario_id(
    region: &'static Region,
    term_type: TermType,
    offering_class: Option<OfferingClass>,
    purchase_option: Option<PurchaseOption>,
) -> String {
    match (offering_class, purchase_option) {
        (Some(offering_class), Some(purchase_option)) => format!(
            "{}:{}:{}:{}",
            region.code,
            term_type.code(),
            offering_class.code(),
            purchase_option.code()
        ),
        _ => format!("{}:{}", region.code, term_type.code()),
    }
}

/// First month at which cumulative on-demand spend reaches the scenario's
/// cumulative spend. The upfront fee is due in full at month 1; if the
/// horizon ends first, the final month is reported.
fn break_even_month(on_demand_cost: Decimal, upfront: Decimal, monthly: Decimal, years: u32) -> u32 {
    let months = MONTHS_IN_YEAR * years;
    if months == 0 {
        return 0;
    }
    let on_demand_monthly = on_demand_cost / Decimal::from(months);
    let mut accumulated = upfront;
    for month in 1..=months {
        accumulated += monthly;
        if on_demand_monthly * Decimal::from(month) >= accumulated {
            return month;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratecard_common::PricingRecord;
    use rust_decimal_macros::dec;

    // Flat fake rates: $1.00/hr on demand; standard-class reservations at
    // a 6000 upfront fee and/or a discounted hourly rate, convertible
    // reservations unpriced.
    struct FlatRates;

    const SERVICE: &str = "compute";

    impl TermPriceModel for FlatRates {
        fn service(&self) -> &str {
            SERVICE
        }

        fn price_on_demand(
            &self,
            _store: &CatalogStore,
            region: &'static Region,
            hours: Decimal,
        ) -> Result<PricingResult> {
            if region.code == "ap-east-1" {
                return Err(NoDataFoundError::new(SERVICE, "Instance Type=m5.large").into());
            }
            let record = PricingRecord::new(
                SERVICE,
                hours,
                "per On Demand Linux m5.large Instance Hour",
                dec!(1),
                hours,
                "OD.CODE",
            );
            Ok(PricingResult::new(
                "20190730231906",
                region.code,
                hours,
                vec![record],
                serde_json::json!({}),
            ))
        }

        fn price_reserved(
            &self,
            _store: &CatalogStore,
            region: &'static Region,
            years: u32,
            offering_class: OfferingClass,
            purchase_option: PurchaseOption,
        ) -> Result<PricingResult> {
            if offering_class == OfferingClass::Convertible {
                return Err(NoDataFoundError::new(SERVICE, "OfferingClass=convertible").into());
            }
            let mut records = Vec::new();
            if purchase_option.has_upfront_fee() {
                let fee = match purchase_option {
                    PurchaseOption::AllUpfront => dec!(6000),
                    _ => dec!(3000),
                };
                records.push(PricingRecord::new(
                    SERVICE,
                    fee,
                    "Upfront Fee",
                    fee,
                    dec!(1),
                    "RI.UPFRONT",
                ));
            }
            if purchase_option.has_hourly_fee() {
                let total = match purchase_option {
                    PurchaseOption::NoUpfront => dec!(7000),
                    _ => dec!(3000),
                };
                records.push(PricingRecord::new(
                    SERVICE,
                    total,
                    "Linux/UNIX (Amazon VPC), m5.large reserved instance applied",
                    total / (Decimal::from(HOURS_IN_YEAR * years)),
                    Decimal::from(HOURS_IN_YEAR * years),
                    "RI.HOURLY",
                ));
            }
            let total: Decimal = records.iter().map(|r| r.amount).sum();
            Ok(PricingResult::new(
                "20190730231906",
                region.code,
                total,
                records,
                serde_json::json!({}),
            ))
        }
    }

    fn store() -> CatalogStore {
        CatalogStore::new("data")
    }

    fn region(code: &str) -> &'static Region {
        Region::from_code(code).unwrap()
    }

    fn request_for(code: &str, purchase_options: Vec<PurchaseOption>) -> TermAnalysisRequest {
        TermAnalysisRequest {
            regions: vec![region(code)],
            years: 1,
            term_types: TermType::ALL.to_vec(),
            offering_classes: vec![OfferingClass::Standard],
            purchase_options,
        }
    }

    #[test]
    fn test_on_demand_scenario_breaks_even_at_month_one() {
        let request = TermAnalysisRequest {
            term_types: vec![TermType::OnDemand],
            ..request_for("us-east-1", vec![])
        };
        let analysis = compare_terms(&FlatRates, &store(), &request).unwrap();

        assert_eq!(analysis.scenarios.len(), 1);
        let scenario = &analysis.scenarios[0];
        assert_eq!(scenario.id, "us-east-1:on-demand");
        assert_eq!(scenario.total_cost, dec!(8760.00));
        assert_eq!(scenario.on_demand_cost, dec!(8760.00));
        assert_eq!(scenario.total_savings, dec!(0.00));
        assert_eq!(scenario.upfront_fee, dec!(0.00));
        assert_eq!(scenario.monthly_fee, dec!(730.00));
        assert_eq!(scenario.months_to_break_even, 1);
    }

    #[test]
    fn test_all_upfront_amortizes_against_the_baseline() {
        let request = request_for("us-east-1", vec![PurchaseOption::AllUpfront]);
        let analysis = compare_terms(&FlatRates, &store(), &request).unwrap();

        // 6000 upfront beats 8760 on demand; ranked cheapest first.
        assert_eq!(analysis.version, "20190730231906");
        assert_eq!(analysis.scenarios.len(), 2);
        let reserved = &analysis.scenarios[0];
        assert_eq!(reserved.id, "us-east-1:reserved:standard:all-upfront");
        assert_eq!(reserved.total_cost, dec!(6000.00));
        assert_eq!(reserved.upfront_fee, dec!(6000.00));
        assert_eq!(reserved.monthly_fee, dec!(0.00));
        assert_eq!(reserved.total_savings, dec!(2760.00));
        assert_eq!(reserved.savings_pct, dec!(31.51));
        // 730/month on demand crosses 6000 during month 9.
        assert_eq!(reserved.months_to_break_even, 9);
        assert!(reserved.months_to_break_even > 1);

        let on_demand = &analysis.scenarios[1];
        assert_eq!(on_demand.delta_cheapest, dec!(2760.00));
        assert_eq!(on_demand.pct_to_cheapest, dec!(46.00));
    }

    #[test]
    fn test_partial_upfront_splits_fees() {
        let request = request_for("us-east-1", vec![PurchaseOption::PartialUpfront]);
        let analysis = compare_terms(&FlatRates, &store(), &request).unwrap();

        let reserved = &analysis.scenarios[0];
        assert_eq!(reserved.id, "us-east-1:reserved:standard:partial-upfront");
        assert_eq!(reserved.total_cost, dec!(6000.00));
        assert_eq!(reserved.upfront_fee, dec!(3000.00));
        assert_eq!(reserved.monthly_fee, dec!(250.00));
        // 730m >= 3000 + 250m first holds at m = 7.
        assert_eq!(reserved.months_to_break_even, 7);
    }

    #[test]
    fn test_monthly_schedule_covers_the_horizon() {
        let request = request_for("us-east-1", vec![PurchaseOption::PartialUpfront]);
        let analysis = compare_terms(&FlatRates, &store(), &request).unwrap();

        assert_eq!(analysis.monthly_costs.len(), 12);
        let first = &analysis.monthly_costs[&1];
        assert_eq!(first.len(), analysis.scenarios.len());
        assert_eq!(first[0].scenario_id, analysis.scenarios[0].id);
        // Partial upfront: 3000 + 250/month.
        assert_eq!(first[0].accumulated, dec!(3250.00));
        assert_eq!(analysis.monthly_costs[&12][0].accumulated, dec!(6000.00));
        // On demand accrues linearly to its total.
        assert_eq!(analysis.monthly_costs[&12][1].accumulated, dec!(8760.00));
    }

    #[test]
    fn test_unpriced_combinations_are_skipped() {
        let request = TermAnalysisRequest {
            offering_classes: OfferingClass::ALL.to_vec(),
            ..request_for("us-east-1", vec![PurchaseOption::AllUpfront])
        };
        let analysis = compare_terms(&FlatRates, &store(), &request).unwrap();

        // Convertible never prices; one on-demand plus one standard scenario.
        assert_eq!(analysis.scenarios.len(), 2);
        assert!(analysis
            .scenarios
            .iter()
            .all(|s| s.offering_class != Some(OfferingClass::Convertible)));
    }

    #[test]
    fn test_region_without_baseline_is_skipped() {
        let request = TermAnalysisRequest {
            regions: vec![region("ap-east-1"), region("us-east-1")],
            ..request_for("us-east-1", vec![PurchaseOption::AllUpfront])
        };
        let analysis = compare_terms(&FlatRates, &store(), &request).unwrap();

        assert!(analysis.scenarios.iter().all(|s| s.region == "us-east-1"));
        assert_eq!(analysis.regions, ["ap-east-1", "us-east-1"]);
    }

    #[test]
    fn test_fails_when_nothing_prices() {
        let request = request_for("ap-east-1", vec![PurchaseOption::AllUpfront]);
        let err = compare_terms(&FlatRates, &store(), &request).unwrap_err();

        assert!(matches!(err, RatecardError::NoDataFound(_)));
        assert!(err.to_string().contains("service:[compute]"));
    }
}
