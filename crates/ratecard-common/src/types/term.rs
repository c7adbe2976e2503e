//! Term comparison output: scenarios, amortization schedule, CSV export

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dimensions::terms::{OfferingClass, PurchaseOption, TermType};
use crate::error::{RatecardError, Result};
use crate::types::record::PricingRecord;
use crate::MONTHS_IN_YEAR;

/// One commitment scenario in a term comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermPricingScenario {
    /// Deterministic identifier, e.g. `us-east-1:reserved:standard:all-upfront`
    pub id: String,
    /// Region code this scenario priced in
    pub region: String,
    pub term_type: TermType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offering_class: Option<OfferingClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_option: Option<PurchaseOption>,
    /// Snapshot of the input dimensions used for this scenario
    pub dimensions: serde_json::Value,
    pub pricing_records: Vec<PricingRecord>,
    /// Total cost over the full commitment horizon
    pub total_cost: Decimal,
    /// On-demand baseline total for this scenario's region
    pub on_demand_cost: Decimal,
    /// Absolute percent saved (or overspent) against the baseline
    pub savings_pct: Decimal,
    /// Baseline total minus this scenario's total; zero for on-demand
    pub total_savings: Decimal,
    /// One-time fee paid at purchase, rounded to 2 decimal places
    pub upfront_fee: Decimal,
    /// Recurring monthly fee, rounded to 2 decimal places
    pub monthly_fee: Decimal,
    /// First month at which cumulative on-demand spend reaches this
    /// scenario's cumulative spend, clamped to the final month of the horizon
    pub months_to_break_even: u32,
    pub delta_previous: Decimal,
    pub pct_to_previous: Decimal,
    pub delta_cheapest: Decimal,
    pub pct_to_cheapest: Decimal,
}

/// Accumulated cost of one scenario at one month of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    pub scenario_id: String,
    /// Accumulated spend through this month, rounded to 2 decimal places
    pub accumulated: Decimal,
}

/// Full term comparison: ranked scenarios plus the month-by-month schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermPricingAnalysis {
    /// Catalog version the comparison was priced against
    pub version: String,
    /// Region codes covered, in request order
    pub regions: Vec<String>,
    /// Commitment length in years
    pub years: u32,
    /// Scenarios sorted by total cost, cheapest first
    pub scenarios: Vec<TermPricingScenario>,
    /// Accumulated cost per scenario for every month 1..=12*years
    pub monthly_costs: BTreeMap<u32, Vec<MonthlyCost>>,
}

impl TermPricingAnalysis {
    /// Render the monthly schedule as CSV: header `Month,<scenario id>...`,
    /// one row per month of the horizon.
    pub fn to_schedule_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = Vec::with_capacity(self.scenarios.len() + 1);
        header.push("Month".to_string());
        header.extend(self.scenarios.iter().map(|s| s.id.clone()));
        writer
            .write_record(&header)
            .map_err(|e| RatecardError::Serialization(e.to_string()))?;

        for (month, costs) in &self.monthly_costs {
            let mut row = Vec::with_capacity(header.len());
            row.push(month.to_string());
            for scenario in &self.scenarios {
                let cell = costs
                    .iter()
                    .find(|c| c.scenario_id == scenario.id)
                    .map(|c| c.accumulated.to_string())
                    .unwrap_or_default();
                row.push(cell);
            }
            writer
                .write_record(&row)
                .map_err(|e| RatecardError::Serialization(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| RatecardError::Serialization(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| RatecardError::Serialization(e.to_string()))
    }
}

/// Sum of the record amounts describing an upfront fee ("upfront" appears in
/// the description, case-insensitive). A scenario carries at most one such
/// record in practice.
pub fn upfront_fee(records: &[PricingRecord]) -> Decimal {
    records
        .iter()
        .filter(|r| is_upfront(r))
        .map(|r| r.amount)
        .sum()
}

/// Recurring monthly fee: the non-upfront record total spread evenly across
/// the commitment horizon.
pub fn recurring_monthly_fee(records: &[PricingRecord], years: u32) -> Decimal {
    let recurring: Decimal = records
        .iter()
        .filter(|r| !is_upfront(r))
        .map(|r| r.amount)
        .sum();
    recurring / Decimal::from(MONTHS_IN_YEAR * years)
}

fn is_upfront(record: &PricingRecord) -> bool {
    record.description.to_ascii_lowercase().contains("upfront")
}
