//! Data-warehouse cluster pricing
//!
//! Prices warehouse nodes by the hour on demand or under a reserved
//! commitment. Warehouse catalogs only publish standard offering-class rows
//! with shared tenancy, so reserved partitions are addressed with those two
//! dimensions pinned and only the purchase option varies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ratecard_common::dimensions::families::{ProductFamily, WAREHOUSE_FAMILIES};
use ratecard_common::dimensions::region::{Region, REGIONS};
use ratecard_common::dimensions::terms::{
    lease_contract_length, OfferingClass, PurchaseOption, Tenancy, TermType,
};
use ratecard_common::error::{NoDataFoundError, Result, ValidationError};
use ratecard_common::{
    service, PriceComparison, PricingResult, TermPricingAnalysis, SUPPORTED_RESERVED_YEARS,
};
use ratecard_engine::{
    compare, compare_terms, evaluate, Candidate, CatalogStore, KeyQuery, PartitionKey, Predicate,
    PriceAccumulator, TermAnalysisRequest, TermPriceModel,
};

use crate::reserved::evaluate_reserved;
use crate::resolve_region;

/// Node types the warehouse catalog publishes rates for.
pub const NODE_TYPES: &[&str] = &[
    "dc1.large",
    "dc1.8xlarge",
    "dc2.large",
    "dc2.8xlarge",
    "ds1.xlarge",
    "ds1.8xlarge",
    "ds2.xlarge",
    "ds2.8xlarge",
];

/// Usage for one warehouse calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRequest {
    pub region: String,
    /// Node type, e.g. `dc2.large`
    pub node_type: String,
    /// Nodes covered by a reserved commitment
    pub node_count: u32,
    /// Metered node hours for on-demand terms
    pub node_hours: Decimal,
    pub term_type: TermType,
    /// Purchase option, required for reserved terms
    pub purchase_option: Option<PurchaseOption>,
    /// Commitment length in years for reserved terms
    pub years: u32,
}

impl Default for WarehouseRequest {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            node_type: "dc2.large".to_string(),
            node_count: 1,
            node_hours: Decimal::ZERO,
            term_type: TermType::default(),
            purchase_option: None,
            years: 1,
        }
    }
}

impl WarehouseRequest {
    pub fn new(region: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set metered on-demand node hours
    pub fn with_node_hours(mut self, node_hours: Decimal) -> Self {
        self.node_hours = node_hours;
        self
    }

    /// Set the number of nodes a reserved commitment covers
    pub fn with_node_count(mut self, node_count: u32) -> Self {
        self.node_count = node_count;
        self
    }

    /// Switch to a reserved term with the given commitment dimensions
    pub fn with_reserved_term(mut self, purchase_option: PurchaseOption, years: u32) -> Self {
        self.term_type = TermType::Reserved;
        self.purchase_option = Some(purchase_option);
        self.years = years;
        self
    }

    /// Validate the request, collecting every violation.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();

        if Region::from_code(&self.region).is_none() {
            issues.push(format!("unsupported region [{}]", self.region));
        }
        if !NODE_TYPES.contains(&self.node_type.as_str()) {
            issues.push(format!("unsupported node-type [{}]", self.node_type));
        }
        if self.node_hours < Decimal::ZERO {
            issues.push("node-hours cannot be negative".into());
        }

        if self.term_type == TermType::Reserved {
            match self.purchase_option {
                None => issues.push("purchase-option must be set for reserved terms".into()),
                Some(PurchaseOption::AllUpfront) => {
                    if self.node_hours > Decimal::ZERO {
                        issues.push("node-hours cannot be set with an all-upfront purchase".into());
                    }
                    if self.node_count == 0 {
                        issues.push("node-count is required for an all-upfront purchase".into());
                    }
                }
                Some(_) => {}
            }
            if !SUPPORTED_RESERVED_YEARS.contains(&self.years) {
                issues.push(format!(
                    "years must be 1 or 3 for reserved terms, got [{}]",
                    self.years
                ));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid { issues }.into())
        }
    }

    fn node_predicate(&self) -> Predicate {
        Predicate::new().with_field("Instance Type", &self.node_type)
    }

    fn reserved_predicate(&self) -> Predicate {
        self.node_predicate()
            .with_field("LeaseContractLength", lease_contract_length(self.years))
    }
}

/// Prices one warehouse request.
pub fn calculate(store: &CatalogStore, request: &WarehouseRequest) -> Result<PricingResult> {
    request.validate()?;
    let region = resolve_region(&request.region)?;

    let keys = match (request.term_type, request.purchase_option) {
        (TermType::Reserved, Some(purchase_option)) => vec![PartitionKey::reserved(
            region,
            ProductFamily::ComputeInstance,
            OfferingClass::Standard,
            Tenancy::Shared,
            purchase_option,
        )],
        _ => KeyQuery::new(WAREHOUSE_FAMILIES)
            .with_region(region)
            .with_term(TermType::OnDemand)
            .expand(),
    };
    let partitions = store.load_partitions(service::WAREHOUSE, &keys)?;
    let mut acc = PriceAccumulator::new();

    match request.term_type {
        TermType::OnDemand => {
            if request.node_hours > Decimal::ZERO {
                let partition = partitions
                    .partition(&PartitionKey::on_demand(region, ProductFamily::ComputeInstance));
                evaluate(
                    service::WAREHOUSE,
                    partition,
                    &request.node_predicate(),
                    request.node_hours,
                    &mut acc,
                )?;
            }
        }
        TermType::Reserved => {
            if request.node_count > 0 {
                if let Some(purchase_option) = request.purchase_option {
                    evaluate_reserved(
                        service::WAREHOUSE,
                        partitions.partition(&keys[0]),
                        &request.reserved_predicate(),
                        purchase_option,
                        request.node_count,
                        request.years,
                        &mut acc,
                    )?;
                }
            }
        }
    }

    debug!(
        region = region.code,
        node_type = %request.node_type,
        total = %acc.total(),
        "warehouse calculation complete"
    );
    let dimensions = serde_json::to_value(request)?;
    Ok(acc.into_result(partitions.version(), region.code, dimensions))
}

/// Prices the request in every supported region and ranks the results.
pub fn compare_regions(
    store: &CatalogStore,
    request: &WarehouseRequest,
) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<WarehouseRequest>> = REGIONS
        .iter()
        .map(|region| {
            Candidate::new(
                region.code,
                region.label,
                request.clone().with_region(region.code),
            )
        })
        .collect();
    compare(service::WAREHOUSE, "region", &candidates, |candidate| {
        calculate(store, candidate)
    })
}

/// Runs the commitment analysis for the request across `region_codes`.
pub fn analyze_terms(
    store: &CatalogStore,
    base: &WarehouseRequest,
    region_codes: &[String],
    years: u32,
) -> Result<TermPricingAnalysis> {
    if !SUPPORTED_RESERVED_YEARS.contains(&years) {
        return Err(ValidationError::OutOfRange {
            field: "years",
            expected: "1 or 3",
            value: years.to_string(),
        }
        .into());
    }
    let regions = region_codes
        .iter()
        .map(|code| resolve_region(code))
        .collect::<Result<Vec<_>>>()?;
    let model = WarehouseTermModel::new(base.clone());
    compare_terms(&model, store, &TermAnalysisRequest::new(regions, years))
}

/// Term pricing model backed by the warehouse flow.
#[derive(Debug, Clone)]
pub struct WarehouseTermModel {
    base: WarehouseRequest,
}

impl WarehouseTermModel {
    pub fn new(base: WarehouseRequest) -> Self {
        Self { base }
    }
}

impl TermPriceModel for WarehouseTermModel {
    fn service(&self) -> &str {
        service::WAREHOUSE
    }

    fn price_on_demand(
        &self,
        store: &CatalogStore,
        region: &'static Region,
        hours: Decimal,
    ) -> Result<PricingResult> {
        let mut request = self.base.clone();
        request.region = region.code.to_string();
        request.term_type = TermType::OnDemand;
        request.purchase_option = None;
        request.node_hours = hours;
        calculate(store, &request)
    }

    fn price_reserved(
        &self,
        store: &CatalogStore,
        region: &'static Region,
        years: u32,
        offering_class: OfferingClass,
        purchase_option: PurchaseOption,
    ) -> Result<PricingResult> {
        // Warehouse catalogs publish no convertible offerings; report the
        // scenario as missing rate data so sweeps skip it.
        if offering_class != OfferingClass::Standard {
            return Err(NoDataFoundError::new(
                service::WAREHOUSE,
                format!("OfferingClass={}", offering_class),
            )
            .into());
        }
        let mut request = self.base.clone();
        request.region = region.code.to_string();
        request.term_type = TermType::Reserved;
        request.purchase_option = Some(purchase_option);
        request.years = years;
        request.node_hours = Decimal::ZERO;
        calculate(store, &request)
    }
}
