//! Serverless function pricing
//!
//! Prices monthly invocations and compute duration. Duration bills in
//! GB-seconds derived from the invocation count, the average duration, and
//! the configured memory size.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ratecard_common::dimensions::families::{ProductFamily, FUNCTIONS_FAMILIES};
use ratecard_common::dimensions::region::{Region, REGIONS};
use ratecard_common::dimensions::terms::TermType;
use ratecard_common::error::{Result, ValidationError};
use ratecard_common::{service, PriceComparison, PricingResult};
use ratecard_engine::{
    compare, evaluate, Candidate, CatalogStore, KeyQuery, PartitionKey, Predicate,
    PriceAccumulator,
};

use crate::resolve_region;

const REQUESTS_GROUP: &str = "AWS-Lambda-Requests";
const DURATION_GROUP: &str = "AWS-Lambda-Duration";

const MIN_MEMORY_MB: u32 = 64;
const MAX_MEMORY_MB: u32 = 3008;

/// Memory sizes a function can be configured with, in MB.
pub fn supported_memory_sizes() -> impl Iterator<Item = u32> {
    (MIN_MEMORY_MB..=MAX_MEMORY_MB).step_by(MIN_MEMORY_MB as usize)
}

/// Usage for one serverless-function calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionsRequest {
    pub region: String,
    /// Invocations per month
    pub monthly_requests: u64,
    /// Average execution time per invocation in milliseconds
    pub avg_duration_ms: u32,
    /// Configured memory in MB, a multiple of 64 up to 3008
    pub memory_mb: u32,
}

impl Default for FunctionsRequest {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            monthly_requests: 0,
            avg_duration_ms: 0,
            memory_mb: 128,
        }
    }
}

impl FunctionsRequest {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set monthly invocations
    pub fn with_monthly_requests(mut self, monthly_requests: u64) -> Self {
        self.monthly_requests = monthly_requests;
        self
    }

    /// Set average execution time in milliseconds
    pub fn with_avg_duration_ms(mut self, avg_duration_ms: u32) -> Self {
        self.avg_duration_ms = avg_duration_ms;
        self
    }

    /// Set configured memory in MB
    pub fn with_memory_mb(mut self, memory_mb: u32) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    /// Validate the request, collecting every violation.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();

        if Region::from_code(&self.region).is_none() {
            issues.push(format!("unsupported region [{}]", self.region));
        }
        if self.memory_mb < MIN_MEMORY_MB
            || self.memory_mb > MAX_MEMORY_MB
            || self.memory_mb % MIN_MEMORY_MB != 0
        {
            issues.push(format!(
                "memory-mb must be a multiple of 64 between 64 and 3008, got [{}]",
                self.memory_mb
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid { issues }.into())
        }
    }

    /// Billable compute in GB-seconds:
    /// requests * duration in seconds * memory in GB.
    pub fn gb_seconds(&self) -> Decimal {
        Decimal::from(self.monthly_requests)
            * (Decimal::from(self.avg_duration_ms) / Decimal::from(1000))
            * (Decimal::from(self.memory_mb) / Decimal::from(1024))
    }
}

/// Prices one serverless-function request.
pub fn calculate(store: &CatalogStore, request: &FunctionsRequest) -> Result<PricingResult> {
    request.validate()?;
    let region = resolve_region(&request.region)?;

    let keys = KeyQuery::new(FUNCTIONS_FAMILIES)
        .with_region(region)
        .with_term(TermType::OnDemand)
        .expand();
    let partitions = store.load_partitions(service::FUNCTIONS, &keys)?;
    let partition =
        partitions.partition(&PartitionKey::on_demand(region, ProductFamily::Serverless));
    let mut acc = PriceAccumulator::new();

    if request.monthly_requests > 0 {
        let predicate = Predicate::new().with_field("Group", REQUESTS_GROUP);
        evaluate(
            service::FUNCTIONS,
            partition,
            &predicate,
            Decimal::from(request.monthly_requests),
            &mut acc,
        )?;
    }

    let gb_seconds = request.gb_seconds();
    if gb_seconds > Decimal::ZERO {
        let predicate = Predicate::new().with_field("Group", DURATION_GROUP);
        evaluate(service::FUNCTIONS, partition, &predicate, gb_seconds, &mut acc)?;
    }

    debug!(
        region = region.code,
        memory_mb = request.memory_mb,
        gb_seconds = %gb_seconds,
        total = %acc.total(),
        "functions calculation complete"
    );
    let dimensions = serde_json::to_value(request)?;
    Ok(acc.into_result(partitions.version(), region.code, dimensions))
}

/// Prices the request in every supported region and ranks the results.
pub fn compare_regions(
    store: &CatalogStore,
    request: &FunctionsRequest,
) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<FunctionsRequest>> = REGIONS
        .iter()
        .map(|region| {
            Candidate::new(
                region.code,
                region.label,
                request.clone().with_region(region.code),
            )
        })
        .collect();
    compare(service::FUNCTIONS, "region", &candidates, |candidate| {
        calculate(store, candidate)
    })
}

/// Prices the request at every supported memory size and ranks the results.
pub fn compare_memory_sizes(
    store: &CatalogStore,
    request: &FunctionsRequest,
) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<FunctionsRequest>> = supported_memory_sizes()
        .map(|memory_mb| {
            Candidate::new(
                memory_mb.to_string(),
                format!("{} MB", memory_mb),
                request.clone().with_memory_mb(memory_mb),
            )
        })
        .collect();
    compare(service::FUNCTIONS, "memory", &candidates, |candidate| {
        calculate(store, candidate)
    })
}
