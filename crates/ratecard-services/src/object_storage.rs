//! Object storage pricing
//!
//! Prices bucket storage by class, API requests by tier, data retrieval for
//! the infrequent-access classes, and internet egress. Request and retrieval
//! pricing only exist for some storage classes; validation rejects requests
//! for a class the catalog never bills them under.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ratecard_common::dimensions::families::{ProductFamily, OBJECT_STORAGE_FAMILIES};
use ratecard_common::dimensions::region::{Region, REGIONS};
use ratecard_common::dimensions::terms::TermType;
use ratecard_common::error::{Result, ValidationError};
use ratecard_common::{service, PriceComparison, PricingResult};
use ratecard_engine::{
    compare, evaluate, Candidate, CatalogStore, KeyQuery, PartitionKey, Predicate,
    PriceAccumulator,
};

use crate::{resolve_region, transfer};

/// Storage class a bucket bills under.
///
/// Each class maps to a pair of catalog display values and, for the classes
/// that bill them, to request-tier and retrieval groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageClass {
    Standard,
    StandardIa,
    OnezoneIa,
    Glacier,
    ReducedRedundancy,
}

impl StorageClass {
    /// Value of the `Storage Class` catalog column.
    pub fn storage_class_value(&self) -> &'static str {
        match self {
            StorageClass::Standard => "General Purpose",
            StorageClass::StandardIa | StorageClass::OnezoneIa => "Infrequent Access",
            StorageClass::Glacier => "Archive",
            StorageClass::ReducedRedundancy => "Non-Critical Data",
        }
    }

    /// Value of the `Volume Type` catalog column. Both infrequent-access
    /// classes share a `Storage Class` value; this column tells them apart.
    pub fn volume_type_value(&self) -> &'static str {
        match self {
            StorageClass::Standard => "Standard",
            StorageClass::StandardIa => "Standard - Infrequent Access",
            StorageClass::OnezoneIa => "One Zone - Infrequent Access",
            StorageClass::Glacier => "Amazon Glacier",
            StorageClass::ReducedRedundancy => "Reduced Redundancy",
        }
    }

    /// Request-tier group billed for `request_type`, when the class bills
    /// API requests at all.
    pub fn request_group(&self, request_type: RequestType) -> Option<&'static str> {
        let tier1 = request_type.is_tier1();
        match self {
            StorageClass::Standard => Some(if tier1 { "S3-API-Tier1" } else { "S3-API-Tier2" }),
            StorageClass::StandardIa => {
                Some(if tier1 { "S3-API-SIA-Tier1" } else { "S3-API-SIA-Tier2" })
            }
            StorageClass::OnezoneIa => {
                Some(if tier1 { "S3-API-ZIA-Tier1" } else { "S3-API-ZIA-Tier2" })
            }
            StorageClass::Glacier | StorageClass::ReducedRedundancy => None,
        }
    }

    /// Retrieval group, billed per GB for the infrequent-access classes only.
    pub fn retrieval_group(&self) -> Option<&'static str> {
        match self {
            StorageClass::StandardIa => Some("S3-API-SIA-Retrieval"),
            StorageClass::OnezoneIa => Some("S3-API-ZIA-Retrieval"),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StorageClass::Standard => "standard",
            StorageClass::StandardIa => "standard-ia",
            StorageClass::OnezoneIa => "onezone-ia",
            StorageClass::Glacier => "glacier",
            StorageClass::ReducedRedundancy => "reduced-redundancy",
        }
    }

    pub const ALL: [StorageClass; 5] = [
        StorageClass::Standard,
        StorageClass::StandardIa,
        StorageClass::OnezoneIa,
        StorageClass::Glacier,
        StorageClass::ReducedRedundancy,
    ];
}

impl Default for StorageClass {
    fn default() -> Self {
        StorageClass::Standard
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for StorageClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "standard" => Ok(StorageClass::Standard),
            "standard-ia" => Ok(StorageClass::StandardIa),
            "onezone-ia" => Ok(StorageClass::OnezoneIa),
            "glacier" => Ok(StorageClass::Glacier),
            "reduced-redundancy" => Ok(StorageClass::ReducedRedundancy),
            other => Err(ValidationError::UnsupportedValue {
                field: "storage-class",
                value: other.to_string(),
            }),
        }
    }
}

/// API request verb priced in a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestType {
    Put,
    Copy,
    Post,
    List,
    Get,
}

impl RequestType {
    /// Write-side verbs bill under tier 1, reads under tier 2.
    pub fn is_tier1(&self) -> bool {
        !matches!(self, RequestType::Get)
    }

    pub fn code(&self) -> &'static str {
        match self {
            RequestType::Put => "put",
            RequestType::Copy => "copy",
            RequestType::Post => "post",
            RequestType::List => "list",
            RequestType::Get => "get",
        }
    }

    pub const ALL: [RequestType; 5] = [
        RequestType::Put,
        RequestType::Copy,
        RequestType::Post,
        RequestType::List,
        RequestType::Get,
    ];
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for RequestType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "put" => Ok(RequestType::Put),
            "copy" => Ok(RequestType::Copy),
            "post" => Ok(RequestType::Post),
            "list" => Ok(RequestType::List),
            "get" => Ok(RequestType::Get),
            other => Err(ValidationError::UnsupportedValue {
                field: "request-type",
                value: other.to_string(),
            }),
        }
    }
}

/// Usage for one object-storage calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageRequest {
    pub region: String,
    pub storage_class: StorageClass,
    /// Bucket storage in GB-months
    pub storage_gb_month: Decimal,
    /// Request verb, required when `request_count` is set
    pub request_type: Option<RequestType>,
    pub request_count: u64,
    /// GB retrieved, billed for infrequent-access classes
    pub data_retrieval_gb: Decimal,
    /// GB transferred out to the public internet
    pub internet_transfer_out_gb: Decimal,
}

impl Default for ObjectStorageRequest {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            storage_class: StorageClass::default(),
            storage_gb_month: Decimal::ZERO,
            request_type: None,
            request_count: 0,
            data_retrieval_gb: Decimal::ZERO,
            internet_transfer_out_gb: Decimal::ZERO,
        }
    }
}

impl ObjectStorageRequest {
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

    /// Set the storage class
    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = storage_class;
        self
    }

    /// Set bucket storage in GB-months
    pub fn with_storage_gb_month(mut self, storage_gb_month: Decimal) -> Self {
        self.storage_gb_month = storage_gb_month;
        self
    }

    /// Set the request component
    pub fn with_requests(mut self, request_type: RequestType, request_count: u64) -> Self {
        self.request_type = Some(request_type);
        self.request_count = request_count;
        self
    }

    /// Validate the request, collecting every violation.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();

        if Region::from_code(&self.region).is_none() {
            issues.push(format!("unsupported region [{}]", self.region));
        }

        for (field, quantity) in [
            ("storage-gb-month", self.storage_gb_month),
            ("data-retrieval-gb", self.data_retrieval_gb),
            ("internet-transfer-out-gb", self.internet_transfer_out_gb),
        ] {
            if quantity < Decimal::ZERO {
                issues.push(format!("{} cannot be negative", field));
            }
        }

        if self.request_count > 0 {
            match self.request_type {
                None => issues.push("request-type must be set when request-count is set".into()),
                Some(request_type) => {
                    if self.storage_class.request_group(request_type).is_none() {
                        issues.push(format!(
                            "request pricing is not available for the {} storage class",
                            self.storage_class
                        ));
                    }
                }
            }
        }

        if self.data_retrieval_gb > Decimal::ZERO
            && self.storage_class.retrieval_group().is_none()
        {
            issues.push(format!(
                "data retrieval is not billed for the {} storage class",
                self.storage_class
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid { issues }.into())
        }
    }
}

/// Prices one object-storage request.
pub fn calculate(store: &CatalogStore, request: &ObjectStorageRequest) -> Result<PricingResult> {
    request.validate()?;
    let region = resolve_region(&request.region)?;

    let keys = KeyQuery::new(OBJECT_STORAGE_FAMILIES)
        .with_region(region)
        .with_term(TermType::OnDemand)
        .expand();
    let partitions = store.load_partitions(service::OBJECT_STORAGE, &keys)?;
    let mut acc = PriceAccumulator::new();

    if request.storage_gb_month > Decimal::ZERO {
        let partition =
            partitions.partition(&PartitionKey::on_demand(region, ProductFamily::Storage));
        let predicate = Predicate::new()
            .with_field("Storage Class", request.storage_class.storage_class_value())
            .with_field("Volume Type", request.storage_class.volume_type_value());
        evaluate(
            service::OBJECT_STORAGE,
            partition,
            &predicate,
            request.storage_gb_month,
            &mut acc,
        )?;
    }

    let requests =
        partitions.partition(&PartitionKey::on_demand(region, ProductFamily::ApiRequest));
    if request.request_count > 0 {
        if let Some(group) = request
            .request_type
            .and_then(|request_type| request.storage_class.request_group(request_type))
        {
            let predicate = Predicate::new().with_field("Group", group);
            evaluate(
                service::OBJECT_STORAGE,
                requests,
                &predicate,
                Decimal::from(request.request_count),
                &mut acc,
            )?;
        }
    }
    if request.data_retrieval_gb > Decimal::ZERO {
        if let Some(group) = request.storage_class.retrieval_group() {
            let predicate = Predicate::new().with_field("Group", group);
            evaluate(
                service::OBJECT_STORAGE,
                requests,
                &predicate,
                request.data_retrieval_gb,
                &mut acc,
            )?;
        }
    }

    if request.internet_transfer_out_gb > Decimal::ZERO {
        let partition =
            partitions.partition(&PartitionKey::on_demand(region, ProductFamily::DataTransfer));
        evaluate(
            service::DATA_TRANSFER,
            partition,
            &transfer::internet_out(),
            request.internet_transfer_out_gb,
            &mut acc,
        )?;
    }

    debug!(
        region = region.code,
        storage_class = request.storage_class.code(),
        total = %acc.total(),
        "object-storage calculation complete"
    );
    let dimensions = serde_json::to_value(request)?;
    Ok(acc.into_result(partitions.version(), region.code, dimensions))
}

/// Prices the request in every supported region and ranks the results.
pub fn compare_regions(
    store: &CatalogStore,
    request: &ObjectStorageRequest,
) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<ObjectStorageRequest>> = REGIONS
        .iter()
        .map(|region| {
            Candidate::new(
                region.code,
                region.label,
                request.clone().with_region(region.code),
            )
        })
        .collect();
    compare(service::OBJECT_STORAGE, "region", &candidates, |candidate| {
        calculate(store, candidate)
    })
}

/// Prices the request under every storage class and ranks the results.
///
/// Classes that cannot bill the requested components fail validation and
/// propagate; sweep with storage-only requests to rank all five classes.
pub fn compare_storage_classes(
    store: &CatalogStore,
    request: &ObjectStorageRequest,
) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<ObjectStorageRequest>> = StorageClass::ALL
        .iter()
        .map(|class| {
            Candidate::new(
                class.code(),
                class.code(),
                request.clone().with_storage_class(*class),
            )
        })
        .collect();
    compare(
        service::OBJECT_STORAGE,
        "storage-class",
        &candidates,
        |candidate| calculate(store, candidate),
    )
}
