//! Compute instance pricing with attached components
//!
//! One calculation prices up to ten independent components in one region:
//! instance hours (on-demand) or a reserved commitment, three data-transfer
//! directions, block-storage volumes with provisioned IOPS and snapshots, and
//! classic load-balancer hours and processed bytes.
//!
//! The instance component follows the requested term type and, for reserved
//! terms, prices from a partition keyed by offering class, tenancy, and
//! purchase option. Attached components always bill on-demand.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ratecard_common::dimensions::families::{ProductFamily, COMPUTE_FAMILIES};
use ratecard_common::dimensions::region::{Region, REGIONS};
use ratecard_common::dimensions::terms::{
    lease_contract_length, OfferingClass, PurchaseOption, Tenancy, TermType,
};
use ratecard_common::error::{Result, ValidationError};
use ratecard_common::{
    service, PriceComparison, PricingResult, TermPricingAnalysis, SUPPORTED_RESERVED_YEARS,
};
use ratecard_engine::{
    compare, compare_terms, evaluate, Candidate, CatalogStore, KeyQuery, PartitionKey, Predicate,
    PriceAccumulator, TermAnalysisRequest, TermPriceModel,
};

use crate::reserved::evaluate_reserved;
use crate::{resolve_region, transfer};

/// Catalog value for instances without pre-installed software.
const NO_PRE_INSTALLED_SOFTWARE: &str = "NA";

/// Operating system billed on a compute instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperatingSystem {
    Linux,
    Windows,
    WindowsByol,
    Suse,
    Rhel,
}

impl OperatingSystem {
    /// Display value used in catalog rows. Bring-your-own-license Windows
    /// bills under the same catalog value as licensed Windows; the license
    /// model column tells the rows apart.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            OperatingSystem::Linux => "Linux",
            OperatingSystem::Windows | OperatingSystem::WindowsByol => "Windows",
            OperatingSystem::Suse => "SUSE",
            OperatingSystem::Rhel => "RHEL",
        }
    }

    /// Caller-facing code.
    pub fn code(&self) -> &'static str {
        match self {
            OperatingSystem::Linux => "linux",
            OperatingSystem::Windows => "windows",
            OperatingSystem::WindowsByol => "windows-byol",
            OperatingSystem::Suse => "suse",
            OperatingSystem::Rhel => "rhel",
        }
    }

    pub const ALL: [OperatingSystem; 5] = [
        OperatingSystem::Linux,
        OperatingSystem::Windows,
        OperatingSystem::WindowsByol,
        OperatingSystem::Suse,
        OperatingSystem::Rhel,
    ];
}

impl Default for OperatingSystem {
    fn default() -> Self {
        OperatingSystem::Linux
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for OperatingSystem {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "linux" => Ok(OperatingSystem::Linux),
            "windows" => Ok(OperatingSystem::Windows),
            "windows-byol" => Ok(OperatingSystem::WindowsByol),
            "suse" => Ok(OperatingSystem::Suse),
            "rhel" => Ok(OperatingSystem::Rhel),
            other => Err(ValidationError::UnsupportedValue {
                field: "operating-system",
                value: other.to_string(),
            }),
        }
    }
}

/// License model billed with an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseModel {
    Included,
    Byol,
    NoneRequired,
}

impl LicenseModel {
    /// Display value used in catalog rows.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            LicenseModel::Included => "License Included",
            LicenseModel::Byol => "Bring your own license",
            LicenseModel::NoneRequired => "No License required",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LicenseModel::Included => "included",
            LicenseModel::Byol => "byol",
            LicenseModel::NoneRequired => "none-required",
        }
    }

    pub const ALL: [LicenseModel; 3] = [
        LicenseModel::Included,
        LicenseModel::Byol,
        LicenseModel::NoneRequired,
    ];
}

impl fmt::Display for LicenseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for LicenseModel {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "included" => Ok(LicenseModel::Included),
            "byol" => Ok(LicenseModel::Byol),
            "none-required" => Ok(LicenseModel::NoneRequired),
            other => Err(ValidationError::UnsupportedValue {
                field: "license-model",
                value: other.to_string(),
            }),
        }
    }
}

/// Block-storage volume type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeType {
    Standard,
    Gp2,
    Io1,
    St1,
    Sc1,
}

impl VolumeType {
    /// Display value used in catalog rows.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            VolumeType::Standard => "Magnetic",
            VolumeType::Gp2 => "General Purpose",
            VolumeType::Io1 => "Provisioned IOPS",
            VolumeType::St1 => "Throughput Optimized HDD",
            VolumeType::Sc1 => "Cold HDD",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            VolumeType::Standard => "standard",
            VolumeType::Gp2 => "gp2",
            VolumeType::Io1 => "io1",
            VolumeType::St1 => "st1",
            VolumeType::Sc1 => "sc1",
        }
    }

    pub const ALL: [VolumeType; 5] = [
        VolumeType::Standard,
        VolumeType::Gp2,
        VolumeType::Io1,
        VolumeType::St1,
        VolumeType::Sc1,
    ];
}

impl Default for VolumeType {
    fn default() -> Self {
        VolumeType::Gp2
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for VolumeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "standard" => Ok(VolumeType::Standard),
            "gp2" => Ok(VolumeType::Gp2),
            "io1" => Ok(VolumeType::Io1),
            "st1" => Ok(VolumeType::St1),
            "sc1" => Ok(VolumeType::Sc1),
            other => Err(ValidationError::UnsupportedValue {
                field: "volume-type",
                value: other.to_string(),
            }),
        }
    }
}

/// Usage for one compute calculation.
///
/// Every quantity defaults to zero and only components with a non-zero
/// quantity are priced, so a request describes exactly the resources in use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    /// Region code the calculation prices in
    pub region: String,
    /// Instance type, e.g. `m5.large`
    pub instance_type: String,
    pub operating_system: OperatingSystem,
    pub tenancy: Tenancy,
    /// License model; when unset it follows the operating system
    pub license_model: Option<LicenseModel>,
    pub term_type: TermType,
    /// Offering class for reserved terms
    pub offering_class: OfferingClass,
    /// Purchase option, required for reserved terms
    pub purchase_option: Option<PurchaseOption>,
    /// Commitment length in years for reserved terms
    pub years: u32,
    /// Instances covered by a reserved commitment
    pub instance_count: u32,
    /// Metered instance hours for on-demand terms
    pub instance_hours: Decimal,
    /// GB transferred out to the public internet
    pub internet_transfer_out_gb: Decimal,
    /// GB transferred within the region
    pub intra_region_transfer_gb: Decimal,
    /// GB transferred out to another region
    pub inter_region_transfer_gb: Decimal,
    /// Destination region code for inter-region transfer
    pub to_region: Option<String>,
    pub volume_type: VolumeType,
    /// Volume storage in GB-months
    pub volume_gb_month: Decimal,
    /// Provisioned IOPS, billed only for `io1` volumes
    pub provisioned_iops: Decimal,
    /// Snapshot storage in GB-months
    pub snapshot_gb_month: Decimal,
    pub load_balancer_hours: Decimal,
    pub load_balancer_processed_gb: Decimal,
}

impl Default for ComputeRequest {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            instance_type: String::new(),
            operating_system: OperatingSystem::default(),
            tenancy: Tenancy::default(),
            license_model: None,
            term_type: TermType::default(),
            offering_class: OfferingClass::default(),
            purchase_option: None,
            years: 1,
            instance_count: 1,
            instance_hours: Decimal::ZERO,
            internet_transfer_out_gb: Decimal::ZERO,
            intra_region_transfer_gb: Decimal::ZERO,
            inter_region_transfer_gb: Decimal::ZERO,
            to_region: None,
            volume_type: VolumeType::default(),
            volume_gb_month: Decimal::ZERO,
            provisioned_iops: Decimal::ZERO,
            snapshot_gb_month: Decimal::ZERO,
            load_balancer_hours: Decimal::ZERO,
            load_balancer_processed_gb: Decimal::ZERO,
        }
    }
}

impl ComputeRequest {
    pub fn new(region: impl Into<String>, instance_type: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            instance_type: instance_type.into(),
            ..Self::default()
        }
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the operating system
    pub fn with_operating_system(mut self, operating_system: OperatingSystem) -> Self {
        self.operating_system = operating_system;
        self
    }

    /// Set metered on-demand instance hours
    pub fn with_instance_hours(mut self, instance_hours: Decimal) -> Self {
        self.instance_hours = instance_hours;
        self
    }

    /// Set the number of instances a reserved commitment covers
    pub fn with_instance_count(mut self, instance_count: u32) -> Self {
        self.instance_count = instance_count;
        self
    }

    /// Switch to a reserved term with the given commitment dimensions
    pub fn with_reserved_term(
        mut self,
        offering_class: OfferingClass,
        purchase_option: PurchaseOption,
        years: u32,
    ) -> Self {
        self.term_type = TermType::Reserved;
        self.offering_class = offering_class;
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

        let prices_instances = self.instance_hours > Decimal::ZERO
            || (self.term_type == TermType::Reserved && self.instance_count > 0);
        if prices_instances && self.instance_type.is_empty() {
            issues.push("instance-type cannot be empty when instance pricing is requested".into());
        }

        for (field, quantity) in [
            ("instance-hours", self.instance_hours),
            ("internet-transfer-out-gb", self.internet_transfer_out_gb),
            ("intra-region-transfer-gb", self.intra_region_transfer_gb),
            ("inter-region-transfer-gb", self.inter_region_transfer_gb),
            ("volume-gb-month", self.volume_gb_month),
            ("provisioned-iops", self.provisioned_iops),
            ("snapshot-gb-month", self.snapshot_gb_month),
            ("load-balancer-hours", self.load_balancer_hours),
            ("load-balancer-processed-gb", self.load_balancer_processed_gb),
        ] {
            if quantity < Decimal::ZERO {
                issues.push(format!("{} cannot be negative", field));
            }
        }

        if self.inter_region_transfer_gb > Decimal::ZERO {
            match self.to_region.as_deref() {
                None | Some("") => {
                    issues.push("to-region must be set for inter-region transfer".into());
                }
                Some(code) if Region::from_code(code).is_none() => {
                    issues.push(format!("unsupported to-region [{}]", code));
                }
                Some(code) if code == self.region => {
                    issues.push(
                        "source and destination regions must differ for inter-region transfer"
                            .into(),
                    );
                }
                Some(_) => {}
            }
        }

        if self.term_type == TermType::Reserved {
            match self.purchase_option {
                None => issues.push("purchase-option must be set for reserved terms".into()),
                Some(PurchaseOption::AllUpfront) => {
                    if self.instance_hours > Decimal::ZERO {
                        issues
                            .push("instance-hours cannot be set with an all-upfront purchase".into());
                    }
                    if self.instance_count == 0 {
                        issues.push("instance-count is required for an all-upfront purchase".into());
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

    /// License model billed: the explicit setting, or derived from the
    /// operating system when unset.
    pub fn effective_license_model(&self) -> LicenseModel {
        match self.license_model {
            Some(model) => model,
            None => match self.operating_system {
                OperatingSystem::WindowsByol => LicenseModel::Byol,
                _ => LicenseModel::NoneRequired,
            },
        }
    }

    /// Attribute predicate shared by on-demand and reserved instance rows.
    fn instance_predicate(&self) -> Predicate {
        Predicate::new()
            .with_field("Instance Type", &self.instance_type)
            .with_field("Operating System", self.operating_system.catalog_value())
            .with_field("Tenancy", self.tenancy.catalog_value())
            .with_field("Pre Installed S/W", NO_PRE_INSTALLED_SOFTWARE)
            .with_field(
                "License Model",
                self.effective_license_model().catalog_value(),
            )
    }

    fn reserved_predicate(&self, purchase_option: PurchaseOption) -> Predicate {
        self.instance_predicate()
            .with_field("OfferingClass", self.offering_class.catalog_value())
            .with_field("PurchaseOption", purchase_option.catalog_value())
            .with_field("LeaseContractLength", lease_contract_length(self.years))
    }

    /// Keys for every partition this request may touch. Attached components
    /// always bill on-demand; only the instance family follows the term.
    fn partition_keys(&self, region: &'static Region) -> Vec<PartitionKey> {
        match (self.term_type, self.purchase_option) {
            (TermType::Reserved, Some(purchase_option)) => {
                let attached: Vec<ProductFamily> = COMPUTE_FAMILIES
                    .iter()
                    .copied()
                    .filter(|family| *family != ProductFamily::ComputeInstance)
                    .collect();
                let mut keys = KeyQuery::new(&attached)
                    .with_region(region)
                    .with_term(TermType::OnDemand)
                    .expand();
                keys.push(PartitionKey::reserved(
                    region,
                    ProductFamily::ComputeInstance,
                    self.offering_class,
                    self.tenancy,
                    purchase_option,
                ));
                keys
            }
            _ => KeyQuery::new(COMPUTE_FAMILIES)
                .with_region(region)
                .with_term(TermType::OnDemand)
                .expand(),
        }
    }
}

/// Prices one compute request.
pub fn calculate(store: &CatalogStore, request: &ComputeRequest) -> Result<PricingResult> {
    request.validate()?;
    let region = resolve_region(&request.region)?;

    let keys = request.partition_keys(region);
    let partitions = store.load_partitions(service::COMPUTE, &keys)?;
    let mut acc = PriceAccumulator::new();

    match request.term_type {
        TermType::OnDemand => {
            if request.instance_hours > Decimal::ZERO {
                let partition = partitions
                    .partition(&PartitionKey::on_demand(region, ProductFamily::ComputeInstance));
                evaluate(
                    service::COMPUTE,
                    partition,
                    &request.instance_predicate(),
                    request.instance_hours,
                    &mut acc,
                )?;
            }
        }
        TermType::Reserved => {
            if request.instance_count > 0 {
                if let Some(purchase_option) = request.purchase_option {
                    let key = PartitionKey::reserved(
                        region,
                        ProductFamily::ComputeInstance,
                        request.offering_class,
                        request.tenancy,
                        purchase_option,
                    );
                    evaluate_reserved(
                        service::COMPUTE,
                        partitions.partition(&key),
                        &request.reserved_predicate(purchase_option),
                        purchase_option,
                        request.instance_count,
                        request.years,
                        &mut acc,
                    )?;
                }
            }
        }
    }

    let transfers =
        partitions.partition(&PartitionKey::on_demand(region, ProductFamily::DataTransfer));
    if request.internet_transfer_out_gb > Decimal::ZERO {
        evaluate(
            service::DATA_TRANSFER,
            transfers,
            &transfer::internet_out(),
            request.internet_transfer_out_gb,
            &mut acc,
        )?;
    }
    if request.intra_region_transfer_gb > Decimal::ZERO {
        evaluate(
            service::DATA_TRANSFER,
            transfers,
            &transfer::intra_region(),
            request.intra_region_transfer_gb,
            &mut acc,
        )?;
    }
    if request.inter_region_transfer_gb > Decimal::ZERO {
        if let Some(destination) = request.to_region.as_deref().and_then(Region::from_code) {
            evaluate(
                service::DATA_TRANSFER,
                transfers,
                &transfer::inter_region(destination),
                request.inter_region_transfer_gb,
                &mut acc,
            )?;
        }
    }

    if request.volume_gb_month > Decimal::ZERO {
        let partition =
            partitions.partition(&PartitionKey::on_demand(region, ProductFamily::Storage));
        let predicate =
            Predicate::new().with_field("Volume Type", request.volume_type.catalog_value());
        evaluate(
            service::BLOCK_STORAGE,
            partition,
            &predicate,
            request.volume_gb_month,
            &mut acc,
        )?;
    }

    // IOPS are only billed separately for provisioned-IOPS volumes.
    if request.volume_type == VolumeType::Io1 && request.provisioned_iops > Decimal::ZERO {
        let partition =
            partitions.partition(&PartitionKey::on_demand(region, ProductFamily::SystemOperation));
        let predicate = Predicate::new().with_field("Group", "EBS IOPS");
        evaluate(
            service::BLOCK_STORAGE,
            partition,
            &predicate,
            request.provisioned_iops,
            &mut acc,
        )?;
    }

    if request.snapshot_gb_month > Decimal::ZERO {
        let partition =
            partitions.partition(&PartitionKey::on_demand(region, ProductFamily::StorageSnapshot));
        // Snapshot usage types carry the regional prefix, e.g. EU-EBS:SnapshotUsage.
        let predicate =
            Predicate::new().with_field("usageType", region.usage_type("EBS:SnapshotUsage"));
        evaluate(
            service::BLOCK_STORAGE,
            partition,
            &predicate,
            request.snapshot_gb_month,
            &mut acc,
        )?;
    }

    let balancers =
        partitions.partition(&PartitionKey::on_demand(region, ProductFamily::LoadBalancer));
    if request.load_balancer_hours > Decimal::ZERO {
        let predicate = Predicate::new()
            .with_field("usageType", region.usage_type("LoadBalancerUsage"))
            .with_field("operation", "LoadBalancing");
        evaluate(
            service::LOAD_BALANCER,
            balancers,
            &predicate,
            request.load_balancer_hours,
            &mut acc,
        )?;
    }
    if request.load_balancer_processed_gb > Decimal::ZERO {
        let predicate = Predicate::new()
            .with_field("usageType", region.usage_type("DataProcessing-Bytes"))
            .with_field("operation", "LoadBalancing");
        evaluate(
            service::LOAD_BALANCER,
            balancers,
            &predicate,
            request.load_balancer_processed_gb,
            &mut acc,
        )?;
    }

    debug!(
        region = region.code,
        total = %acc.total(),
        records = acc.records().len(),
        "compute calculation complete"
    );
    let dimensions = serde_json::to_value(request)?;
    Ok(acc.into_result(partitions.version(), region.code, dimensions))
}

/// Prices the request in every supported region and ranks the results.
pub fn compare_regions(store: &CatalogStore, request: &ComputeRequest) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<ComputeRequest>> = REGIONS
        .iter()
        .map(|region| {
            Candidate::new(
                region.code,
                region.label,
                request.clone().with_region(region.code),
            )
        })
        .collect();
    compare(service::COMPUTE, "region", &candidates, |candidate| {
        calculate(store, candidate)
    })
}

/// Prices the request under every supported operating system and ranks the
/// results.
pub fn compare_operating_systems(
    store: &CatalogStore,
    request: &ComputeRequest,
) -> Result<PriceComparison> {
    let candidates: Vec<Candidate<ComputeRequest>> = OperatingSystem::ALL
        .iter()
        .map(|os| {
            Candidate::new(
                os.code(),
                os.code(),
                request.clone().with_operating_system(*os),
            )
        })
        .collect();
    compare(service::COMPUTE, "os", &candidates, |candidate| {
        calculate(store, candidate)
    })
}

/// Runs the commitment analysis for the request across `region_codes`.
pub fn analyze_terms(
    store: &CatalogStore,
    base: &ComputeRequest,
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
    let model = ComputeTermModel::new(base.clone());
    compare_terms(&model, store, &TermAnalysisRequest::new(regions, years))
}

/// Term pricing model backed by the compute flow.
///
/// Clones the base request per scenario and overrides the region and term
/// fields; attached component quantities carry into every scenario unchanged.
#[derive(Debug, Clone)]
pub struct ComputeTermModel {
    base: ComputeRequest,
}

impl ComputeTermModel {
    pub fn new(base: ComputeRequest) -> Self {
        Self { base }
    }
}

impl TermPriceModel for ComputeTermModel {
    fn service(&self) -> &str {
        service::COMPUTE
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
        request.instance_hours = hours;
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
        let mut request = self.base.clone();
        request.region = region.code.to_string();
        request.term_type = TermType::Reserved;
        request.offering_class = offering_class;
        request.purchase_option = Some(purchase_option);
        request.years = years;
        request.instance_hours = Decimal::ZERO;
        calculate(store, &request)
    }
}
