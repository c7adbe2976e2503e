//! Command-line definitions
//!
//! One subcommand per service; flags mirror the request fields of the
//! matching service module. Every subcommand prints one JSON document to
//! stdout, so output composes with `jq` and friends; logs go to stderr.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use ratecard_common::dimensions::terms::{OfferingClass, PurchaseOption, Tenancy, TermType};
use ratecard_services::compute::{ComputeRequest, LicenseModel, OperatingSystem, VolumeType};
use ratecard_services::functions::FunctionsRequest;
use ratecard_services::object_storage::{ObjectStorageRequest, RequestType, StorageClass};
use ratecard_services::warehouse::WarehouseRequest;

#[derive(Parser, Debug)]
#[command(
    name = "ratecard",
    version,
    about = "Price cloud resources from on-disk rate catalogs"
)]
pub struct Cli {
    /// Catalog root directory; defaults to RATECARD_DATA_DIR or ./data
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price compute instances and their attached components
    Compute(ComputeArgs),
    /// Price object storage, API requests, and retrieval
    ObjectStorage(ObjectStorageArgs),
    /// Price data-warehouse nodes
    Warehouse(WarehouseArgs),
    /// Price serverless functions
    Functions(FunctionsArgs),
}

#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Region code, e.g. us-east-1
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Instance type, e.g. m5.large
    #[arg(long, default_value = "")]
    pub instance_type: String,

    /// Operating system: linux, windows, windows-byol, suse, rhel
    #[arg(long, default_value = "linux")]
    pub operating_system: OperatingSystem,

    /// Tenancy: shared, dedicated, host
    #[arg(long, default_value = "shared")]
    pub tenancy: Tenancy,

    /// License model override: included, byol, none-required
    #[arg(long)]
    pub license_model: Option<LicenseModel>,

    /// Term type: on-demand, reserved
    #[arg(long, default_value = "on-demand")]
    pub term_type: TermType,

    /// Offering class for reserved terms: standard, convertible
    #[arg(long, default_value = "standard")]
    pub offering_class: OfferingClass,

    /// Purchase option for reserved terms: all-upfront, partial-upfront, no-upfront
    #[arg(long)]
    pub purchase_option: Option<PurchaseOption>,

    /// Commitment length in years for reserved terms
    #[arg(long, default_value_t = 1)]
    pub years: u32,

    /// Instances covered by a reserved commitment
    #[arg(long, default_value_t = 1)]
    pub instance_count: u32,

    /// Metered instance hours
    #[arg(long, default_value = "0")]
    pub instance_hours: Decimal,

    /// GB transferred out to the internet
    #[arg(long, default_value = "0")]
    pub internet_transfer_out_gb: Decimal,

    /// GB transferred within the region
    #[arg(long, default_value = "0")]
    pub intra_region_transfer_gb: Decimal,

    /// GB transferred to another region
    #[arg(long, default_value = "0")]
    pub inter_region_transfer_gb: Decimal,

    /// Destination region for inter-region transfer
    #[arg(long)]
    pub to_region: Option<String>,

    /// Volume type: standard, gp2, io1, st1, sc1
    #[arg(long, default_value = "gp2")]
    pub volume_type: VolumeType,

    /// Volume storage in GB-months
    #[arg(long, default_value = "0")]
    pub volume_gb_month: Decimal,

    /// Provisioned IOPS for io1 volumes
    #[arg(long, default_value = "0")]
    pub provisioned_iops: Decimal,

    /// Snapshot storage in GB-months
    #[arg(long, default_value = "0")]
    pub snapshot_gb_month: Decimal,

    /// Load-balancer hours
    #[arg(long, default_value = "0")]
    pub load_balancer_hours: Decimal,

    /// GB processed by the load balancer
    #[arg(long, default_value = "0")]
    pub load_balancer_processed_gb: Decimal,

    /// Rank this request across a dimension instead of pricing it once
    #[arg(long, value_enum)]
    pub compare: Option<ComputeCompare>,

    /// Sweep on-demand against every reserved commitment
    #[arg(long, conflicts_with = "compare")]
    pub compare_terms: bool,

    /// Regions for the term sweep, comma separated
    #[arg(long, value_delimiter = ',', default_value = "us-east-1")]
    pub regions: Vec<String>,

    /// Also write the month-by-month schedule as CSV to this path
    #[arg(long, requires = "compare_terms")]
    pub schedule_csv: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputeCompare {
    /// Rank every supported region
    Region,
    /// Rank every supported operating system
    Os,
}

impl ComputeArgs {
    pub fn to_request(&self) -> ComputeRequest {
        ComputeRequest {
            region: self.region.clone(),
            instance_type: self.instance_type.clone(),
            operating_system: self.operating_system,
            tenancy: self.tenancy,
            license_model: self.license_model,
            term_type: self.term_type,
            offering_class: self.offering_class,
            purchase_option: self.purchase_option,
            years: self.years,
            instance_count: self.instance_count,
            instance_hours: self.instance_hours,
            internet_transfer_out_gb: self.internet_transfer_out_gb,
            intra_region_transfer_gb: self.intra_region_transfer_gb,
            inter_region_transfer_gb: self.inter_region_transfer_gb,
            to_region: self.to_region.clone(),
            volume_type: self.volume_type,
            volume_gb_month: self.volume_gb_month,
            provisioned_iops: self.provisioned_iops,
            snapshot_gb_month: self.snapshot_gb_month,
            load_balancer_hours: self.load_balancer_hours,
            load_balancer_processed_gb: self.load_balancer_processed_gb,
        }
    }
}

#[derive(Args, Debug)]
pub struct ObjectStorageArgs {
    /// Region code, e.g. us-east-1
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Storage class: standard, standard-ia, onezone-ia, glacier, reduced-redundancy
    #[arg(long, default_value = "standard")]
    pub storage_class: StorageClass,

    /// Bucket storage in GB-months
    #[arg(long, default_value = "0")]
    pub storage_gb_month: Decimal,

    /// Request verb: put, copy, post, list, get
    #[arg(long)]
    pub request_type: Option<RequestType>,

    /// Number of API requests
    #[arg(long, default_value_t = 0)]
    pub request_count: u64,

    /// GB retrieved from infrequent-access storage
    #[arg(long, default_value = "0")]
    pub data_retrieval_gb: Decimal,

    /// GB transferred out to the internet
    #[arg(long, default_value = "0")]
    pub internet_transfer_out_gb: Decimal,

    /// Rank this request across a dimension instead of pricing it once
    #[arg(long, value_enum)]
    pub compare: Option<ObjectStorageCompare>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectStorageCompare {
    /// Rank every supported region
    Region,
    /// Rank every storage class
    StorageClass,
}

impl ObjectStorageArgs {
    pub fn to_request(&self) -> ObjectStorageRequest {
        ObjectStorageRequest {
            region: self.region.clone(),
            storage_class: self.storage_class,
            storage_gb_month: self.storage_gb_month,
            request_type: self.request_type,
            request_count: self.request_count,
            data_retrieval_gb: self.data_retrieval_gb,
            internet_transfer_out_gb: self.internet_transfer_out_gb,
        }
    }
}

#[derive(Args, Debug)]
pub struct WarehouseArgs {
    /// Region code, e.g. us-east-1
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Node type, e.g. dc2.large
    #[arg(long, default_value = "dc2.large")]
    pub node_type: String,

    /// Nodes covered by a reserved commitment
    #[arg(long, default_value_t = 1)]
    pub node_count: u32,

    /// Metered node hours
    #[arg(long, default_value = "0")]
    pub node_hours: Decimal,

    /// Term type: on-demand, reserved
    #[arg(long, default_value = "on-demand")]
    pub term_type: TermType,

    /// Purchase option for reserved terms: all-upfront, partial-upfront, no-upfront
    #[arg(long)]
    pub purchase_option: Option<PurchaseOption>,

    /// Commitment length in years for reserved terms
    #[arg(long, default_value_t = 1)]
    pub years: u32,

    /// Rank this request across a dimension instead of pricing it once
    #[arg(long, value_enum)]
    pub compare: Option<WarehouseCompare>,

    /// Sweep on-demand against every reserved commitment
    #[arg(long, conflicts_with = "compare")]
    pub compare_terms: bool,

    /// Regions for the term sweep, comma separated
    #[arg(long, value_delimiter = ',', default_value = "us-east-1")]
    pub regions: Vec<String>,

    /// Also write the month-by-month schedule as CSV to this path
    #[arg(long, requires = "compare_terms")]
    pub schedule_csv: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarehouseCompare {
    /// Rank every supported region
    Region,
}

impl WarehouseArgs {
    pub fn to_request(&self) -> WarehouseRequest {
        WarehouseRequest {
            region: self.region.clone(),
            node_type: self.node_type.clone(),
            node_count: self.node_count,
            node_hours: self.node_hours,
            term_type: self.term_type,
            purchase_option: self.purchase_option,
            years: self.years,
        }
    }
}

#[derive(Args, Debug)]
pub struct FunctionsArgs {
    /// Region code, e.g. us-east-1
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Invocations per month
    #[arg(long, default_value_t = 0)]
    pub monthly_requests: u64,

    /// Average execution time in milliseconds
    #[arg(long, default_value_t = 0)]
    pub avg_duration_ms: u32,

    /// Configured memory in MB, a multiple of 64 up to 3008
    #[arg(long, default_value_t = 128)]
    pub memory_mb: u32,

    /// Rank this request across a dimension instead of pricing it once
    #[arg(long, value_enum)]
    pub compare: Option<FunctionsCompare>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionsCompare {
    /// Rank every supported region
    Region,
    /// Rank every supported memory size
    Memory,
}

impl FunctionsArgs {
    pub fn to_request(&self) -> FunctionsRequest {
        FunctionsRequest {
            region: self.region.clone(),
            monthly_requests: self.monthly_requests,
            avg_duration_ms: self.avg_duration_ms,
            memory_mb: self.memory_mb,
        }
    }
}
