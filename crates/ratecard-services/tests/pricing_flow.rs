//! End-to-end pricing flows against on-disk catalog fixtures

use std::fs;
use std::path::Path;

use rust_decimal_macros::dec;
use tempfile::TempDir;

use ratecard_common::dimensions::families::ProductFamily;
use ratecard_common::dimensions::region::Region;
use ratecard_common::dimensions::terms::{OfferingClass, PurchaseOption, Tenancy};
use ratecard_common::RatecardError;
use ratecard_engine::{CatalogStore, PartitionKey};
use ratecard_services::compute::{self, ComputeRequest, VolumeType};
use ratecard_services::functions::{self, FunctionsRequest};
use ratecard_services::object_storage::{self, ObjectStorageRequest, RequestType, StorageClass};
use ratecard_services::warehouse::{self, WarehouseRequest};

const VERSION: &str = "20260301000000";

const INSTANCE_HEADER: &str = "RateCode,Instance Type,Operating System,Tenancy,\
    Pre Installed S/W,License Model,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const RESERVED_HEADER: &str = "RateCode,Instance Type,Operating System,Tenancy,\
    Pre Installed S/W,License Model,OfferingClass,PurchaseOption,LeaseContractLength,\
    Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const TRANSFER_HEADER: &str =
    "RateCode,To Location,Transfer Type,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const VOLUME_HEADER: &str =
    "RateCode,Volume Type,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const GROUP_HEADER: &str =
    "RateCode,Group,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const USAGE_TYPE_HEADER: &str =
    "RateCode,usageType,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const BALANCER_HEADER: &str =
    "RateCode,usageType,operation,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const STORAGE_CLASS_HEADER: &str = "RateCode,Storage Class,Volume Type,Unit,\
    StartingRange,EndingRange,PricePerUnit,PriceDescription";
const NODE_HEADER: &str =
    "RateCode,Instance Type,Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";
const NODE_RESERVED_HEADER: &str = "RateCode,Instance Type,LeaseContractLength,\
    Unit,StartingRange,EndingRange,PricePerUnit,PriceDescription";

fn write_metadata(root: &Path, service: &str) {
    let dir = root.join(service);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("index_metadata.json"),
        format!(r#"{{"Version": "{VERSION}"}}"#),
    )
    .unwrap();
}

fn write_partition(root: &Path, service: &str, key: &PartitionKey, header: &str, rows: &[&str]) {
    let dir = root.join(service);
    fs::create_dir_all(&dir).unwrap();
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.join(format!("{}.csv", key.as_str())), content).unwrap();
}

fn region(code: &str) -> &'static Region {
    Region::from_code(code).unwrap()
}

fn compute_catalog() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_metadata(root, "compute");
    let us_east = region("us-east-1");
    let eu_west = region("eu-west-1");

    write_partition(
        root,
        "compute",
        &PartitionKey::on_demand(us_east, ProductFamily::ComputeInstance),
        INSTANCE_HEADER,
        &[
            "OD.LINUX.M5L,m5.large,Linux,Shared,NA,No License required,Hrs,0,Inf,0.096,\
             $0.096 per On Demand Linux m5.large Instance Hour",
            "OD.WIN.M5L,m5.large,Windows,Shared,NA,No License required,Hrs,0,Inf,0.188,\
             $0.188 per On Demand Windows m5.large Instance Hour",
        ],
    );
    write_partition(
        root,
        "compute",
        &PartitionKey::reserved(
            us_east,
            ProductFamily::ComputeInstance,
            OfferingClass::Standard,
            Tenancy::Shared,
            PurchaseOption::PartialUpfront,
        ),
        RESERVED_HEADER,
        &[
            "RI.M5L.FEE,m5.large,Linux,Shared,NA,No License required,standard,Partial Upfront,\
             1yr,Quantity,0,Inf,337,Upfront Fee",
            "RI.M5L.HRS,m5.large,Linux,Shared,NA,No License required,standard,Partial Upfront,\
             1yr,Hrs,0,Inf,0.037,Linux/UNIX m5.large reserved instance applied",
        ],
    );
    write_partition(
        root,
        "compute",
        &PartitionKey::on_demand(us_east, ProductFamily::DataTransfer),
        TRANSFER_HEADER,
        &[
            "DT.OUT.T1,External,AWS Outbound,GB,0,10240,0.09,\
             $0.090 per GB - first 10 TB / month data transfer out",
            "DT.OUT.T2,External,AWS Outbound,GB,10240,51200,0.085,\
             $0.085 per GB - next 40 TB / month data transfer out",
            "DT.OUT.T3,External,AWS Outbound,GB,51200,Inf,0.07,\
             $0.070 per GB - over 50 TB / month data transfer out",
        ],
    );
    write_partition(
        root,
        "compute",
        &PartitionKey::on_demand(us_east, ProductFamily::Storage),
        VOLUME_HEADER,
        &[
            "EBS.GP2,General Purpose,GB-Mo,0,Inf,0.10,$0.10 per GB-month of General Purpose SSD",
            "EBS.IO1,Provisioned IOPS,GB-Mo,0,Inf,0.125,$0.125 per GB-month of Provisioned IOPS SSD",
        ],
    );
    write_partition(
        root,
        "compute",
        &PartitionKey::on_demand(us_east, ProductFamily::SystemOperation),
        GROUP_HEADER,
        &["EBS.IOPS,EBS IOPS,IOPS-Mo,0,Inf,0.065,$0.065 per provisioned IOPS-month"],
    );
    write_partition(
        root,
        "compute",
        &PartitionKey::on_demand(us_east, ProductFamily::StorageSnapshot),
        USAGE_TYPE_HEADER,
        &["EBS.SNAP,EBS:SnapshotUsage,GB-Mo,0,Inf,0.05,$0.05 per GB-month of snapshot data stored"],
    );
    write_partition(
        root,
        "compute",
        &PartitionKey::on_demand(eu_west, ProductFamily::LoadBalancer),
        BALANCER_HEADER,
        &[
            "ELB.HRS,EU-LoadBalancerUsage,LoadBalancing,Hrs,0,Inf,0.028,\
             $0.028 per LoadBalancer-hour",
            "ELB.GB,EU-DataProcessing-Bytes,LoadBalancing,GB,0,Inf,0.008,\
             $0.008 per GB Data Processed by the LoadBalancer",
        ],
    );
    dir
}

fn object_storage_catalog() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_metadata(root, "object-storage");
    let us_east = region("us-east-1");

    write_partition(
        root,
        "object-storage",
        &PartitionKey::on_demand(us_east, ProductFamily::Storage),
        STORAGE_CLASS_HEADER,
        &[
            "S3.STD,General Purpose,Standard,GB-Mo,0,Inf,0.023,\
             $0.023 per GB - first 50 TB / month of storage used",
            "S3.SIA,Infrequent Access,Standard - Infrequent Access,GB-Mo,0,Inf,0.0125,\
             $0.0125 per GB - infrequent access storage",
        ],
    );
    write_partition(
        root,
        "object-storage",
        &PartitionKey::on_demand(us_east, ProductFamily::ApiRequest),
        GROUP_HEADER,
        &[
            "S3.SIA.T1,S3-API-SIA-Tier1,Requests,0,Inf,0.00001,\
             $0.01 per 1000 PUT COPY POST or LIST requests to infrequent access storage",
            "S3.SIA.RET,S3-API-SIA-Retrieval,GB,0,Inf,0.01,\
             $0.01 per GB retrieved from infrequent access storage",
        ],
    );
    write_partition(
        root,
        "object-storage",
        &PartitionKey::on_demand(us_east, ProductFamily::DataTransfer),
        TRANSFER_HEADER,
        &["S3.DT.OUT,External,AWS Outbound,GB,0,Inf,0.09,$0.090 per GB data transfer out"],
    );
    dir
}

fn warehouse_catalog() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_metadata(root, "warehouse");
    let us_east = region("us-east-1");

    write_partition(
        root,
        "warehouse",
        &PartitionKey::on_demand(us_east, ProductFamily::ComputeInstance),
        NODE_HEADER,
        &["WH.OD.DC2L,dc2.large,Hrs,0,Inf,0.25,$0.25 per dc2.large node hour"],
    );
    write_partition(
        root,
        "warehouse",
        &PartitionKey::reserved(
            us_east,
            ProductFamily::ComputeInstance,
            OfferingClass::Standard,
            Tenancy::Shared,
            PurchaseOption::AllUpfront,
        ),
        NODE_RESERVED_HEADER,
        &["WH.RI.DC2L,dc2.large,1yr,Quantity,0,Inf,1380,Upfront Fee - dc2.large reserved node"],
    );
    dir
}

fn functions_catalog() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_metadata(root, "functions");
    let us_east = region("us-east-1");

    write_partition(
        root,
        "functions",
        &PartitionKey::on_demand(us_east, ProductFamily::Serverless),
        GROUP_HEADER,
        &[
            "LMB.REQ,AWS-Lambda-Requests,Requests,0,Inf,0.0000002,$0.20 per 1M requests",
            "LMB.DUR,AWS-Lambda-Duration,Second,0,Inf,0.0000166667,\
             $0.0000166667 per GB-second of compute time",
        ],
    );
    dir
}

#[test]
fn test_compute_on_demand_instance_hours() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let request = ComputeRequest::new("us-east-1", "m5.large").with_instance_hours(dec!(100));

    let result = compute::calculate(&store, &request).unwrap();

    assert_eq!(result.version, VERSION);
    assert_eq!(result.region, "us-east-1");
    assert_eq!(result.currency, "USD");
    assert_eq!(result.total_cost, dec!(9.60));
    assert_eq!(result.pricing_records.len(), 1);
    let record = &result.pricing_records[0];
    assert_eq!(record.service, "compute");
    assert_eq!(record.rate_code, "OD.LINUX.M5L");
    assert_eq!(record.usage_units, dec!(100));
}

#[test]
fn test_compute_tiered_transfer_bands() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let mut request = ComputeRequest::new("us-east-1", "");
    request.internet_transfer_out_gb = dec!(15000);

    let result = compute::calculate(&store, &request).unwrap();

    // 10240 GB at 0.09 plus 4760 GB at 0.085; the top tier never starts.
    assert_eq!(result.total_cost, dec!(1326.20));
    assert_eq!(result.pricing_records.len(), 2);
    assert!(result
        .pricing_records
        .iter()
        .all(|record| record.service == "data-transfer"));
    assert_eq!(result.pricing_records[0].amount, dec!(921.60));
    assert_eq!(result.pricing_records[1].usage_units, dec!(4760));
}

#[test]
fn test_compute_reserved_partial_upfront_bills_both_legs() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let request = ComputeRequest::new("us-east-1", "m5.large")
        .with_instance_count(2)
        .with_reserved_term(OfferingClass::Standard, PurchaseOption::PartialUpfront, 1);

    let result = compute::calculate(&store, &request).unwrap();

    // 2 x 337 upfront plus 2 x 8640 hours x 0.037
    assert_eq!(result.total_cost, dec!(1313.36));
    assert_eq!(result.pricing_records.len(), 2);
    let upfront = result
        .pricing_records
        .iter()
        .find(|record| record.rate_code == "RI.M5L.FEE")
        .unwrap();
    assert_eq!(upfront.amount, dec!(674));
    assert_eq!(upfront.usage_units, dec!(2));
    let hourly = result
        .pricing_records
        .iter()
        .find(|record| record.rate_code == "RI.M5L.HRS")
        .unwrap();
    assert_eq!(hourly.usage_units, dec!(17280));
    assert_eq!(hourly.amount, dec!(639.36));
}

#[test]
fn test_compute_block_storage_components() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let mut request = ComputeRequest::new("us-east-1", "");
    request.volume_type = VolumeType::Io1;
    request.volume_gb_month = dec!(200);
    request.provisioned_iops = dec!(1000);
    request.snapshot_gb_month = dec!(40);

    let result = compute::calculate(&store, &request).unwrap();

    // 200 x 0.125 + 1000 x 0.065 + 40 x 0.05
    assert_eq!(result.total_cost, dec!(92.00));
    assert_eq!(result.pricing_records.len(), 3);
    assert!(result
        .pricing_records
        .iter()
        .all(|record| record.service == "block-storage"));
}

#[test]
fn test_compute_iops_not_billed_for_general_purpose_volumes() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let mut request = ComputeRequest::new("us-east-1", "");
    request.volume_gb_month = dec!(100);
    request.provisioned_iops = dec!(500);

    let result = compute::calculate(&store, &request).unwrap();

    assert_eq!(result.total_cost, dec!(10.00));
    assert_eq!(result.pricing_records.len(), 1);
    assert_eq!(result.pricing_records[0].rate_code, "EBS.GP2");
}

#[test]
fn test_compute_load_balancer_uses_regional_usage_prefix() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let mut request = ComputeRequest::new("eu-west-1", "");
    request.load_balancer_hours = dec!(100);
    request.load_balancer_processed_gb = dec!(50);

    let result = compute::calculate(&store, &request).unwrap();

    // 100 x 0.028 + 50 x 0.008, matched via the EU- usage-type prefix
    assert_eq!(result.total_cost, dec!(3.20));
    assert_eq!(result.region, "eu-west-1");
    assert!(result
        .pricing_records
        .iter()
        .all(|record| record.service == "load-balancer"));
}

#[test]
fn test_compute_missing_rate_data_is_reported() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let request = ComputeRequest::new("us-east-1", "c5.xlarge").with_instance_hours(dec!(10));

    let err = compute::calculate(&store, &request).unwrap_err();

    assert!(matches!(err, RatecardError::NoDataFound(_)));
    let msg = err.to_string();
    assert!(msg.starts_with("Could not find rate data for service:[compute]"));
    assert!(msg.contains("Instance Type=c5.xlarge"));
}

#[test]
fn test_compute_zero_usage_prices_to_zero() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let request = ComputeRequest::new("us-east-1", "m5.large");

    let result = compute::calculate(&store, &request).unwrap();

    assert_eq!(result.total_cost, dec!(0));
    assert!(result.pricing_records.is_empty());
    assert_eq!(result.version, VERSION);
}

#[test]
fn test_compute_compare_operating_systems_ranks_cheapest_first() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let request = ComputeRequest::new("us-east-1", "m5.large").with_instance_hours(dec!(100));

    let comparison = compute::compare_operating_systems(&store, &request).unwrap();

    // Only Linux and Windows rows exist; the other candidates are skipped.
    assert_eq!(comparison.sort_criteria, "os");
    let ids: Vec<&str> = comparison.scenarios.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["linux", "windows"]);
    assert_eq!(comparison.scenarios[0].total_cost, dec!(9.60));
    assert_eq!(comparison.scenarios[1].delta_cheapest, dec!(9.20));
    assert_eq!(comparison.scenarios[1].pct_to_cheapest, dec!(95.83));
}

#[test]
fn test_compute_term_analysis_finds_break_even() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let base = ComputeRequest::new("us-east-1", "m5.large");

    let analysis = compute::analyze_terms(&store, &base, &["us-east-1".to_string()], 1).unwrap();

    assert_eq!(analysis.version, VERSION);
    assert_eq!(analysis.regions, ["us-east-1"]);
    assert_eq!(analysis.years, 1);
    assert_eq!(analysis.scenarios.len(), 2);

    // The commitment undercuts the 8760-hour baseline, so it ranks first.
    let reserved = &analysis.scenarios[0];
    assert_eq!(reserved.id, "us-east-1:reserved:standard:partial-upfront");
    assert_eq!(reserved.total_cost, dec!(656.68));
    assert_eq!(reserved.on_demand_cost, dec!(840.96));
    assert_eq!(reserved.upfront_fee, dec!(337));
    assert_eq!(reserved.monthly_fee, dec!(26.64));
    assert_eq!(reserved.savings_pct, dec!(21.91));
    assert_eq!(reserved.total_savings, dec!(184.28));
    assert_eq!(reserved.months_to_break_even, 8);

    let on_demand = &analysis.scenarios[1];
    assert_eq!(on_demand.id, "us-east-1:on-demand");
    assert_eq!(on_demand.total_cost, dec!(840.96));
    assert_eq!(on_demand.months_to_break_even, 1);

    // Month 8 is where accumulated on-demand spend overtakes the commitment.
    assert_eq!(analysis.monthly_costs.len(), 12);
    let month8 = &analysis.monthly_costs[&8];
    let accumulated = |id: &str| {
        month8
            .iter()
            .find(|cost| cost.scenario_id == id)
            .unwrap()
            .accumulated
    };
    assert_eq!(
        accumulated("us-east-1:reserved:standard:partial-upfront"),
        dec!(550.12)
    );
    assert_eq!(accumulated("us-east-1:on-demand"), dec!(560.64));
}

#[test]
fn test_compute_term_analysis_schedule_csv() {
    let dir = compute_catalog();
    let store = CatalogStore::new(dir.path());
    let base = ComputeRequest::new("us-east-1", "m5.large");

    let analysis = compute::analyze_terms(&store, &base, &["us-east-1".to_string()], 1).unwrap();
    let csv = analysis.to_schedule_csv().unwrap();

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Month,us-east-1:reserved:standard:partial-upfront,us-east-1:on-demand")
    );
    assert_eq!(lines.next(), Some("1,363.64,70.08"));
    assert_eq!(csv.lines().count(), 13);
}

#[test]
fn test_object_storage_prices_all_components() {
    let dir = object_storage_catalog();
    let store = CatalogStore::new(dir.path());
    let mut request = ObjectStorageRequest::new("us-east-1")
        .with_storage_class(StorageClass::StandardIa)
        .with_storage_gb_month(dec!(500))
        .with_requests(RequestType::Put, 10_000);
    request.data_retrieval_gb = dec!(100);
    request.internet_transfer_out_gb = dec!(100);

    let result = object_storage::calculate(&store, &request).unwrap();

    // 6.25 storage + 0.10 requests + 1.00 retrieval + 9.00 transfer
    assert_eq!(result.total_cost, dec!(16.35));
    assert_eq!(result.pricing_records.len(), 4);
    let services: Vec<&str> = result
        .pricing_records
        .iter()
        .map(|record| record.service.as_str())
        .collect();
    assert!(services.contains(&"object-storage"));
    assert!(services.contains(&"data-transfer"));
}

#[test]
fn test_object_storage_compare_storage_classes() {
    let dir = object_storage_catalog();
    let store = CatalogStore::new(dir.path());
    let request = ObjectStorageRequest::new("us-east-1").with_storage_gb_month(dec!(100));

    let comparison = object_storage::compare_storage_classes(&store, &request).unwrap();

    // Only two classes have storage rows; the rest are skipped.
    assert_eq!(comparison.sort_criteria, "storage-class");
    let ids: Vec<&str> = comparison.scenarios.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["standard-ia", "standard"]);
    assert_eq!(comparison.scenarios[0].total_cost, dec!(1.25));
    assert_eq!(comparison.scenarios[1].delta_cheapest, dec!(1.05));
    assert_eq!(comparison.scenarios[1].pct_to_cheapest, dec!(84));
}

#[test]
fn test_warehouse_on_demand_node_hours() {
    let dir = warehouse_catalog();
    let store = CatalogStore::new(dir.path());
    let request = WarehouseRequest::new("us-east-1", "dc2.large").with_node_hours(dec!(720));

    let result = warehouse::calculate(&store, &request).unwrap();

    assert_eq!(result.total_cost, dec!(180.00));
    assert_eq!(result.pricing_records[0].service, "warehouse");
}

#[test]
fn test_warehouse_reserved_all_upfront_has_single_fee() {
    let dir = warehouse_catalog();
    let store = CatalogStore::new(dir.path());
    let request = WarehouseRequest::new("us-east-1", "dc2.large")
        .with_node_count(2)
        .with_reserved_term(PurchaseOption::AllUpfront, 1);

    let result = warehouse::calculate(&store, &request).unwrap();

    // Two nodes x 1380 one-time fee, no hourly leg.
    assert_eq!(result.total_cost, dec!(2760.00));
    assert_eq!(result.pricing_records.len(), 1);
    assert_eq!(result.pricing_records[0].usage_units, dec!(2));
}

#[test]
fn test_functions_requests_and_duration() {
    let dir = functions_catalog();
    let store = CatalogStore::new(dir.path());
    let request = FunctionsRequest::new("us-east-1")
        .with_monthly_requests(5_000_000)
        .with_avg_duration_ms(100)
        .with_memory_mb(512);

    let result = functions::calculate(&store, &request).unwrap();

    // 5M requests at 0.20 per 1M plus 250k GB-seconds at 0.0000166667
    assert_eq!(result.total_cost, dec!(5.17));
    assert_eq!(result.pricing_records.len(), 2);
    let duration = result
        .pricing_records
        .iter()
        .find(|record| record.rate_code == "LMB.DUR")
        .unwrap();
    assert_eq!(duration.usage_units, dec!(250000));
    assert_eq!(duration.amount, dec!(4.1667));
}

#[test]
fn test_functions_compare_regions_skips_unpriced_regions() {
    let dir = functions_catalog();
    let store = CatalogStore::new(dir.path());
    let request = FunctionsRequest::new("us-east-1")
        .with_monthly_requests(1_000_000)
        .with_avg_duration_ms(100)
        .with_memory_mb(128);

    let comparison = functions::compare_regions(&store, &request).unwrap();

    // Rates only exist in one region; every other candidate is skipped.
    assert_eq!(comparison.scenarios.len(), 1);
    assert_eq!(comparison.scenarios[0].id, "us-east-1");
    assert_eq!(comparison.scenarios[0].display_name, "N. Virginia");
}
