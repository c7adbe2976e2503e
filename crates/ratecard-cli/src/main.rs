//! ratecard command-line interface
//!
//! Resolves the catalog root from `--data-dir`, the environment, or a
//! `.env` file, then dispatches to the requested service module. Results
//! are printed to stdout as pretty JSON; logs go to stderr so the output
//! stays pipeable.

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ratecard_engine::{CatalogStore, EngineConfig};
use ratecard_services::{compute, functions, object_storage, warehouse};

use crate::cli::{
    Cli, Command, ComputeArgs, ComputeCompare, FunctionsArgs, FunctionsCompare, ObjectStorageArgs,
    ObjectStorageCompare, WarehouseArgs, WarehouseCompare,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ratecard=info".parse()?)
                .add_directive("ratecard_engine=info".parse()?)
                .add_directive("ratecard_services=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = open_store(&cli)?;

    let output = match &cli.command {
        Command::Compute(args) => run_compute(&store, args)?,
        Command::ObjectStorage(args) => run_object_storage(&store, args)?,
        Command::Warehouse(args) => run_warehouse(&store, args)?,
        Command::Functions(args) => run_functions(&store, args)?,
    };
    println!("{output}");
    Ok(())
}

/// The `--data-dir` flag wins over `RATECARD_DATA_DIR` and `.env`.
fn open_store(cli: &Cli) -> anyhow::Result<CatalogStore> {
    let config = match &cli.data_dir {
        Some(dir) => EngineConfig::default().with_data_dir(dir.clone()),
        None => EngineConfig::load()?,
    };
    debug!(data_dir = %config.data_dir.display(), "catalog store ready");
    Ok(CatalogStore::from_config(&config))
}

fn run_compute(store: &CatalogStore, args: &ComputeArgs) -> anyhow::Result<String> {
    let request = args.to_request();

    if args.compare_terms {
        let analysis = compute::analyze_terms(store, &request, &args.regions, args.years)?;
        if let Some(path) = &args.schedule_csv {
            std::fs::write(path, analysis.to_schedule_csv()?)
                .with_context(|| format!("writing schedule to {}", path.display()))?;
        }
        return Ok(serde_json::to_string_pretty(&analysis)?);
    }

    let json = match args.compare {
        Some(ComputeCompare::Region) => {
            serde_json::to_string_pretty(&compute::compare_regions(store, &request)?)?
        }
        Some(ComputeCompare::Os) => {
            serde_json::to_string_pretty(&compute::compare_operating_systems(store, &request)?)?
        }
        None => serde_json::to_string_pretty(&compute::calculate(store, &request)?)?,
    };
    Ok(json)
}

fn run_object_storage(store: &CatalogStore, args: &ObjectStorageArgs) -> anyhow::Result<String> {
    let request = args.to_request();
    let json = match args.compare {
        Some(ObjectStorageCompare::Region) => {
            serde_json::to_string_pretty(&object_storage::compare_regions(store, &request)?)?
        }
        Some(ObjectStorageCompare::StorageClass) => {
            serde_json::to_string_pretty(&object_storage::compare_storage_classes(
                store, &request,
            )?)?
        }
        None => serde_json::to_string_pretty(&object_storage::calculate(store, &request)?)?,
    };
    Ok(json)
}

fn run_warehouse(store: &CatalogStore, args: &WarehouseArgs) -> anyhow::Result<String> {
    let request = args.to_request();

    if args.compare_terms {
        let analysis = warehouse::analyze_terms(store, &request, &args.regions, args.years)?;
        if let Some(path) = &args.schedule_csv {
            std::fs::write(path, analysis.to_schedule_csv()?)
                .with_context(|| format!("writing schedule to {}", path.display()))?;
        }
        return Ok(serde_json::to_string_pretty(&analysis)?);
    }

    let json = match args.compare {
        Some(WarehouseCompare::Region) => {
            serde_json::to_string_pretty(&warehouse::compare_regions(store, &request)?)?
        }
        None => serde_json::to_string_pretty(&warehouse::calculate(store, &request)?)?,
    };
    Ok(json)
}

fn run_functions(store: &CatalogStore, args: &FunctionsArgs) -> anyhow::Result<String> {
    let request = args.to_request();
    let json = match args.compare {
        Some(FunctionsCompare::Region) => {
            serde_json::to_string_pretty(&functions::compare_regions(store, &request)?)?
        }
        Some(FunctionsCompare::Memory) => {
            serde_json::to_string_pretty(&functions::compare_memory_sizes(store, &request)?)?
        }
        None => serde_json::to_string_pretty(&functions::calculate(store, &request)?)?,
    };
    Ok(json)
}
