//! # Ratecard Common
//!
//! Shared types, dimension tables, and errors for the ratecard pricing engine.
//!
//! ## Core Types
//!
//! - [`PricingRecord`]: one priced line item for a single rate tier
//! - [`PricingResult`]: aggregate of one calculation, stamped with the catalog version
//! - [`PricingScenario`]/[`PriceComparison`]: ranked output of a one-dimension sweep
//! - [`TermPricingScenario`]/[`TermPricingAnalysis`]: commitment comparison with
//!   amortization schedule and break-even months
//!
//! ## Dimensions
//!
//! - [`dimensions::region`]: supported regions with catalog display names and
//!   usage-type prefixes
//! - [`dimensions::terms`]: term type, offering class, purchase option, tenancy
//! - [`dimensions::families`]: product families and per-service family sets

pub mod dimensions;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{CatalogError, NoDataFoundError, RatecardError, Result, ValidationError};
pub use types::{
    record::PricingRecord,
    scenario::{PriceComparison, PricingResult, PricingScenario},
    term::{MonthlyCost, TermPricingAnalysis, TermPricingScenario},
};

/// Ratecard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Currency every catalog price is denominated in
pub const DEFAULT_CURRENCY: &str = "USD";

/// Billing hours in one month, as used by reserved-term math
pub const HOURS_IN_MONTH: u32 = 720;

/// Calendar hours in one year, as used by the on-demand baseline
pub const HOURS_IN_YEAR: u32 = 365 * 24;

/// Months in a year
pub const MONTHS_IN_YEAR: u32 = 12;

/// Reserved commitment lengths offered by the catalog, in years
pub const SUPPORTED_RESERVED_YEARS: &[u32] = &[1, 3];

/// Sentinel token marking an open-ended top tier in catalog files
pub const INFINITY_TOKEN: &str = "Inf";

/// Service identifiers used in records, catalog paths, and error messages.
pub mod service {
    /// Compute instances and their reserved commitments
    pub const COMPUTE: &str = "compute";
    /// Block storage volumes, provisioned IOPS, and snapshots
    pub const BLOCK_STORAGE: &str = "block-storage";
    /// Load balancer hours and processed bytes
    pub const LOAD_BALANCER: &str = "load-balancer";
    /// Object storage, requests, and retrievals
    pub const OBJECT_STORAGE: &str = "object-storage";
    /// Analytic warehouse cluster nodes
    pub const WAREHOUSE: &str = "warehouse";
    /// Serverless function requests and duration
    pub const FUNCTIONS: &str = "functions";
    /// Network transfer between regions, within a region, or out to the internet
    pub const DATA_TRANSFER: &str = "data-transfer";
}
