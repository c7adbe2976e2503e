//! # Ratecard Services
//!
//! Per-service usage models and pricing flows on top of the engine crate:
//!
//! - [`compute`]: instances with reserved commitments plus attached transfer,
//!   block-storage, and load-balancer components
//! - [`object_storage`]: storage classes, request tiers, and retrievals
//! - [`warehouse`]: analytic cluster nodes with reserved commitments
//! - [`functions`]: serverless request and duration pricing
//!
//! Each module owns a validated usage struct and a `calculate` flow that
//! derives partition keys, loads partitions through a [`CatalogStore`], and
//! runs one evaluator pass per non-zero usage component. Comparison sweeps
//! and term analyses reuse the same flows through the engine's ranking and
//! term engines.
//!
//! [`CatalogStore`]: ratecard_engine::CatalogStore

pub mod compute;
pub mod functions;
pub mod object_storage;
pub mod warehouse;

mod reserved;
mod transfer;

use ratecard_common::dimensions::region::Region;
use ratecard_common::error::{Result, ValidationError};

/// Resolves a region code to its dimension-table entry.
pub(crate) fn resolve_region(code: &str) -> Result<&'static Region> {
    Region::from_code(code).ok_or_else(|| {
        ValidationError::UnsupportedValue {
            field: "region",
            value: code.to_string(),
        }
        .into()
    })
}
