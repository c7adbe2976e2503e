//! # Ratecard Engine
//!
//! Partition-addressed rate catalog access and the pricing engines built on
//! top of it.
//!
//! ## Modules
//!
//! - [`catalog`]: partition keys, catalog rows, metadata, and the cached
//!   partition loader
//! - [`evaluate`]: tiered billable-band evaluation of one usage component
//! - [`analysis`]: one-dimension comparison sweeps and term/amortization
//!   analysis
//! - [`config`]: engine configuration from the environment
//!
//! ## Flow
//!
//! A calculation expands its dimensions into partition keys, loads the
//! matching partitions through a [`CatalogStore`], then evaluates one
//! predicate per usage component against them, folding the line items into a
//! single result. The analysis engines repeat that calculation across
//! candidate values or commitment terms and rank what comes back.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod evaluate;

// Re-export the types a calculation touches on every call
pub use analysis::{compare, compare_terms, Candidate, TermAnalysisRequest, TermPriceModel};
pub use catalog::{CatalogStore, KeyQuery, Partition, PartitionKey, PartitionSet};
pub use config::EngineConfig;
pub use evaluate::{billable_band, evaluate, Predicate, PriceAccumulator, Unit};
