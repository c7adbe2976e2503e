//! Core data types for the ratecard pricing engine

pub mod record;
pub mod scenario;
pub mod term;
