//! Catalog rows and typed accessors for the billing fields
//!
//! Rows keep the full field map from the source file so predicates can match
//! on any attribute column; the handful of fields with billing semantics get
//! typed accessors.

use std::collections::HashMap;

use ratecard_common::error::CatalogError;
use ratecard_common::INFINITY_TOKEN;
use rust_decimal::Decimal;

/// Column names with billing semantics.
pub mod columns {
    pub const STARTING_RANGE: &str = "StartingRange";
    pub const ENDING_RANGE: &str = "EndingRange";
    pub const PRICE_PER_UNIT: &str = "PricePerUnit";
    pub const PRICE_DESCRIPTION: &str = "PriceDescription";
    pub const RATE_CODE: &str = "RateCode";
    pub const UNIT: &str = "Unit";
}

/// Upper bound of a rate tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeEnd {
    Finite(Decimal),
    /// Open-ended top tier
    Infinite,
}

/// One rate tier, immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    fields: HashMap<String, String>,
}

impl CatalogRow {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Build a row from field pairs; used by tests and benches.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Tier lower bound; an absent or empty value means 0.
    pub fn begin_range(&self) -> Result<Decimal, CatalogError> {
        let raw = self.get(columns::STARTING_RANGE).unwrap_or("").trim();
        if raw.is_empty() {
            return Ok(Decimal::ZERO);
        }
        raw.parse().map_err(|_| self.bad_field(columns::STARTING_RANGE, raw))
    }

    /// Tier upper bound; an absent or empty value, or the `Inf` sentinel,
    /// means the open-ended top tier.
    pub fn end_range(&self) -> Result<RangeEnd, CatalogError> {
        let raw = self.get(columns::ENDING_RANGE).unwrap_or("").trim();
        if raw.is_empty() || raw == INFINITY_TOKEN {
            return Ok(RangeEnd::Infinite);
        }
        raw.parse()
            .map(RangeEnd::Finite)
            .map_err(|_| self.bad_field(columns::ENDING_RANGE, raw))
    }

    pub fn price_per_unit(&self) -> Result<Decimal, CatalogError> {
        let raw = self.get(columns::PRICE_PER_UNIT).unwrap_or("").trim();
        raw.parse().map_err(|_| self.bad_field(columns::PRICE_PER_UNIT, raw))
    }

    pub fn description(&self) -> &str {
        self.get(columns::PRICE_DESCRIPTION).unwrap_or("")
    }

    pub fn rate_code(&self) -> &str {
        self.get(columns::RATE_CODE).unwrap_or("")
    }

    fn bad_field(&self, field: &'static str, value: &str) -> CatalogError {
        CatalogError::BadField {
            field,
            value: value.to_string(),
            rate_code: self.rate_code().to_string(),
        }
    }
}
