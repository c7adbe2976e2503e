//! Structural predicates over catalog rows

use std::fmt;

use crate::catalog::{columns, CatalogRow};

/// Billing unit a predicate pins rate rows to.
///
/// Reserved pricing keeps two row shapes in the same partition: hourly rate
/// rows and one-time upfront quantity rows. The unit column tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Hourly rate rows
    Hours,
    /// One-time upfront fee rows
    Quantity,
}

impl Unit {
    pub fn catalog_value(&self) -> &'static str {
        match self {
            Unit::Hours => "Hrs",
            Unit::Quantity => "Quantity",
        }
    }
}

/// Conjunction of exact field equalities used to select catalog rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    fields: Vec<(String, String)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `field == value` constraint.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Pins the `Unit` column, separating hourly rows from upfront rows.
    pub fn with_unit(self, unit: Unit) -> Self {
        self.with_field(columns::UNIT, unit.catalog_value())
    }

    /// True when every constraint holds on `row`.
    pub fn matches(&self, row: &CatalogRow) -> bool {
        self.fields
            .iter()
            .all(|(field, value)| row.get(field) == Some(value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}={value}")?;
        }
        Ok(())
    }
}
