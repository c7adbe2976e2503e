//! Commitment dimensions: term type, offering class, purchase option, tenancy
//!
//! Each enum carries two spellings: the kebab-case code accepted from callers
//! (and used in scenario identifiers) and the display value spelled exactly as
//! the catalog rows and partition keys spell it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Commitment model: pay-as-you-go or reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermType {
    OnDemand,
    Reserved,
}

impl TermType {
    /// Display value used in catalog rows and partition keys.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            TermType::OnDemand => "OnDemand",
            TermType::Reserved => "Reserved",
        }
    }

    /// Caller-facing code.
    pub fn code(&self) -> &'static str {
        match self {
            TermType::OnDemand => "on-demand",
            TermType::Reserved => "reserved",
        }
    }

    pub const ALL: [TermType; 2] = [TermType::OnDemand, TermType::Reserved];
}

impl Default for TermType {
    fn default() -> Self {
        TermType::OnDemand
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for TermType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-demand" => Ok(TermType::OnDemand),
            "reserved" => Ok(TermType::Reserved),
            other => Err(ValidationError::UnsupportedValue {
                field: "term-type",
                value: other.to_string(),
            }),
        }
    }
}

/// Reserved offering class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferingClass {
    Standard,
    Convertible,
}

impl OfferingClass {
    /// Display value used in catalog rows and partition keys.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            OfferingClass::Standard => "standard",
            OfferingClass::Convertible => "convertible",
        }
    }

    pub fn code(&self) -> &'static str {
        self.catalog_value()
    }

    pub const ALL: [OfferingClass; 2] = [OfferingClass::Standard, OfferingClass::Convertible];
}

impl Default for OfferingClass {
    fn default() -> Self {
        OfferingClass::Standard
    }
}

impl fmt::Display for OfferingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for OfferingClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(OfferingClass::Standard),
            "convertible" => Ok(OfferingClass::Convertible),
            other => Err(ValidationError::UnsupportedValue {
                field: "offering-class",
                value: other.to_string(),
            }),
        }
    }
}

/// How much of a reserved commitment is paid at purchase time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseOption {
    AllUpfront,
    PartialUpfront,
    NoUpfront,
}

impl PurchaseOption {
    /// Display value used in catalog rows and partition keys.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            PurchaseOption::AllUpfront => "All Upfront",
            PurchaseOption::PartialUpfront => "Partial Upfront",
            PurchaseOption::NoUpfront => "No Upfront",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PurchaseOption::AllUpfront => "all-upfront",
            PurchaseOption::PartialUpfront => "partial-upfront",
            PurchaseOption::NoUpfront => "no-upfront",
        }
    }

    /// True when the option includes an upfront fee component.
    pub fn has_upfront_fee(&self) -> bool {
        !matches!(self, PurchaseOption::NoUpfront)
    }

    /// True when the option includes a recurring hourly component.
    pub fn has_hourly_fee(&self) -> bool {
        !matches!(self, PurchaseOption::AllUpfront)
    }

    pub const ALL: [PurchaseOption; 3] = [
        PurchaseOption::AllUpfront,
        PurchaseOption::PartialUpfront,
        PurchaseOption::NoUpfront,
    ];
}

impl fmt::Display for PurchaseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for PurchaseOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-upfront" => Ok(PurchaseOption::AllUpfront),
            "partial-upfront" => Ok(PurchaseOption::PartialUpfront),
            "no-upfront" => Ok(PurchaseOption::NoUpfront),
            other => Err(ValidationError::UnsupportedValue {
                field: "purchase-option",
                value: other.to_string(),
            }),
        }
    }
}

/// Instance tenancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tenancy {
    Shared,
    Dedicated,
    Host,
}

impl Tenancy {
    /// Display value used in catalog rows and partition keys.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            Tenancy::Shared => "Shared",
            Tenancy::Dedicated => "Dedicated",
            Tenancy::Host => "Host",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Tenancy::Shared => "shared",
            Tenancy::Dedicated => "dedicated",
            Tenancy::Host => "host",
        }
    }

    pub const ALL: [Tenancy; 3] = [Tenancy::Shared, Tenancy::Dedicated, Tenancy::Host];
}

impl Default for Tenancy {
    fn default() -> Self {
        Tenancy::Shared
    }
}

impl fmt::Display for Tenancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Tenancy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(Tenancy::Shared),
            "dedicated" => Ok(Tenancy::Dedicated),
            "host" => Ok(Tenancy::Host),
            other => Err(ValidationError::UnsupportedValue {
                field: "tenancy",
                value: other.to_string(),
            }),
        }
    }
}

/// Catalog spelling of a reserved commitment length, e.g. `1yr` / `3yr`.
pub fn lease_contract_length(years: u32) -> String {
    format!("{}yr", years)
}
