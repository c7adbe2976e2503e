//! Error types for the ratecard system
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using RatecardError
pub type Result<T> = std::result::Result<T, RatecardError>;

/// Unified error type for ratecard operations
#[derive(Debug, Error)]
pub enum RatecardError {
    // Input validation errors, raised by the service-module layer
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // A structural predicate matched zero catalog rows
    #[error("{0}")]
    NoDataFound(#[from] NoDataFoundError),

    // Unreadable or malformed catalog input
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Input validation errors
///
/// `validate()` implementations collect every violation for a request into a
/// single [`ValidationError::Invalid`] so callers see the full list at once.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unsupported value [{value}] for [{field}]")]
    UnsupportedValue { field: &'static str, value: String },

    #[error("[{field}] must be {expected}, got [{value}]")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Invalid request: [{}]", .issues.join(", "))]
    Invalid { issues: Vec<String> },
}

/// Raised when a predicate matches no rows in the addressed partition.
///
/// Recoverable: comparison sweeps skip the failing candidate and only surface
/// this error when an entire comparison produced zero usable scenarios.
#[derive(Debug, Error)]
#[error("Could not find rate data for service:[{service}] - query:[{query}]")]
pub struct NoDataFoundError {
    /// Service identifier the failing component priced against
    pub service: String,
    /// Rendered predicate description
    pub query: String,
}

impl NoDataFoundError {
    pub fn new(service: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            query: query.into(),
        }
    }
}

/// Catalog read and parse errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog metadata not found at [{path}]")]
    MissingMetadata { path: String },

    #[error("Unparseable [{field}] value [{value}] in rate [{rate_code}]")]
    BadField {
        field: &'static str,
        value: String,
        rate_code: String,
    },

    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

// Implement From for common external error types
impl From<serde_json::Error> for RatecardError {
    fn from(err: serde_json::Error) -> Self {
        RatecardError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_found_names_service_and_query() {
        let err = NoDataFoundError::new("compute", "Instance Type=m5.large, Unit=Hrs");
        let msg = err.to_string();
        assert!(msg.contains("service:[compute]"));
        assert!(msg.contains("query:[Instance Type=m5.large, Unit=Hrs]"));
    }

    #[test]
    fn test_no_data_found_passes_through_umbrella() {
        let err = RatecardError::from(NoDataFoundError::new("warehouse", "Instance Type=dc2.large"));
        assert!(err.to_string().starts_with("Could not find rate data"));
    }

    #[test]
    fn test_validation_error_joins_issues() {
        let err = ValidationError::Invalid {
            issues: vec![
                "unsupported region [moon-base-1]".to_string(),
                "years must be 1 or 3".to_string(),
            ],
        };
        assert!(err.to_string().contains("moon-base-1"));
        assert!(err.to_string().contains("years must be 1 or 3"));
    }

    #[test]
    fn test_catalog_bad_field_names_rate_code() {
        let err = CatalogError::BadField {
            field: "PricePerUnit",
            value: "n/a".to_string(),
            rate_code: "R8ZU3.JRTCKXETXF.6YS6EN2CT7".to_string(),
        };
        assert!(err.to_string().contains("PricePerUnit"));
        assert!(err.to_string().contains("R8ZU3"));
    }
}
