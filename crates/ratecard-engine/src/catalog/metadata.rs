//! Per-service catalog metadata
//!
//! Every service catalog directory carries an `index_metadata.json` with at
//! minimum the version string stamped onto every result. A missing metadata
//! file is fatal: no calculation is possible without a catalog version.

use std::path::Path;

use chrono::{DateTime, Utc};
use ratecard_common::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Name of the metadata file inside each service catalog directory.
pub const METADATA_FILE: &str = "index_metadata.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Catalog version stamped onto every result priced against it
    #[serde(rename = "Version")]
    pub version: String,

    /// When the catalog snapshot was published
    #[serde(
        rename = "PublicationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_date: Option<DateTime<Utc>>,
}

impl CatalogMetadata {
    /// Read metadata from disk. A missing file is reported as
    /// [`CatalogError::MissingMetadata`] so callers can escalate it as a
    /// configuration problem.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::MissingMetadata {
                    path: path.display().to_string(),
                })
            }
            Err(e) => return Err(CatalogError::Io(e)),
        };
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_version_and_date() {
        let metadata: CatalogMetadata = serde_json::from_str(
            r#"{"Version": "20190730231906", "PublicationDate": "2019-07-30T23:19:06Z"}"#,
        )
        .unwrap();
        assert_eq!(metadata.version, "20190730231906");
        assert!(metadata.publication_date.is_some());
    }

    #[test]
    fn test_date_is_optional() {
        let metadata: CatalogMetadata =
            serde_json::from_str(r#"{"Version": "20190730231906"}"#).unwrap();
        assert!(metadata.publication_date.is_none());
    }

    #[test]
    fn test_missing_file_is_fatal_with_path() {
        let err = CatalogMetadata::load(Path::new("/nonexistent/index_metadata.json")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingMetadata { .. }));
        assert!(err.to_string().contains("/nonexistent/index_metadata.json"));
    }
}
