//! Engine configuration

use std::path::PathBuf;

use ratecard_common::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Catalog engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory of the catalog (`<data_dir>/<service>/<key>.csv`)
    pub data_dir: PathBuf,
    /// Optional cap on cached partitions; unbounded when absent
    pub max_partitions: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            max_partitions: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(dir) = std::env::var("RATECARD_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Ok(val) = std::env::var("RATECARD_MAX_PARTITIONS") {
            if let Ok(v) = val.parse() {
                cfg.max_partitions = Some(v);
            }
        }

        debug!(data_dir = %cfg.data_dir.display(), "engine configuration loaded");
        Ok(cfg)
    }

    /// Override the catalog root, e.g. from a CLI flag.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.data_dir, PathBuf::from("./data"));
        assert!(cfg.max_partitions.is_none());
    }

    #[test]
    fn test_with_data_dir_override() {
        let cfg = EngineConfig::default().with_data_dir("/var/lib/ratecard");
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/ratecard"));
    }
}
