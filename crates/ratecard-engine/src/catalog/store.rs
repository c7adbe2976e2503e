//! Partition loader and process-wide partition cache
//!
//! Rate catalogs are laid out on disk as one directory per service, each
//! holding an `index_metadata.json` file and one CSV file per partition key.
//! `CatalogStore` reads partitions on demand and keeps them in a concurrent
//! cache so repeated calculations against the same dimensions never touch
//! the filesystem twice.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ratecard_common::error::CatalogError;
use tracing::debug;

use crate::catalog::key::PartitionKey;
use crate::catalog::metadata::{CatalogMetadata, METADATA_FILE};
use crate::catalog::row::CatalogRow;
use crate::config::EngineConfig;

/// File extension of on-disk partition files.
const PARTITION_EXT: &str = "csv";

static EMPTY_PARTITION: Partition = Partition { rows: Vec::new() };

/// Rows of a single catalog partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    rows: Vec<CatalogRow>,
}

impl Partition {
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partitions and catalog metadata resolved for one calculation.
///
/// Lookups for keys that were not requested at load time resolve to an
/// empty partition, the same behavior a missing partition file gets.
#[derive(Debug, Clone)]
pub struct PartitionSet {
    partitions: HashMap<String, Arc<Partition>>,
    /// Metadata of the catalog the partitions were read from.
    pub metadata: Arc<CatalogMetadata>,
}

impl PartitionSet {
    pub fn partition(&self, key: &PartitionKey) -> &Partition {
        self.partitions
            .get(key.as_str())
            .map(Arc::as_ref)
            .unwrap_or(&EMPTY_PARTITION)
    }

    /// Catalog version the partitions belong to.
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Total row count across all partitions in the set.
    pub fn row_count(&self) -> usize {
        self.partitions.values().map(|p| p.len()).sum()
    }
}

/// On-demand partition loader with a shared in-memory cache.
///
/// Cloning is cheap and all clones share the same cache, so a store can be
/// handed to concurrent calculations freely.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    data_dir: PathBuf,
    max_partitions: Option<usize>,
    partitions: Arc<DashMap<(String, String), Arc<Partition>>>,
    metadata: Arc<DashMap<String, Arc<CatalogMetadata>>>,
}

impl CatalogStore {
    /// Creates a store reading catalogs under `data_dir` with an unbounded cache.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_partitions: None,
            partitions: Arc::new(DashMap::new()),
            metadata: Arc::new(DashMap::new()),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let store = Self::new(config.data_dir.clone());
        match config.max_partitions {
            Some(max) => store.with_max_partitions(max),
            None => store,
        }
    }

    /// Caps the number of cached partitions across all services.
    pub fn with_max_partitions(mut self, max_partitions: usize) -> Self {
        self.max_partitions = Some(max_partitions);
        self
    }

    /// Loads the partitions for `keys` from the `service` catalog.
    ///
    /// Partitions without a backing file load as empty. Missing or invalid
    /// catalog metadata fails the whole load.
    pub fn load_partitions(
        &self,
        service: &str,
        keys: &[PartitionKey],
    ) -> Result<PartitionSet, CatalogError> {
        let started = Instant::now();
        let metadata = self.metadata(service)?;

        let mut partitions = HashMap::with_capacity(keys.len());
        let mut read = 0usize;
        for key in keys {
            let cache_key = (service.to_string(), key.as_str().to_string());
            let partition = match self.partitions.get(&cache_key) {
                Some(cached) => Arc::clone(&cached),
                None => {
                    self.shed_over_capacity();
                    match self.partitions.entry(cache_key) {
                        Entry::Occupied(entry) => Arc::clone(entry.get()),
                        Entry::Vacant(entry) => {
                            let loaded = Arc::new(self.read_partition(service, key)?);
                            read += 1;
                            entry.insert(Arc::clone(&loaded));
                            loaded
                        }
                    }
                }
            };
            partitions.insert(key.as_str().to_string(), partition);
        }

        debug!(
            service,
            keys = keys.len(),
            read,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resolved catalog partitions"
        );
        Ok(PartitionSet {
            partitions,
            metadata,
        })
    }

    /// Catalog metadata for `service`, read once and cached.
    pub fn metadata(&self, service: &str) -> Result<Arc<CatalogMetadata>, CatalogError> {
        if let Some(cached) = self.metadata.get(service) {
            return Ok(Arc::clone(&cached));
        }
        let path = self.data_dir.join(service).join(METADATA_FILE);
        let loaded = Arc::new(CatalogMetadata::load(&path)?);
        self.metadata.insert(service.to_string(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drops all cached partitions and metadata for one service.
    pub fn evict(&self, service: &str) {
        self.partitions.retain(|(cached, _), _| cached != service);
        self.metadata.remove(service);
        debug!(service, "evicted cached catalog data");
    }

    /// Drops every cached partition and all metadata.
    pub fn clear(&self) {
        self.partitions.clear();
        self.metadata.clear();
    }

    /// Number of partitions currently cached.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    fn read_partition(&self, service: &str, key: &PartitionKey) -> Result<Partition, CatalogError> {
        // Keys can contain dots (region display names), so the extension is
        // appended rather than set.
        let path = self
            .data_dir
            .join(service)
            .join(format!("{}.{}", key.as_str(), PARTITION_EXT));

        let started = Instant::now();
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(service, key = %key, "no partition file, treating as empty");
                return Ok(Partition::default());
            }
            Err(err) => return Err(CatalogError::Io(err)),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut rows = Vec::new();
        for record in reader.deserialize::<HashMap<String, String>>() {
            rows.push(CatalogRow::new(record?));
        }
        debug!(
            service,
            key = %key,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "read catalog partition"
        );
        Ok(Partition::from_rows(rows))
    }

    // Called before inserting a new partition. Never runs while a reference
    // into the map is held; dashmap would deadlock on the shard lock.
    fn shed_over_capacity(&self) {
        let Some(max) = self.max_partitions else {
            return;
        };
        while self.partitions.len() >= max.max(1) {
            let victim = self
                .partitions
                .iter()
                .next()
                .map(|entry| entry.key().clone());
            match victim {
                Some(key) => {
                    self.partitions.remove(&key);
                    debug!(service = %key.0, key = %key.1, "shed cached partition at capacity");
                }
                None => break,
            }
        }
    }
}
