//! Catalog row store: partition keys, rows, metadata, and the loader/cache

pub mod key;
pub mod metadata;
pub mod row;
pub mod store;

pub use key::{KeyQuery, PartitionKey};
pub use metadata::CatalogMetadata;
pub use row::{columns, CatalogRow, RangeEnd};
pub use store::{CatalogStore, Partition, PartitionSet};
