//! Product families and the family sets each service's partitions span

use serde::{Deserialize, Serialize};

use crate::service;

/// Product family a catalog row belongs to. The family display value is the
/// third component of every partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductFamily {
    ComputeInstance,
    DatabaseInstance,
    Storage,
    StorageSnapshot,
    SystemOperation,
    LoadBalancer,
    DataTransfer,
    ApiRequest,
    Fee,
    Serverless,
}

impl ProductFamily {
    /// Display value used in catalog rows and partition keys.
    pub fn catalog_value(&self) -> &'static str {
        match self {
            ProductFamily::ComputeInstance => "Compute Instance",
            ProductFamily::DatabaseInstance => "Database Instance",
            ProductFamily::Storage => "Storage",
            ProductFamily::StorageSnapshot => "Storage Snapshot",
            ProductFamily::SystemOperation => "System Operation",
            ProductFamily::LoadBalancer => "Load Balancer",
            ProductFamily::DataTransfer => "Data Transfer",
            ProductFamily::ApiRequest => "API Request",
            ProductFamily::Fee => "Fee",
            ProductFamily::Serverless => "Serverless",
        }
    }

    /// Whether reserved-term partition keys for this family expand across
    /// offering class, tenancy, and purchase option.
    pub fn reservable(&self) -> bool {
        matches!(
            self,
            ProductFamily::ComputeInstance | ProductFamily::DatabaseInstance
        )
    }
}

/// Families a compute calculation may touch.
pub const COMPUTE_FAMILIES: &[ProductFamily] = &[
    ProductFamily::ComputeInstance,
    ProductFamily::DataTransfer,
    ProductFamily::Storage,
    ProductFamily::StorageSnapshot,
    ProductFamily::SystemOperation,
    ProductFamily::LoadBalancer,
];

/// Families an object-storage calculation may touch.
pub const OBJECT_STORAGE_FAMILIES: &[ProductFamily] = &[
    ProductFamily::Storage,
    ProductFamily::ApiRequest,
    ProductFamily::Fee,
    ProductFamily::DataTransfer,
];

/// Families a warehouse calculation may touch.
pub const WAREHOUSE_FAMILIES: &[ProductFamily] = &[ProductFamily::ComputeInstance];

/// Families a functions calculation may touch.
pub const FUNCTIONS_FAMILIES: &[ProductFamily] = &[ProductFamily::Serverless];

/// The family set a service's partitions span.
pub fn families_for(service: &str) -> &'static [ProductFamily] {
    match service {
        service::COMPUTE => COMPUTE_FAMILIES,
        service::OBJECT_STORAGE => OBJECT_STORAGE_FAMILIES,
        service::WAREHOUSE => WAREHOUSE_FAMILIES,
        service::FUNCTIONS => FUNCTIONS_FAMILIES,
        _ => &[],
    }
}
