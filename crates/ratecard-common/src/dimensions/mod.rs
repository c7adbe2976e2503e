//! Billing dimension tables shared across the workspace

pub mod families;
pub mod region;
pub mod terms;

pub use families::ProductFamily;
pub use region::Region;
pub use terms::{OfferingClass, PurchaseOption, Tenancy, TermType};
