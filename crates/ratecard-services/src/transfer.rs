//! Data-transfer predicates shared across services
//!
//! Transfer rows live in the `Data Transfer` family of each service's catalog
//! and are addressed by `Transfer Type` plus, for internet and inter-region
//! transfer, `To Location`.

use ratecard_common::dimensions::region::{Region, EXTERNAL_LOCATION};
use ratecard_engine::Predicate;

/// Transfer out to the public internet.
pub(crate) fn internet_out() -> Predicate {
    Predicate::new()
        .with_field("To Location", EXTERNAL_LOCATION)
        .with_field("Transfer Type", "AWS Outbound")
}

/// Transfer within one region, between zones or through load balancers.
pub(crate) fn intra_region() -> Predicate {
    Predicate::new().with_field("Transfer Type", "IntraRegion")
}

/// Transfer out to another region.
pub(crate) fn inter_region(destination: &Region) -> Predicate {
    Predicate::new()
        .with_field("Transfer Type", "InterRegion Outbound")
        .with_field("To Location", destination.display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internet_out_targets_external_location() {
        assert_eq!(
            internet_out().to_string(),
            "To Location=External, Transfer Type=AWS Outbound"
        );
    }

    #[test]
    fn test_inter_region_targets_destination_display() {
        let destination = Region::from_code("eu-west-1").unwrap();
        assert_eq!(
            inter_region(destination).to_string(),
            "Transfer Type=InterRegion Outbound, To Location=EU (Ireland)"
        );
    }

    #[test]
    fn test_intra_region_has_no_location() {
        assert_eq!(intra_region().to_string(), "Transfer Type=IntraRegion");
    }
}
