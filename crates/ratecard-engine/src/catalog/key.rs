//! Partition key derivation and expansion
//!
//! A partition key is the ordered concatenation of dimension display values
//! with every whitespace character stripped: region display name, term-type
//! display value, product family, and for reserved reservable families the
//! offering class, tenancy, and purchase option. Collaborators must reproduce
//! this exact concatenation to address the partitions the loader populated.

use std::fmt;

use ratecard_common::dimensions::families::ProductFamily;
use ratecard_common::dimensions::region::{Region, REGIONS};
use ratecard_common::dimensions::terms::{OfferingClass, PurchaseOption, Tenancy, TermType};

/// Key addressing one catalog partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Concatenate dimension display values, stripping all whitespace.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for value in values {
            key.extend(value.as_ref().chars().filter(|c| !c.is_whitespace()));
        }
        PartitionKey(key)
    }

    /// Key for an on-demand partition: region + term + family.
    pub fn on_demand(region: &Region, family: ProductFamily) -> Self {
        PartitionKey::new([
            region.display,
            TermType::OnDemand.catalog_value(),
            family.catalog_value(),
        ])
    }

    /// Key for a reserved partition of a reservable family: region + term +
    /// family + offering class + tenancy + purchase option.
    pub fn reserved(
        region: &Region,
        family: ProductFamily,
        offering_class: OfferingClass,
        tenancy: Tenancy,
        purchase_option: PurchaseOption,
    ) -> Self {
        PartitionKey::new([
            region.display,
            TermType::Reserved.catalog_value(),
            family.catalog_value(),
            offering_class.catalog_value(),
            tenancy.catalog_value(),
            purchase_option.catalog_value(),
        ])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dimension selection expanded into the full set of partition keys a
/// calculation may touch. Unpinned dimensions expand across every supported
/// value; reserved keys are only generated for reservable families.
#[derive(Debug, Clone, Default)]
pub struct KeyQuery {
    region: Option<&'static Region>,
    term_type: Option<TermType>,
    families: Vec<ProductFamily>,
    offering_classes: Vec<OfferingClass>,
    tenancies: Vec<Tenancy>,
    purchase_options: Vec<PurchaseOption>,
}

impl KeyQuery {
    pub fn new(families: &[ProductFamily]) -> Self {
        Self {
            families: families.to_vec(),
            ..Self::default()
        }
    }

    /// Pin the region; unpinned queries expand across all supported regions.
    pub fn with_region(mut self, region: &'static Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Pin the term type; unpinned queries expand across both term types.
    pub fn with_term(mut self, term_type: TermType) -> Self {
        self.term_type = Some(term_type);
        self
    }

    pub fn with_offering_class(mut self, offering_class: OfferingClass) -> Self {
        self.offering_classes.push(offering_class);
        self
    }

    pub fn with_tenancy(mut self, tenancy: Tenancy) -> Self {
        self.tenancies.push(tenancy);
        self
    }

    pub fn with_purchase_option(mut self, purchase_option: PurchaseOption) -> Self {
        self.purchase_options.push(purchase_option);
        self
    }

    /// Expand into the concrete key set.
    pub fn expand(&self) -> Vec<PartitionKey> {
        let regions: Vec<&Region> = match self.region {
            Some(region) => vec![region],
            None => REGIONS.iter().collect(),
        };
        let terms: &[TermType] = match self.term_type {
            Some(ref term) => std::slice::from_ref(term),
            None => &TermType::ALL,
        };
        let offering_classes: &[OfferingClass] = if self.offering_classes.is_empty() {
            &OfferingClass::ALL
        } else {
            &self.offering_classes
        };
        let tenancies: &[Tenancy] = if self.tenancies.is_empty() {
            &Tenancy::ALL
        } else {
            &self.tenancies
        };
        let purchase_options: &[PurchaseOption] = if self.purchase_options.is_empty() {
            &PurchaseOption::ALL
        } else {
            &self.purchase_options
        };

        let mut keys = Vec::new();
        for region in &regions {
            for term in terms {
                for family in &self.families {
                    if *term == TermType::Reserved && family.reservable() {
                        for offering_class in offering_classes {
                            for tenancy in tenancies {
                                for purchase_option in purchase_options {
                                    keys.push(PartitionKey::reserved(
                                        region,
                                        *family,
                                        *offering_class,
                                        *tenancy,
                                        *purchase_option,
                                    ));
                                }
                            }
                        }
                    } else {
                        keys.push(PartitionKey::new([
                            region.display,
                            term.catalog_value(),
                            family.catalog_value(),
                        ]));
                    }
                }
            }
        }
        keys
    }
}
