//! Supported regions and their catalog spellings
//!
//! Catalog rows address regions three ways: the long display name used in
//! partition keys (`US East (N. Virginia)`), the usage-type prefix baked into
//! metered usage codes (`USE2-DataProcessing-Bytes`), and a short label used
//! in comparison reports. All three are fixed per region and live here.

/// One supported region and its catalog spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Caller-facing region code, e.g. `us-west-2`
    pub code: &'static str,
    /// Display name used in catalog rows and partition keys
    pub display: &'static str,
    /// Prefix applied to usage-type codes metered in this region
    pub usage_prefix: &'static str,
    /// Short label for comparison reports
    pub label: &'static str,
}

impl Region {
    /// Look up a region by its caller-facing code.
    pub fn from_code(code: &str) -> Option<&'static Region> {
        REGIONS.iter().find(|r| r.code == code)
    }

    /// Render a metered usage-type code for this region.
    pub fn usage_type(&self, suffix: &str) -> String {
        format!("{}{}", self.usage_prefix, suffix)
    }
}

/// All supported regions, in canonical comparison order.
pub const REGIONS: &[Region] = &[
    Region { code: "us-east-1", display: "US East (N. Virginia)", usage_prefix: "", label: "N. Virginia" },
    Region { code: "us-east-2", display: "US East (Ohio)", usage_prefix: "USE2-", label: "Ohio" },
    Region { code: "us-west-1", display: "US West (N. California)", usage_prefix: "USW1-", label: "N. California" },
    Region { code: "us-west-2", display: "US West (Oregon)", usage_prefix: "USW2-", label: "Oregon" },
    Region { code: "ca-central-1", display: "Canada (Central)", usage_prefix: "CAN1-", label: "Canada" },
    Region { code: "eu-west-1", display: "EU (Ireland)", usage_prefix: "EU-", label: "Ireland" },
    Region { code: "eu-west-2", display: "EU (London)", usage_prefix: "EUW2-", label: "London" },
    Region { code: "eu-west-3", display: "EU (Paris)", usage_prefix: "EUW3-", label: "Paris" },
    Region { code: "eu-north-1", display: "EU (Stockholm)", usage_prefix: "EUN1-", label: "Stockholm" },
    Region { code: "eu-central-1", display: "EU (Frankfurt)", usage_prefix: "EUC1-", label: "Frankfurt" },
    Region { code: "ap-east-1", display: "Asia Pacific (Hong Kong)", usage_prefix: "APE1-", label: "Hong Kong" },
    Region { code: "ap-northeast-1", display: "Asia Pacific (Tokyo)", usage_prefix: "APN1-", label: "Tokyo" },
    Region { code: "ap-northeast-2", display: "Asia Pacific (Seoul)", usage_prefix: "APN2-", label: "Seoul" },
    Region { code: "ap-northeast-3", display: "Asia Pacific (Osaka-Local)", usage_prefix: "APN3-", label: "Osaka" },
    Region { code: "ap-southeast-1", display: "Asia Pacific (Singapore)", usage_prefix: "APS1-", label: "Singapore" },
    Region { code: "ap-southeast-2", display: "Asia Pacific (Sydney)", usage_prefix: "APS2-", label: "Sydney" },
    Region { code: "ap-south-1", display: "Asia Pacific (Mumbai)", usage_prefix: "APS3-", label: "Mumbai" },
    Region { code: "sa-east-1", display: "South America (Sao Paulo)", usage_prefix: "SAE1-", label: "Sao Paulo" },
];

/// `To Location` value for transfer out to the public internet.
pub const EXTERNAL_LOCATION: &str = "External";

/// All supported region codes, in canonical comparison order.
pub fn supported_codes() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|r| r.code)
}
