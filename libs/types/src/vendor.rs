//! Upstream vendors (companies)
//!
//! The vendor set is fixed at compile time. Iteration order of
//! [`Vendor::ALL`] is the merge order of aggregated listings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::VendorParseError;

/// An upstream company serving product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
    #[serde(rename = "AMZ")]
    Amz,
    #[serde(rename = "FLP")]
    Flp,
    #[serde(rename = "SNP")]
    Snp,
    #[serde(rename = "MYN")]
    Myn,
    #[serde(rename = "AZO")]
    Azo,
}

impl Vendor {
    /// All vendors in fan-out order
    pub const ALL: [Vendor; 5] = [Vendor::Amz, Vendor::Flp, Vendor::Snp, Vendor::Myn, Vendor::Azo];

    /// Short tag used in upstream URLs and the `company` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Amz => "AMZ",
            Vendor::Flp => "FLP",
            Vendor::Snp => "SNP",
            Vendor::Myn => "MYN",
            Vendor::Azo => "AZO",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = VendorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vendor::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| VendorParseError { tag: s.to_string() })
    }
}
