//! Fabric types and their seam allowances.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Fabric the new pieces are cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FabricType {
    /// Woven cloth.
    Woven,
    /// Stretch knit.
    Knit,
    /// Denim.
    Denim,
    /// Unspecified.
    #[default]
    Default,
}

impl FabricType {
    /// Seam allowance in millimeters.
    #[must_use]
    pub const fn seam_allowance(self) -> f64 {
        match self {
            Self::Woven | Self::Denim => 15.0,
            Self::Knit => 10.0,
            Self::Default => 12.0,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Woven => "woven",
            Self::Knit => "knit",
            Self::Denim => "denim",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for FabricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FabricType {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "woven" => Ok(Self::Woven),
            "knit" => Ok(Self::Knit),
            "denim" => Ok(Self::Denim),
            "default" | "" => Ok(Self::Default),
            _ => Err(PatternError::UnknownFabric {
                name: s.to_string(),
            }),
        }
    }
}
