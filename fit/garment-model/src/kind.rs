//! Closed vocabularies: garment types and seam kinds.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::GarmentError;

/// What kind of garment a scan shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GarmentType {
    /// Two leg tubes joined at the seat.
    Pants,
    /// Single short tube.
    Shirt,
    /// Single long tube.
    Dress,
    /// Waist-down single tube.
    Skirt,
    /// Treated like a shirt.
    Jacket,
    /// Not classified.
    #[default]
    Unknown,
}

impl GarmentType {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pants => "pants",
            Self::Shirt => "shirt",
            Self::Dress => "dress",
            Self::Skirt => "skirt",
            Self::Jacket => "jacket",
            Self::Unknown => "unknown",
        }
    }

    /// True for garments that cover the torso from the shoulders down.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Shirt | Self::Dress | Self::Jacket)
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GarmentType {
    type Err = GarmentError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pants" | "trousers" => Ok(Self::Pants),
            "shirt" => Ok(Self::Shirt),
            "dress" => Ok(Self::Dress),
            "skirt" => Ok(Self::Skirt),
            "jacket" => Ok(Self::Jacket),
            "unknown" | "auto" => Ok(Self::Unknown),
            _ => Err(GarmentError::unknown_type(s)),
        }
    }
}

/// Role of a seam line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeamKind {
    /// Vertical seam at the side of the torso or upper leg.
    SideSeam,
    /// Inner leg seam.
    Inseam,
    /// Outer leg seam.
    Outseam,
    /// Vertical seam at the front center.
    CenterFront,
    /// Vertical seam at the back center.
    CenterBack,
    /// Horizontal seam near the top of a top.
    Shoulder,
    /// Sleeve attachment.
    Armhole,
    /// Top edge of pants.
    Waistband,
    /// Bottom edge.
    Hem,
    /// Horizontal seam between seat and legs.
    Crotch,
    /// Found but not classified.
    Unknown,
}

impl SeamKind {
    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SideSeam => "side_seam",
            Self::Inseam => "inseam",
            Self::Outseam => "outseam",
            Self::CenterFront => "center_front",
            Self::CenterBack => "center_back",
            Self::Shoulder => "shoulder",
            Self::Armhole => "armhole",
            Self::Waistband => "waistband",
            Self::Hem => "hem",
            Self::Crotch => "crotch",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SeamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Pants".parse::<GarmentType>().unwrap(), GarmentType::Pants);
        assert_eq!(" JACKET ".parse::<GarmentType>().unwrap(), GarmentType::Jacket);
        assert_eq!("auto".parse::<GarmentType>().unwrap(), GarmentType::Unknown);
    }

    #[test]
    fn unrecognized_name_is_an_error() {
        let err = "gown".parse::<GarmentType>().unwrap_err();
        assert_eq!(err, GarmentError::UnknownType { name: "gown".into() });
        assert!(err.to_string().contains("'gown'"));
    }

    #[test]
    fn display_uses_snake_case() {
        assert_eq!(SeamKind::CenterFront.to_string(), "center_front");
        assert_eq!(GarmentType::Dress.to_string(), "dress");
        assert!(GarmentType::Jacket.is_top());
        assert!(!GarmentType::Skirt.is_top());
    }
}
