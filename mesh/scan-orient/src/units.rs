//! Length unit detection and conversion.
//!
//! Scanners export in whatever unit their vendor prefers. A standing adult
//! is 1.5-2 m tall, so the largest bounding-box extent is enough to guess
//! the unit a file was written in.

use std::fmt;
use std::str::FromStr;

use scan_types::{MeshBounds, ScanMesh};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length units a scan may be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthUnit {
    /// Millimeters (the working unit).
    #[default]
    Millimeters,
    /// Centimeters.
    Centimeters,
    /// Meters.
    Meters,
    /// Inches. Never auto-detected, only set explicitly.
    Inches,
}

impl LengthUnit {
    /// Millimeters per one of this unit.
    #[must_use]
    pub const fn to_mm(self) -> f64 {
        match self {
            Self::Millimeters => 1.0,
            Self::Centimeters => 10.0,
            Self::Meters => 1000.0,
            Self::Inches => 25.4,
        }
    }

    /// Short symbol ("mm", "cm", "m", "in").
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Meters => "m",
            Self::Inches => "in",
        }
    }

    /// Guess the unit from the largest bounding-box extent of a human-sized
    /// object.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_orient::LengthUnit;
    ///
    /// assert_eq!(LengthUnit::detect(1750.0), LengthUnit::Millimeters);
    /// assert_eq!(LengthUnit::detect(175.0), LengthUnit::Centimeters);
    /// assert_eq!(LengthUnit::detect(1.75), LengthUnit::Meters);
    /// ```
    #[must_use]
    pub fn detect(max_extent: f64) -> Self {
        if max_extent > 500.0 {
            Self::Millimeters
        } else if max_extent > 50.0 {
            Self::Centimeters
        } else if max_extent > 0.5 {
            Self::Meters
        } else {
            Self::Millimeters
        }
    }

    /// Detect the unit of a mesh from its bounds.
    #[must_use]
    pub fn detect_mesh(mesh: &ScanMesh) -> Self {
        mesh.bounds_opt()
            .map_or(Self::Millimeters, |b| Self::detect(b.max_extent()))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeters),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeters),
            "m" | "meter" | "meters" => Ok(Self::Meters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            other => Err(format!("unknown length unit '{other}'")),
        }
    }
}

/// Scale a mesh in place from one unit to another.
///
/// Returns the factor applied.
pub fn convert_units(mesh: &mut ScanMesh, from: LengthUnit, to: LengthUnit) -> f64 {
    let factor = from.to_mm() / to.to_mm();
    if (factor - 1.0).abs() > f64::EPSILON {
        mesh.scale(factor);
    }
    factor
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scan_types::{revolve, MeshBounds, ProfileRing};

    #[test]
    fn detection_thresholds() {
        assert_eq!(LengthUnit::detect(501.0), LengthUnit::Millimeters);
        assert_eq!(LengthUnit::detect(500.0), LengthUnit::Centimeters);
        assert_eq!(LengthUnit::detect(51.0), LengthUnit::Centimeters);
        assert_eq!(LengthUnit::detect(50.0), LengthUnit::Meters);
        assert_eq!(LengthUnit::detect(0.6), LengthUnit::Meters);
        assert_eq!(LengthUnit::detect(0.4), LengthUnit::Millimeters);
    }

    #[test]
    fn meters_to_millimeters() {
        let rings = [ProfileRing::circle(0.0, 0.1), ProfileRing::circle(1.7, 0.1)];
        let mut mesh = revolve(&rings, 8, true);
        assert_eq!(LengthUnit::detect_mesh(&mesh), LengthUnit::Meters);

        let factor = convert_units(&mut mesh, LengthUnit::Meters, LengthUnit::Millimeters);
        assert_eq!(factor, 1000.0);
        assert_relative_eq!(mesh.bounds().height(), 1700.0, epsilon = 1e-6);
    }

    #[test]
    fn inches_parse_and_convert() {
        let unit: LengthUnit = "Inches".parse().unwrap();
        assert_eq!(unit, LengthUnit::Inches);
        assert_eq!(unit.to_string(), "in");
        assert!("furlong".parse::<LengthUnit>().is_err());

        let mut mesh = revolve(&[ProfileRing::circle(0.0, 1.0), ProfileRing::circle(10.0, 1.0)], 8, false);
        convert_units(&mut mesh, LengthUnit::Inches, LengthUnit::Millimeters);
        assert_relative_eq!(mesh.bounds().height(), 254.0, epsilon = 1e-6);
    }
}
