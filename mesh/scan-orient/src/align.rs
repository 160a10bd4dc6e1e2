//! Body/garment frame alignment.
//!
//! Both scans are brought to millimeters and the garment is translated so
//! its vertex mean sits on the body's. No rotation is estimated: both scans
//! are expected to have gone through [`orient_body`](crate::orient_body) or
//! [`orient_garment`](crate::orient_garment) first.

use nalgebra::Vector3;
use scan_types::ScanMesh;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::units::{convert_units, LengthUnit};

/// What [`align`] did.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlignReport {
    /// Unit the body scan was found in.
    pub body_unit: LengthUnit,
    /// Unit the garment scan was found in.
    pub garment_unit: LengthUnit,
    /// Translation applied to the garment after unit conversion.
    pub garment_translation: Vector3<f64>,
}

impl std::fmt::Display for AlignReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = self.garment_translation;
        write!(
            f,
            "Aligned scans: body {} → mm, garment {} → mm, garment moved by [{:.1}, {:.1}, {:.1}]",
            self.body_unit, self.garment_unit, t.x, t.y, t.z
        )
    }
}

/// Convert both scans to millimeters (auto-detected) and move the garment
/// centroid onto the body centroid.
///
/// # Example
///
/// ```
/// use scan_orient::{align, LengthUnit};
/// use scan_types::{revolve, ProfileRing};
///
/// let mut body = revolve(&[ProfileRing::circle(0.0, 150.0), ProfileRing::circle(1700.0, 150.0)], 16, true);
/// let mut garment = revolve(&[ProfileRing::circle(0.0, 16.0), ProfileRing::circle(60.0, 16.0)], 16, false);
/// let report = align(&mut body, &mut garment);
/// assert_eq!(report.garment_unit, LengthUnit::Centimeters);
/// assert!((garment.centroid() - body.centroid()).norm() < 1e-6);
/// ```
pub fn align(body: &mut ScanMesh, garment: &mut ScanMesh) -> AlignReport {
    let body_unit = LengthUnit::detect_mesh(body);
    convert_units(body, body_unit, LengthUnit::Millimeters);
    let garment_unit = LengthUnit::detect_mesh(garment);
    convert_units(garment, garment_unit, LengthUnit::Millimeters);

    let garment_translation = body.centroid() - garment.centroid();
    garment.translate(garment_translation);

    let report = AlignReport {
        body_unit,
        garment_unit,
        garment_translation,
    };
    info!("{report}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scan_types::{revolve, MeshBounds, ProfileRing};

    fn tube(height: f64, radius: f64) -> ScanMesh {
        revolve(
            &[ProfileRing::circle(0.0, radius), ProfileRing::circle(height, radius)],
            16,
            true,
        )
    }

    #[test]
    fn meter_body_and_mm_garment() {
        let mut body = tube(1.75, 0.15);
        let mut garment = tube(700.0, 170.0);
        garment.translate(Vector3::new(40.0, 10.0, 900.0));

        let report = align(&mut body, &mut garment);
        assert_eq!(report.body_unit, LengthUnit::Meters);
        assert_eq!(report.garment_unit, LengthUnit::Millimeters);
        assert_relative_eq!(body.bounds().height(), 1750.0, epsilon = 1e-6);
        assert_relative_eq!((garment.centroid() - body.centroid()).norm(), 0.0, epsilon = 1e-6);
        assert!(report.to_string().starts_with("Aligned scans: body m"));
    }

    #[test]
    fn already_aligned_is_a_no_op() {
        let mut body = tube(1700.0, 150.0);
        let mut garment = tube(1700.0, 160.0);
        let before = garment.clone();
        let report = align(&mut body, &mut garment);
        assert_relative_eq!(report.garment_translation.norm(), 0.0, epsilon = 1e-9);
        assert_eq!(garment.vertices.len(), before.vertices.len());
    }
}
