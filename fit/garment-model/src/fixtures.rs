//! Synthetic garment scans for tests and examples.

use scan_types::{revolve, ProfileRing, ScanMesh, Vector3};

/// Ring spacing of the fixtures (mm).
const RING_STEP: f64 = 20.0;

/// Segments per ring.
const SEGMENTS: usize = 32;

fn rings(from: f64, to: f64, radius: f64) -> Vec<ProfileRing> {
    let mut rings = Vec::new();
    let mut z = from;
    while z <= to + 1e-9 {
        rings.push(ProfileRing::circle(z, radius));
        z += RING_STEP;
    }
    rings
}

/// Open tube from `z = 0` to `height`: a shirt, dress or skirt depending
/// on height.
#[must_use]
pub fn tube(height: f64, radius: f64) -> ScanMesh {
    revolve(&rings(0.0, height, radius), SEGMENTS, false)
}

/// Open pants 1000 mm tall: two legs of radius 70 centered at `x = ±120`
/// reaching 420 mm, and a seat tube of radius 190 from 400 mm to the
/// waist.
///
/// # Example
///
/// ```
/// use garment_model::{analyze_garment, pants, GarmentParams, GarmentType};
///
/// let analysis = analyze_garment(pants(), None, &GarmentParams::default()).unwrap();
/// assert_eq!(analysis.garment_type, GarmentType::Pants);
/// ```
#[must_use]
pub fn pants() -> ScanMesh {
    let leg = rings(0.0, 420.0, 70.0);
    let mut mesh = revolve(&leg, SEGMENTS, false);
    mesh.translate(Vector3::new(-120.0, 0.0, 0.0));
    let mut right = revolve(&leg, SEGMENTS, false);
    right.translate(Vector3::new(120.0, 0.0, 0.0));
    mesh.merge(&right);
    mesh.merge(&revolve(&rings(400.0, 1000.0, 190.0), SEGMENTS, false));
    mesh
}
