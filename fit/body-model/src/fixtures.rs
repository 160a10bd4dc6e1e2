//! Synthetic body for demos and tests.

use scan_types::{revolve, ProfileRing, ScanMesh};

/// `(z, half-width, half-depth)` control points of a 1.7 m figure, feet at
/// `z = 0`. The leg region is one elliptical tube as wide as both legs.
const PROFILE: [(f64, f64, f64); 17] = [
    (0.0, 95.0, 40.0),
    (150.0, 95.0, 40.0),
    (480.0, 150.0, 70.0),
    (760.0, 175.0, 100.0),
    (850.0, 190.0, 140.0),
    (900.0, 185.0, 135.0),
    (960.0, 105.0, 85.0),
    (1080.0, 105.0, 85.0),
    (1160.0, 175.0, 130.0),
    (1250.0, 175.0, 130.0),
    (1330.0, 190.0, 90.0),
    (1400.0, 200.0, 60.0),
    (1440.0, 60.0, 55.0),
    (1480.0, 60.0, 55.0),
    (1520.0, 85.0, 95.0),
    (1650.0, 85.0, 95.0),
    (1700.0, 40.0, 40.0),
];

fn interpolate(z: f64) -> (f64, f64) {
    let upper = PROFILE.partition_point(|&(pz, _, _)| pz < z).min(PROFILE.len() - 1);
    if upper == 0 {
        return (PROFILE[0].1, PROFILE[0].2);
    }
    let (z0, w0, d0) = PROFILE[upper - 1];
    let (z1, w1, d1) = PROFILE[upper];
    let t = ((z - z0) / (z1 - z0)).clamp(0.0, 1.0);
    (t.mul_add(w1 - w0, w0), t.mul_add(d1 - d0, d0))
}

/// Rings of the figure, every 10 mm, each widened by `ease` mm.
#[must_use]
pub fn mannequin_rings(ease: f64) -> Vec<ProfileRing> {
    (0..=170)
        .map(|i| {
            let z = f64::from(i) * 10.0;
            let (w, d) = interpolate(z);
            ProfileRing::ellipse(z, w + ease, d + ease)
        })
        .collect()
}

/// A closed, upright, millimeter-scale body scan: hourglass torso, narrow
/// waist near 1 m, shoulders at 1.3-1.4 m.
///
/// # Example
///
/// ```
/// use body_model::mannequin;
/// use scan_types::MeshBounds;
///
/// let body = mannequin();
/// assert!((body.bounds().height() - 1700.0).abs() < 0.01);
/// ```
#[must_use]
pub fn mannequin() -> ScanMesh {
    revolve(&mannequin_rings(0.0), 48, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn profile_is_interpolated() {
        let (w, d) = interpolate(75.0);
        assert_relative_eq!(w, 95.0);
        assert_relative_eq!(d, 40.0);
        let (w, _) = interpolate(1010.0);
        assert_relative_eq!(w, 105.0);
        let (w, _) = interpolate(1425.0);
        assert_relative_eq!(w, 200.0 - 140.0 * 25.0 / 40.0);
    }

    #[test]
    fn ease_widens_every_ring() {
        let plain = mannequin_rings(0.0);
        let eased = mannequin_rings(15.0);
        for (a, b) in plain.iter().zip(&eased) {
            assert_relative_eq!(b.rx - a.rx, 15.0);
            assert_relative_eq!(b.ry - a.ry, 15.0);
        }
    }
}
