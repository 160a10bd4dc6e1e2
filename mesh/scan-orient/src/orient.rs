//! Canonical orientation of body and garment scans.
//!
//! Both scans are centered on their vertex mean and rotated so the direction
//! of greatest extent becomes +Z. Bodies additionally get an up/down check:
//! the narrower end is taken to be the feet.

use nalgebra::{Matrix3, Vector3};
use scan_types::ScanMesh;
use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::pca::pca_points;

/// Why PCA could not establish a principal axis.
///
/// Never returned as an error: orientation falls back to identity and the
/// reason is recorded in [`OrientReport::fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlignmentFailure {
    /// Fewer than three vertices.
    #[error("too few vertices for principal axis analysis")]
    TooFewVertices,

    /// All vertices coincide.
    #[error("vertex cloud has zero variance")]
    ZeroVariance,

    /// The two largest variances are nearly equal (e.g. a sphere).
    #[error("no dominant axis (near-isotropic vertex cloud)")]
    NoDominantAxis,
}

/// Tuning for [`orient_body_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrientParams {
    /// Fraction of vertices (by height) compared at each end for the
    /// up/down check. Default: 0.1.
    pub end_fraction: f64,

    /// Ratio of second to first eigenvalue at or above which the cloud is
    /// treated as having no dominant axis. Default: 0.98.
    pub isotropy_ratio: f64,
}

impl Default for OrientParams {
    fn default() -> Self {
        Self {
            end_fraction: 0.1,
            isotropy_ratio: 0.98,
        }
    }
}

impl OrientParams {
    /// Sets the end fraction.
    #[must_use]
    pub const fn with_end_fraction(mut self, fraction: f64) -> Self {
        self.end_fraction = fraction;
        self
    }

    /// Sets the isotropy ratio.
    #[must_use]
    pub const fn with_isotropy_ratio(mut self, ratio: f64) -> Self {
        self.isotropy_ratio = ratio;
        self
    }
}

/// What orientation did to a mesh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientReport {
    /// Translation applied before rotating (negated original centroid).
    pub translation: Vector3<f64>,
    /// Total rotation applied, including any flip.
    pub rotation: Matrix3<f64>,
    /// True if the mesh was turned upside down.
    pub flipped: bool,
    /// Set when PCA failed and the rotation is identity.
    pub fallback: Option<AlignmentFailure>,
    /// Human-readable processing log.
    pub log: Vec<String>,
}

impl OrientReport {
    fn centered(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation: Matrix3::identity(),
            flipped: false,
            fallback: None,
            log: vec![format!(
                "Centered mesh at origin (shifted by [{:.1}, {:.1}, {:.1}])",
                translation.x, translation.y, translation.z
            )],
        }
    }
}

/// Orient a body scan with default parameters.
///
/// See [`orient_body_with`].
pub fn orient_body(mesh: &mut ScanMesh) -> OrientReport {
    orient_body_with(mesh, &OrientParams::default())
}

/// Center, align the principal axis with +Z, then make sure the feet are
/// at the bottom.
///
/// The horizontal spread of the lowest and highest `end_fraction` of
/// vertices is compared; if the bottom is wider the mesh is rotated 180°
/// about Y.
///
/// # Example
///
/// ```
/// use scan_orient::orient_body;
/// use scan_types::{revolve, ProfileRing};
///
/// let rings: Vec<_> = (0..10)
///     .map(|i| ProfileRing::circle(f64::from(i) * 150.0, 40.0 + f64::from(i) * 15.0))
///     .collect();
/// let mut mesh = revolve(&rings, 24, true);
/// let report = orient_body(&mut mesh);
/// assert!(report.fallback.is_none());
/// assert!(mesh.centroid().coords.norm() < 1e-6);
/// ```
pub fn orient_body_with(mesh: &mut ScanMesh, params: &OrientParams) -> OrientReport {
    let mut report = center_and_align(mesh, params);
    if report.fallback.is_some() {
        return report;
    }

    let (bottom, top) = end_spreads(mesh, params.end_fraction);
    debug!(bottom, top, "Horizontal spread at mesh ends");
    if bottom > top {
        let flip = Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0);
        mesh.rotate(&flip);
        report.rotation = flip * report.rotation;
        report.flipped = true;
        report.log.push("Flipped mesh (was upside down)".to_string());
    }

    info!(flipped = report.flipped, "Oriented body scan");
    report
}

/// Center and align a garment scan. No up/down check is made; the hint
/// only documents what the caller expects downstream.
pub fn orient_garment(mesh: &mut ScanMesh, garment_type_hint: Option<&str>) -> OrientReport {
    let report = center_and_align(mesh, &OrientParams::default());
    info!(hint = garment_type_hint.unwrap_or("auto"), "Oriented garment scan");
    report
}

fn center_and_align(mesh: &mut ScanMesh, params: &OrientParams) -> OrientReport {
    let translation = -mesh.centroid().coords;
    mesh.translate(translation);
    let mut report = OrientReport::centered(translation);

    let pca = match pca_points(&mesh.positions()) {
        None => Err(AlignmentFailure::TooFewVertices),
        Some(pca) if pca.is_degenerate() => Err(AlignmentFailure::ZeroVariance),
        Some(pca) if pca.is_ambiguous(params.isotropy_ratio) => {
            Err(AlignmentFailure::NoDominantAxis)
        }
        Some(pca) => Ok(pca),
    };

    match pca {
        Ok(pca) => {
            let rotation = pca.to_z_up_rotation();
            mesh.rotate(&rotation);
            report.rotation = rotation;
            report
                .log
                .push("Aligned principal axis with Z (height)".to_string());
        }
        Err(reason) => {
            warn!(%reason, "Principal axis undefined, keeping original orientation");
            report.log.push(format!("Kept original orientation: {reason}"));
            report.fallback = Some(reason);
        }
    }
    report
}

/// Pooled standard deviation of the X and Y coordinates of the lowest and
/// highest `fraction` of vertices, as `(bottom, top)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
// Truncation: fraction is in (0, 1], the product fits in usize
fn end_spreads(mesh: &ScanMesh, fraction: f64) -> (f64, f64) {
    let mut order: Vec<usize> = (0..mesh.vertices.len()).collect();
    order.sort_by(|&a, &b| {
        mesh.vertices[a]
            .position
            .z
            .total_cmp(&mesh.vertices[b].position.z)
    });

    let n = order.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let k = ((n as f64 * fraction).ceil() as usize).clamp(1, n);
    let spread = |indices: &[usize]| {
        let values: Vec<f64> = indices
            .iter()
            .flat_map(|&i| {
                let p = mesh.vertices[i].position;
                [p.x, p.y]
            })
            .collect();
        if values.is_empty() {
            return 0.0;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        var.sqrt()
    };

    (spread(&order[..k]), spread(&order[n - k..]))
}
