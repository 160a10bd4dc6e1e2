//! Principal Component Analysis of vertex clouds.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

/// Result of PCA computation on a point cloud.
///
/// Axes are sorted by variance, largest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcaResult {
    /// Mean of the input points.
    pub centroid: Point3<f64>,
    /// Principal axes (unit eigenvectors); `axes[0]` has maximum variance.
    /// Each axis points so that its largest component is positive.
    pub axes: [Vector3<f64>; 3],
    /// Variances along each axis, sorted descending.
    pub eigenvalues: [f64; 3],
}

impl PcaResult {
    /// Direction of maximum variance.
    #[must_use]
    pub const fn primary_axis(&self) -> Vector3<f64> {
        self.axes[0]
    }

    /// Direction of second-most variance.
    #[must_use]
    pub const fn secondary_axis(&self) -> Vector3<f64> {
        self.axes[1]
    }

    /// Direction of minimum variance.
    #[must_use]
    pub const fn tertiary_axis(&self) -> Vector3<f64> {
        self.axes[2]
    }

    /// True if all variance is (numerically) zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.eigenvalues[0] < f64::EPSILON
    }

    /// True if the two largest variances are too close to tell the long
    /// axis apart: `eigenvalues[1] / eigenvalues[0] >= ratio`.
    #[must_use]
    pub fn is_ambiguous(&self, ratio: f64) -> bool {
        self.is_degenerate() || self.eigenvalues[1] / self.eigenvalues[0] >= ratio
    }

    /// Rotation taking the secondary axis to X, tertiary to Y and primary to
    /// Z. Always a proper rotation (determinant +1).
    #[must_use]
    pub fn to_z_up_rotation(&self) -> Matrix3<f64> {
        let mut rotation = Matrix3::from_rows(&[
            self.axes[1].transpose(),
            self.axes[2].transpose(),
            self.axes[0].transpose(),
        ]);
        if rotation.determinant() < 0.0 {
            let flipped = -rotation.row(1);
            rotation.set_row(1, &flipped);
        }
        rotation
    }
}

/// Compute PCA of a point set.
///
/// Returns `None` for fewer than 3 points.
///
/// # Example
///
/// ```
/// use scan_orient::pca_points;
/// use nalgebra::Point3;
///
/// let points: Vec<_> = (0..20)
///     .map(|i| Point3::new(f64::from(i), f64::from(i % 3) * 0.1, f64::from(i % 2) * 0.05))
///     .collect();
/// let pca = pca_points(&points).unwrap();
/// assert!(pca.primary_axis().x.abs() > 0.99);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
// Precision loss: vertex counts beyond 2^52 are unsupported
pub fn pca_points(points: &[Point3<f64>]) -> Option<PcaResult> {
    if points.len() < 3 {
        return None;
    }

    let count = points.len() as f64;
    let centroid = Point3::from(
        points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / count,
    );

    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p - centroid;
        acc + d * d.transpose()
    }) / count;

    let eigen = SymmetricEigen::new(covariance);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let axes = order.map(|i| {
        let axis: Vector3<f64> = eigen.eigenvectors.column(i).into_owned();
        let axis = axis.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        // Eigenvector signs are arbitrary; pin them so near-upright scans
        // keep their orientation.
        if axis[axis.iamax()] < 0.0 {
            -axis
        } else {
            axis
        }
    });
    let eigenvalues = order.map(|i| eigen.eigenvalues[i].max(0.0));

    Some(PcaResult {
        centroid,
        axes,
        eigenvalues,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn slab() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for i in 0..10 {
            for j in 0..5 {
                for k in 0..2 {
                    points.push(Point3::new(
                        f64::from(j) * 10.0,
                        f64::from(k),
                        f64::from(i) * 100.0,
                    ));
                }
            }
        }
        points
    }

    #[test]
    fn axes_sorted_by_variance() {
        let pca = pca_points(&slab()).unwrap();
        assert!(pca.primary_axis().z.abs() > 0.999);
        assert!(pca.secondary_axis().x.abs() > 0.999);
        assert!(pca.tertiary_axis().y.abs() > 0.999);
        assert!(pca.eigenvalues[0] >= pca.eigenvalues[1]);
        assert!(pca.eigenvalues[1] >= pca.eigenvalues[2]);
    }

    #[test]
    fn rotation_is_proper() {
        let pca = pca_points(&slab()).unwrap();
        let r = pca.to_z_up_rotation();
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-9);
        let up = r * pca.primary_axis();
        assert_relative_eq!(up.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn axis_signs_are_canonical() {
        let pca = pca_points(&slab()).unwrap();
        assert!(pca.primary_axis().z > 0.999);
        assert!(pca.secondary_axis().x > 0.999);
        assert!(pca.tertiary_axis().y > 0.999);
        assert_relative_eq!(pca.to_z_up_rotation(), Matrix3::identity(), epsilon = 1e-9);
    }

    #[test]
    fn too_few_points() {
        assert!(pca_points(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).is_none());
    }

    #[test]
    fn identical_points_are_degenerate() {
        let pca = pca_points(&[Point3::new(1.0, 1.0, 1.0); 5]).unwrap();
        assert!(pca.is_degenerate());
        assert!(pca.is_ambiguous(0.98));
    }
}
