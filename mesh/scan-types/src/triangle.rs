//! Triangle with resolved vertex positions.

use nalgebra::{Point3, Vector3};

/// One mesh face with its corner positions resolved. Only its normal is
/// used: for vertex normals, orientation checks and hole-fill winding.
///
/// # Example
///
/// ```
/// use scan_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     Point3::new(0.0, 4.0, 0.0),
/// );
/// let n = tri.normal().unwrap();
/// assert!((n.z - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Corners in winding order.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal by the right-hand rule over `v0, v1, v2`; `None` when
    /// the corners are (nearly) collinear.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        (self.v1 - self.v0)
            .cross(&(self.v2 - self.v0))
            .try_normalize(f64::EPSILON.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_follows_ccw_winding() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let n = tri.normal();
        assert!(n.is_some());
        assert_relative_eq!(n.map_or(0.0, |n| n.z), 1.0);
    }

    #[test]
    fn collinear_corners_have_no_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.normal().is_none());
    }
}
