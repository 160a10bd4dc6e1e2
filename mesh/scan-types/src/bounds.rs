//! Axis-aligned bounding box of a scan.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bounding box of a point set. Unit detection reads its largest extent and
/// landmark detection its height.
///
/// # Example
///
/// ```
/// use scan_types::{Aabb, Point3};
///
/// let corners = [Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 20.0, 30.0)];
/// let aabb = Aabb::from_points(corners.iter());
///
/// assert!((aabb.height() - 30.0).abs() < 1e-12);
/// assert!((aabb.max_extent() - 30.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Inverted box containing nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::from(Vector3::repeat(f64::INFINITY)),
            max: Point3::from(Vector3::repeat(f64::NEG_INFINITY)),
        }
    }

    /// Smallest box holding every point; [`Aabb::empty`] for none.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        points.fold(Self::empty(), |aabb, p| Self {
            min: aabb.min.inf(p),
            max: aabb.max.sup(p),
        })
    }

    /// True when no point has been added.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extent along each axis, zero for an empty box.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Vertical extent.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.size().z
    }

    /// Largest extent over the three axes.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.size().max()
    }
}
