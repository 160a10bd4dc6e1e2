//! Vertex type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: a position plus an optional unit normal.
///
/// Scanners that export per-vertex normals (PLY `nx/ny/nz`, OBJ `vn`)
/// populate `normal`; STL never does.
///
/// # Example
///
/// ```
/// use scan_types::{Vertex, Point3, Vector3};
///
/// let v = Vertex::with_normal(Point3::new(1.0, 2.0, 3.0), Vector3::z());
/// assert_eq!(v.normal, Some(Vector3::z()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position in 3D space.
    pub position: Point3<f64>,
    /// Per-vertex normal, if the source provided one.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Create a vertex without a normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a vertex with a normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from(coords: [f64; 3]) -> Self {
        Self::from_coords(coords[0], coords[1], coords[2])
    }
}
