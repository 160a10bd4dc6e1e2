//! Surface-of-revolution builder.
//!
//! Synthetic bodies and garments in tests and demos are stacks of
//! elliptical rings. Every vertex of a ring sits exactly at the ring height.

use crate::{ScanMesh, Vertex};
use nalgebra::Point3;
use std::f64::consts::TAU;

/// One elliptical ring of a revolved profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRing {
    /// Ring height.
    pub z: f64,
    /// Semi-axis along X.
    pub rx: f64,
    /// Semi-axis along Y.
    pub ry: f64,
    /// Ring center X.
    pub cx: f64,
    /// Ring center Y.
    pub cy: f64,
}

impl ProfileRing {
    /// Circular ring centered on the Z axis.
    #[must_use]
    pub const fn circle(z: f64, radius: f64) -> Self {
        Self::ellipse(z, radius, radius)
    }

    /// Elliptical ring centered on the Z axis.
    #[must_use]
    pub const fn ellipse(z: f64, rx: f64, ry: f64) -> Self {
        Self {
            z,
            rx,
            ry,
            cx: 0.0,
            cy: 0.0,
        }
    }

    /// Move the ring center.
    #[must_use]
    pub const fn with_center(mut self, cx: f64, cy: f64) -> Self {
        self.cx = cx;
        self.cy = cy;
        self
    }
}

/// Build a tube through `rings` (ordered by ascending `z`) with `segments`
/// vertices per ring. Outward-facing CCW winding. With `caps`, both ends are
/// closed with a fan around a center vertex.
///
/// Returns an empty mesh for fewer than two rings or three segments.
///
/// # Example
///
/// ```
/// use scan_types::{revolve, ProfileRing, MeshTopology};
///
/// let rings: Vec<_> = (0..5).map(|i| ProfileRing::circle(f64::from(i) * 10.0, 5.0)).collect();
/// let tube = revolve(&rings, 16, true);
/// assert_eq!(tube.vertex_count(), 5 * 16 + 2);
/// assert_eq!(tube.face_count(), 4 * 16 * 2 + 2 * 16);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
// Truncation: fixture sizes are far below u32::MAX
pub fn revolve(rings: &[ProfileRing], segments: usize, caps: bool) -> ScanMesh {
    if rings.len() < 2 || segments < 3 {
        return ScanMesh::new();
    }

    let step = TAU / segments as f64;
    let mut mesh = ScanMesh::with_capacity(rings.len() * segments + 2, rings.len() * segments * 2);

    for ring in rings {
        for j in 0..segments {
            let theta = j as f64 * step;
            mesh.vertices.push(Vertex::new(Point3::new(
                ring.rx.mul_add(theta.cos(), ring.cx),
                ring.ry.mul_add(theta.sin(), ring.cy),
                ring.z,
            )));
        }
    }

    let idx = |ring: usize, seg: usize| (ring * segments + seg % segments) as u32;
    for i in 0..rings.len() - 1 {
        for j in 0..segments {
            let a = idx(i, j);
            let b = idx(i, j + 1);
            let c = idx(i + 1, j);
            let d = idx(i + 1, j + 1);
            mesh.faces.push([a, b, d]);
            mesh.faces.push([a, d, c]);
        }
    }

    if caps {
        let last = rings.len() - 1;
        let bottom = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex::new(Point3::new(
            rings[0].cx,
            rings[0].cy,
            rings[0].z,
        )));
        let top = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex::new(Point3::new(
            rings[last].cx,
            rings[last].cy,
            rings[last].z,
        )));
        for j in 0..segments {
            mesh.faces.push([bottom, idx(0, j + 1), idx(0, j)]);
            mesh.faces.push([top, idx(last, j), idx(last, j + 1)]);
        }
    }

    mesh
}
