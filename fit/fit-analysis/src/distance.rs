//! Signed distance from body points to the garment surface.
//!
//! The garment is indexed once in an immutable k-d tree, which tolerates
//! any number of vertices sharing a coordinate (flat caps, grid-aligned
//! scans). Each body point is matched to its nearest garment vertex; the
//! sign comes from which side of that vertex's normal the body point lies
//! on. This is a local approximation: reliable on smooth regions, noisy at
//! creases and tight folds.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::{Point3, Vector3};
use scan_types::ScanMesh;
use tracing::debug;

use crate::error::{FitError, FitResult};

/// Per-vertex normals as the normalized mean of the unit normals of the
/// incident faces. Vertices with no usable face get +Z.
#[must_use]
pub fn vertex_normals(mesh: &ScanMesh) -> Vec<Vector3<f64>> {
    let mut sums = vec![Vector3::zeros(); mesh.vertices.len()];
    for (face, normal) in mesh.faces.iter().zip(mesh.face_normals()) {
        let Some(normal) = normal else { continue };
        for &i in face {
            sums[i as usize] += normal;
        }
    }
    sums.into_iter()
        .map(|sum| sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z))
        .collect()
}

/// Nearest-vertex index over a garment surface.
///
/// # Example
///
/// ```
/// use fit_analysis::SurfaceIndex;
/// use nalgebra::Point3;
/// use scan_types::{revolve, ProfileRing};
///
/// let rings: Vec<_> = (0..20).map(|i| ProfileRing::circle(f64::from(i) * 10.0, 100.0)).collect();
/// let sleeve = revolve(&rings, 48, false);
/// let index = SurfaceIndex::build(&sleeve).unwrap();
///
/// // Inside the sleeve is positive (room to spare), outside is negative.
/// assert!(index.signed_distance(&Point3::new(80.0, 0.0, 95.0)) > 0.0);
/// assert!(index.signed_distance(&Point3::new(120.0, 0.0, 95.0)) < 0.0);
/// ```
#[derive(Debug)]
pub struct SurfaceIndex {
    tree: ImmutableKdTree<f64, 3>,
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl SurfaceIndex {
    /// Index every vertex of `mesh`.
    ///
    /// # Errors
    ///
    /// [`FitError::EmptyGarment`] if the mesh has no vertices.
    pub fn build(mesh: &ScanMesh) -> FitResult<Self> {
        if mesh.vertices.is_empty() {
            return Err(FitError::EmptyGarment);
        }
        let coords: Vec<[f64; 3]> = mesh
            .vertices
            .iter()
            .map(|v| [v.position.x, v.position.y, v.position.z])
            .collect();
        let tree = ImmutableKdTree::new_from_slice(&coords);
        debug!(vertices = mesh.vertices.len(), "Indexed garment surface");
        Ok(Self {
            tree,
            positions: mesh.positions(),
            normals: vertex_normals(mesh),
        })
    }

    /// Number of indexed vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if nothing is indexed. Never true for a built index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Nearest garment vertex and the (unsigned) distance to it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: items are vertex indices that came from usize
    pub fn nearest(&self, point: &Point3<f64>) -> (usize, f64) {
        let nearest = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[point.x, point.y, point.z]);
        (nearest.item as usize, nearest.distance.sqrt())
    }

    /// Signed distance: positive when `point` is on the inner side of the
    /// nearest garment vertex (against its normal), negative when outside,
    /// zero on the surface or exactly tangent.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        let (i, distance) = self.nearest(point);
        let offset = point - self.positions[i];
        let side = offset.dot(&self.normals[i]);
        if side > 0.0 {
            -distance
        } else if side < 0.0 {
            distance
        } else {
            0.0
        }
    }

    /// [`signed_distance`](Self::signed_distance) for every point.
    #[must_use]
    pub fn signed_distances(&self, points: &[Point3<f64>]) -> Vec<f64> {
        points.iter().map(|p| self.signed_distance(p)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scan_types::{revolve, ProfileRing, Vertex};

    fn cylinder(radius: f64) -> ScanMesh {
        let rings: Vec<_> = (0..30)
            .map(|i| ProfileRing::circle(f64::from(i) * 10.0, radius))
            .collect();
        revolve(&rings, 64, false)
    }

    #[test]
    fn normals_point_outward_on_a_tube() {
        let mesh = cylinder(100.0);
        let normals = vertex_normals(&mesh);
        for (v, n) in mesh.vertices.iter().zip(&normals).skip(64).take(64) {
            let radial = Vector3::new(v.position.x, v.position.y, 0.0).normalize();
            assert!(n.dot(&radial) > 0.95);
        }
    }

    #[test]
    fn isolated_vertex_normal_is_up() {
        let mesh = ScanMesh::from_parts(vec![Vertex::from_coords(1.0, 2.0, 3.0)], vec![]);
        assert_eq!(vertex_normals(&mesh), vec![Vector3::z()]);
    }

    #[test]
    fn sign_follows_side_of_surface() {
        let index = SurfaceIndex::build(&cylinder(100.0)).unwrap();
        let inside = index.signed_distance(&Point3::new(0.0, 70.0, 150.0));
        let outside = index.signed_distance(&Point3::new(0.0, 130.0, 150.0));
        assert_relative_eq!(inside, 30.0, epsilon = 2.0);
        assert_relative_eq!(outside, -30.0, epsilon = 2.0);
    }

    #[test]
    fn same_surface_is_zero_distance() {
        let mesh = cylinder(100.0);
        let index = SurfaceIndex::build(&mesh).unwrap();
        let distances = index.signed_distances(&mesh.positions());
        assert_eq!(distances.len(), mesh.vertices.len());
        assert!(distances.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn flat_patch_with_shared_coordinates() {
        // 20x20 grid at z = 0; every row and column shares one value.
        let vertices: Vec<Vertex> = (0..400u32)
            .map(|i| Vertex::from_coords(f64::from(i % 20) * 10.0, f64::from(i / 20) * 10.0, 0.0))
            .collect();
        let mut faces = Vec::new();
        for row in 0..19u32 {
            for col in 0..19u32 {
                let a = row * 20 + col;
                faces.push([a, a + 1, a + 21]);
                faces.push([a, a + 21, a + 20]);
            }
        }
        let patch = ScanMesh::from_parts(vertices, faces);
        let index = SurfaceIndex::build(&patch).unwrap();
        assert_eq!(index.len(), 400);

        let (nearest, distance) = index.nearest(&Point3::new(52.0, 71.0, 0.0));
        assert_eq!(patch.vertices[nearest].position, Point3::new(50.0, 70.0, 0.0));
        assert_relative_eq!(distance, 5.0f64.sqrt(), epsilon = 1e-9);

        // Normals face +z, so below the patch is inside.
        assert_relative_eq!(index.signed_distance(&Point3::new(90.0, 90.0, -12.0)), 12.0);
        assert_relative_eq!(index.signed_distance(&Point3::new(90.0, 90.0, 12.0)), -12.0);
    }

    #[test]
    fn empty_garment_rejected() {
        assert_eq!(
            SurfaceIndex::build(&ScanMesh::new()).unwrap_err(),
            FitError::EmptyGarment
        );
    }
}
