//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use nalgebra::{Matrix3, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh holding one scan.
///
/// Faces reference vertices by index. Every face index must be smaller
/// than `vertices.len()`; loaders check this before handing a mesh out.
/// Cleaning and orientation mutate the mesh in place.
///
/// # Example
///
/// ```
/// use scan_types::{ScanMesh, Vertex, MeshTopology};
///
/// let mesh = ScanMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl ScanMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Index of the first face that references a missing vertex, if any.
    #[must_use]
    pub fn first_invalid_face(&self) -> Option<usize> {
        let n = self.vertices.len();
        self.faces
            .iter()
            .position(|face| face.iter().any(|&i| i as usize >= n))
    }

    /// Vertex positions in index order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Mean of all vertex positions (not the bounding-box center).
    ///
    /// Returns the origin for an empty mesh.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision loss only matters beyond 2^52 vertices
    pub fn centroid(&self) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.position.coords);
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Apply a rotation matrix about the origin to positions and normals.
    pub fn rotate(&mut self, rotation: &Matrix3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position = Point3::from(rotation * vertex.position.coords);
            if let Some(ref mut normal) = vertex.normal {
                *normal = rotation * *normal;
            }
        }
    }

    /// Unit normal of each face; degenerate faces get `None`.
    #[must_use]
    pub fn face_normals(&self) -> Vec<Option<Vector3<f64>>> {
        self.triangles().map(|t| t.normal()).collect()
    }

    /// Append another mesh, offsetting its face indices.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    pub fn merge(&mut self, other: &Self) {
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().copied());
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + vertex_offset, f[1] + vertex_offset, f[2] + vertex_offset]),
        );
    }

    fn resolve(&self, [i0, i1, i2]: [u32; 3]) -> Triangle {
        Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        }
    }
}

impl MeshTopology for ScanMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().map(|&f| self.resolve(f))
    }
}

impl MeshBounds for ScanMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_mesh() -> ScanMesh {
        ScanMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(3.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 3.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let mesh = triangle_mesh();
        let c = mesh.centroid();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert_relative_eq!(c.z, 0.0);
    }

    #[test]
    fn invalid_face_is_reported() {
        let mut mesh = triangle_mesh();
        assert!(mesh.first_invalid_face().is_none());
        mesh.faces.push([0, 1, 7]);
        assert_eq!(mesh.first_invalid_face(), Some(1));
    }

    #[test]
    fn rotate_turns_normals_too() {
        let mut mesh = triangle_mesh();
        mesh.vertices[0].normal = Some(Vector3::x());
        // 90 degrees about Z: x -> y
        let rot = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        mesh.rotate(&rot);
        let p = mesh.vertices[1].position;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
        let ny = mesh.vertices[0].normal.map_or(0.0, |n| n.y);
        assert_relative_eq!(ny, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn merge_offsets_indices() {
        let mut a = triangle_mesh();
        let b = triangle_mesh();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.faces[1], [3, 4, 5]);
    }

    #[test]
    fn translate_and_scale() {
        let mut mesh = triangle_mesh();
        mesh.translate(Vector3::new(1.0, 2.0, 3.0));
        mesh.scale(2.0);
        let p = mesh.vertices[0].position;
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 4.0);
        assert_relative_eq!(p.z, 6.0);
    }
}
