//! Read-only views shared by the scan crates.

use crate::{Aabb, Triangle};

/// Counts and triangles of an indexed mesh.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangles.
    fn face_count(&self) -> usize;

    /// No vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Every face with its corner positions resolved.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types with an axis-aligned extent.
pub trait MeshBounds {
    /// Bounding box; empty without vertices.
    fn bounds(&self) -> Aabb;

    /// Bounding box, `None` without vertices.
    fn bounds_opt(&self) -> Option<Aabb> {
        Some(self.bounds()).filter(|b| !b.is_empty())
    }
}
