//! Summary statistics for a loaded scan.

use scan_repair::MeshAdjacency;
use scan_types::{MeshBounds, Point3, ScanMesh, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::units::LengthUnit;

/// Quick facts about a scan, used for inspection and health checks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshStats {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of faces.
    pub face_count: usize,
    /// Bounding-box minimum corner.
    pub min: Point3<f64>,
    /// Bounding-box maximum corner.
    pub max: Point3<f64>,
    /// Bounding-box center.
    pub center: Point3<f64>,
    /// Bounding-box size.
    pub dimensions: Vector3<f64>,
    /// Every edge is shared by exactly two faces.
    pub watertight: bool,
    /// Every vertex carries a normal.
    pub has_normals: bool,
    /// Unit guessed from the largest extent.
    pub detected_unit: LengthUnit,
}

impl MeshStats {
    /// Gather statistics for `mesh`.
    #[must_use]
    pub fn compute(mesh: &ScanMesh) -> Self {
        let bounds = mesh.bounds_opt();
        let (min, max) = bounds.map_or((Point3::origin(), Point3::origin()), |b| (b.min, b.max));
        Self {
            vertex_count: mesh.vertices.len(),
            face_count: mesh.faces.len(),
            min,
            max,
            center: nalgebra::center(&min, &max),
            dimensions: max - min,
            watertight: !mesh.faces.is_empty()
                && MeshAdjacency::build(&mesh.faces).is_watertight(),
            has_normals: !mesh.vertices.is_empty()
                && mesh.vertices.iter().all(|v| v.normal.is_some()),
            detected_unit: LengthUnit::detect_mesh(mesh),
        }
    }
}

impl std::fmt::Display for MeshStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} vertices, {} faces, {:.1} × {:.1} × {:.1} ({}), {}",
            self.vertex_count,
            self.face_count,
            self.dimensions.x,
            self.dimensions.y,
            self.dimensions.z,
            self.detected_unit,
            if self.watertight { "watertight" } else { "open" }
        )
    }
}
