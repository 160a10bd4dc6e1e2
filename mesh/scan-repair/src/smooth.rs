//! Laplacian smoothing.
//!
//! Each iteration moves every free vertex toward the centroid of its edge
//! neighbors:
//!
//! ```text
//! v_new = v + lambda * (centroid(N(v)) - v)
//! ```
//!
//! Boundary vertices stay pinned so open garment edges keep their length.

use scan_types::{ScanMesh, Vector3};

use crate::adjacency::{vertex_neighbors, MeshAdjacency};

/// Run `iterations` rounds of Laplacian smoothing in place.
///
/// Returns the largest single-vertex displacement over all iterations.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
// Truncation: mesh indices are u32
pub fn smooth_laplacian(mesh: &mut ScanMesh, iterations: u32, lambda: f64) -> f64 {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() || iterations == 0 {
        return 0.0;
    }

    let neighbors = vertex_neighbors(&mesh.faces);
    let pinned = MeshAdjacency::build(&mesh.faces).boundary_vertices();
    let mut max_displacement = 0.0_f64;

    for _ in 0..iterations {
        let displacements: Vec<Vector3<f64>> = mesh
            .vertices
            .iter()
            .enumerate()
            .map(|(i, vertex)| {
                let idx = i as u32;
                if pinned.contains(&idx) {
                    return Vector3::zeros();
                }
                match neighbors.get(&idx) {
                    Some(ns) if !ns.is_empty() => {
                        let sum: Vector3<f64> = ns
                            .iter()
                            .map(|&n| mesh.vertices[n as usize].position.coords)
                            .sum();
                        let centroid = sum / ns.len() as f64;
                        (centroid - vertex.position.coords) * lambda
                    }
                    _ => Vector3::zeros(),
                }
            })
            .collect();

        for (vertex, d) in mesh.vertices.iter_mut().zip(&displacements) {
            max_displacement = max_displacement.max(d.norm());
            vertex.position.coords += d;
        }
    }

    max_displacement
}
