//! Hole detection and filling.
//!
//! A hole is a closed loop of boundary edges. Scanners leave small holes
//! under the arms, between the legs and at the crown; large openings
//! (garment necklines, hems) are left alone by the edge-count limit.

use hashbrown::{HashMap, HashSet};
use scan_types::{Point3, ScanMesh, Triangle, Vector3};
use tracing::{debug, warn};

use crate::adjacency::MeshAdjacency;

/// A boundary loop representing a hole in the mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// Ordered list of vertex indices forming the loop.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Trace all closed boundary loops.
///
/// # Example
///
/// ```
/// use scan_types::{ScanMesh, Vertex};
/// use scan_repair::{MeshAdjacency, detect_holes};
///
/// let mesh = ScanMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// let holes = detect_holes(&MeshAdjacency::build(&mesh.faces));
/// assert_eq!(holes.len(), 1);
/// assert_eq!(holes[0].edge_count(), 3);
/// ```
#[must_use]
pub fn detect_holes(adjacency: &MeshAdjacency) -> Vec<BoundaryLoop> {
    let boundary_edges = adjacency.boundary_edges();
    if boundary_edges.is_empty() {
        return Vec::new();
    }

    let mut edge_neighbors: HashMap<u32, Vec<u32>> = HashMap::new();
    for &(a, b) in &boundary_edges {
        edge_neighbors.entry(a).or_default().push(b);
        edge_neighbors.entry(b).or_default().push(a);
    }

    let mut visited: HashSet<u32> = HashSet::new();
    let mut loops = Vec::new();

    for &(start, _) in &boundary_edges {
        if visited.contains(&start) {
            continue;
        }

        let mut loop_vertices = Vec::new();
        let mut current = start;
        let mut prev: Option<u32> = None;
        let mut closed = false;

        loop {
            visited.insert(current);
            loop_vertices.push(current);

            let neighbors = edge_neighbors.get(&current).map_or(&[][..], Vec::as_slice);
            let next = neighbors
                .iter()
                .find(|&&n| Some(n) != prev && !visited.contains(&n))
                .or_else(|| {
                    neighbors
                        .iter()
                        .find(|&&n| n == start && loop_vertices.len() > 2)
                });

            match next {
                Some(&n) if n == start => {
                    closed = true;
                    break;
                }
                Some(&n) => {
                    prev = Some(current);
                    current = n;
                }
                None => break,
            }
        }

        if closed && loop_vertices.len() >= 3 {
            loops.push(BoundaryLoop {
                vertices: loop_vertices,
            });
        } else {
            warn!(start, "Boundary loop is not closed");
        }
    }

    debug!(
        "Detected {} boundary loops, sizes: {:?}",
        loops.len(),
        loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>()
    );
    loops
}

/// Triangulate a hole by ear clipping, falling back to a fan when stuck.
///
/// The loop is traversed in reverse so the new faces wind consistently with
/// the faces around the hole.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fill_hole_ear_clipping(mesh: &ScanMesh, boundary: &BoundaryLoop) -> Vec<[u32; 3]> {
    let n = boundary.vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let order: Vec<u32> = orient_loop(mesh, &boundary.vertices);
    let positions: Vec<Point3<f64>> = order
        .iter()
        .map(|&idx| mesh.vertices[idx as usize].position)
        .collect();

    let centroid = Point3::from(
        positions
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / n as f64,
    );
    let hole_normal = compute_hole_normal(&positions, &centroid);

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            is_ear(
                &positions,
                &remaining,
                remaining[(i + len - 1) % len],
                remaining[i],
                remaining[(i + 1) % len],
                &hole_normal,
            )
        });

        let Some(i) = ear else {
            debug!(remaining = len, "Ear clipping stuck, using fan triangulation");
            break;
        };
        triangles.push([
            order[remaining[(i + len - 1) % len]],
            order[remaining[i]],
            order[remaining[(i + 1) % len]],
        ]);
        remaining.remove(i);
    }

    for i in 1..remaining.len() - 1 {
        triangles.push([
            order[remaining[0]],
            order[remaining[i]],
            order[remaining[i + 1]],
        ]);
    }

    triangles
}

/// Orient the loop so that filled faces share edge direction with the
/// adjacent existing faces (each boundary edge must appear reversed).
fn orient_loop(mesh: &ScanMesh, loop_vertices: &[u32]) -> Vec<u32> {
    let (a, b) = (loop_vertices[0], loop_vertices[1]);
    let existing_has_ab = mesh.faces.iter().any(|f| {
        (0..3).any(|k| f[k] == a && f[(k + 1) % 3] == b)
    });
    if existing_has_ab {
        loop_vertices.iter().rev().copied().collect()
    } else {
        loop_vertices.to_vec()
    }
}

/// Average normal of a hole boundary (Newell-style around the centroid).
fn compute_hole_normal(positions: &[Point3<f64>], centroid: &Point3<f64>) -> Vector3<f64> {
    let n = positions.len();
    let normal = (0..n).fold(Vector3::zeros(), |acc, i| {
        let v0 = positions[i] - centroid;
        let v1 = positions[(i + 1) % n] - centroid;
        acc + v0.cross(&v1)
    });
    normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z)
}

fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    hole_normal: &Vector3<f64>,
) -> bool {
    let (a, b, c) = (positions[prev], positions[curr], positions[next]);

    let Some(tri_normal) = Triangle::new(a, b, c).normal() else {
        return false;
    };
    if tri_normal.dot(hole_normal) < 0.0 {
        return false; // Reflex corner
    }

    remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .all(|&idx| !point_in_triangle_projected(&positions[idx], &a, &b, &c, hole_normal))
}

/// Point-in-triangle test after dropping the axis most aligned with `normal`.
fn point_in_triangle_projected(
    p: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let abs = normal.abs();
    let project = |q: &Point3<f64>| {
        if abs.z >= abs.x && abs.z >= abs.y {
            (q.x, q.y)
        } else if abs.y >= abs.x {
            (q.x, q.z)
        } else {
            (q.y, q.z)
        }
    };
    let (p, a, b, c) = (project(p), project(v0), project(v1), project(v2));

    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    };
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Fill every hole with at most `max_hole_edges` edges.
///
/// Returns `(filled, skipped)` hole counts.
pub fn fill_holes(mesh: &mut ScanMesh, max_hole_edges: usize) -> (usize, usize) {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let holes = detect_holes(&adjacency);

    let (fillable, skipped): (Vec<_>, Vec<_>) = holes
        .into_iter()
        .partition(|hole| hole.edge_count() <= max_hole_edges);

    for hole in &skipped {
        debug!(
            edges = hole.edge_count(),
            max = max_hole_edges,
            "Leaving large opening unfilled"
        );
    }

    let mut filled = 0;
    for hole in &fillable {
        let triangles = fill_hole_ear_clipping(mesh, hole);
        if triangles.is_empty() {
            warn!(edges = hole.edge_count(), "Failed to triangulate hole");
            continue;
        }
        mesh.faces.extend(triangles);
        filled += 1;
    }

    (filled, skipped.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_types::{revolve, MeshTopology, ProfileRing};

    fn open_tube(segments: usize) -> ScanMesh {
        let rings: Vec<_> = (0..5)
            .map(|i| ProfileRing::circle(f64::from(i) * 10.0, 30.0))
            .collect();
        revolve(&rings, segments, false)
    }

    #[test]
    fn open_tube_has_two_loops() {
        let mesh = open_tube(16);
        let holes = detect_holes(&MeshAdjacency::build(&mesh.faces));
        assert_eq!(holes.len(), 2);
        assert!(holes.iter().all(|h| h.edge_count() == 16));
    }

    #[test]
    fn small_holes_are_filled_watertight() {
        let mut mesh = open_tube(16);
        let (filled, skipped) = fill_holes(&mut mesh, 100);
        assert_eq!((filled, skipped), (2, 0));
        assert_eq!(mesh.face_count(), 4 * 16 * 2 + 2 * 14);
        assert!(MeshAdjacency::build(&mesh.faces).is_watertight());
    }

    #[test]
    fn filled_faces_point_outward() {
        let mut mesh = open_tube(12);
        let before = mesh.face_count();
        fill_holes(&mut mesh, 100);
        let center = mesh.centroid();
        for tri in mesh.triangles().skip(before) {
            let Some(n) = tri.normal() else { continue };
            assert!(n.dot(&(tri.v0 - center)) > 0.0);
        }
    }

    #[test]
    fn large_openings_are_skipped() {
        let mut mesh = open_tube(24);
        let before = mesh.face_count();
        let (filled, skipped) = fill_holes(&mut mesh, 20);
        assert_eq!((filled, skipped), (0, 2));
        assert_eq!(mesh.face_count(), before);
    }
}
