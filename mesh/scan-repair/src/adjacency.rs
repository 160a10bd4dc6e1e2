//! Mesh adjacency data structures.
//!
//! Provides lookups for edge-to-face and vertex-to-face relationships.

use hashbrown::{HashMap, HashSet};

/// Adjacency information for a mesh.
///
/// Edges are stored undirected as `(min, max)` vertex pairs.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    /// Maps edge (v0, v1) to list of face indices. v0 < v1.
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
    /// Maps vertex index to list of face indices.
    vertex_to_faces: HashMap<u32, Vec<usize>>,
}

impl MeshAdjacency {
    /// Build adjacency information from a list of faces.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_repair::MeshAdjacency;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let adj = MeshAdjacency::build(&faces);
    ///
    /// assert_eq!(adj.boundary_edges().len(), 4);
    /// assert_eq!(adj.faces_for_edge(2, 1), Some(&[0, 1][..]));
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        let mut vertex_to_faces: HashMap<u32, Vec<usize>> = HashMap::new();

        for (face_idx, face) in faces.iter().enumerate() {
            for &v in face {
                vertex_to_faces.entry(v).or_default().push(face_idx);
            }

            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                edge_to_faces
                    .entry(normalize_edge(a, b))
                    .or_default()
                    .push(face_idx);
            }
        }

        Self {
            edge_to_faces,
            vertex_to_faces,
        }
    }

    /// Faces adjacent to an edge, `None` if the edge doesn't exist.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces
            .get(&normalize_edge(v0, v1))
            .map(Vec::as_slice)
    }

    /// Faces adjacent to a vertex; empty if the vertex is unreferenced.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[usize] {
        self.vertex_to_faces.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Edges with exactly one adjacent face, sorted.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let mut edges: Vec<_> = self
            .edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Edges shared by exactly two faces, sorted, with both face indices.
    #[must_use]
    pub fn interior_edges(&self) -> Vec<((u32, u32), [usize; 2])> {
        let mut edges: Vec<_> = self
            .edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 2)
            .map(|(&edge, faces)| (edge, [faces[0], faces[1]]))
            .collect();
        edges.sort_unstable_by_key(|(edge, _)| *edge);
        edges
    }

    /// Vertices touching at least one boundary edge.
    #[must_use]
    pub fn boundary_vertices(&self) -> HashSet<u32> {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .flat_map(|(&(a, b), _)| [a, b])
            .collect()
    }

    /// Check if the mesh is watertight (no boundary edges).
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() >= 2)
    }

    /// Total number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }
}

/// Normalize an edge so the smaller vertex index comes first.
#[inline]
#[must_use]
pub const fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

/// Map each vertex to its distinct edge neighbors.
#[must_use]
pub fn vertex_neighbors(faces: &[[u32; 3]]) -> HashMap<u32, Vec<u32>> {
    let mut neighbors: HashMap<u32, HashSet<u32>> = HashMap::new();

    for face in faces {
        for i in 0..3 {
            let v = face[i];
            let entry = neighbors.entry(v).or_default();
            entry.insert(face[(i + 1) % 3]);
            entry.insert(face[(i + 2) % 3]);
        }
    }

    neighbors
        .into_iter()
        .map(|(k, v)| {
            let mut list: Vec<u32> = v.into_iter().collect();
            list.sort_unstable();
            (k, list)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Vec<[u32; 3]> {
        vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]
    }

    #[test]
    fn closed_tetrahedron_is_watertight() {
        let adj = MeshAdjacency::build(&tetrahedron());
        assert!(adj.is_watertight());
        assert_eq!(adj.edge_count(), 6);
        assert!(adj.boundary_edges().is_empty());
        assert_eq!(adj.interior_edges().len(), 6);
    }

    #[test]
    fn open_tetrahedron_has_boundary() {
        let mut faces = tetrahedron();
        faces.pop();
        let adj = MeshAdjacency::build(&faces);
        assert!(!adj.is_watertight());
        assert_eq!(adj.boundary_edges(), vec![(0, 2), (0, 3), (2, 3)]);
        assert_eq!(adj.boundary_vertices().len(), 3);
    }

    #[test]
    fn vertex_faces_lookup() {
        let adj = MeshAdjacency::build(&tetrahedron());
        assert_eq!(adj.faces_for_vertex(3).len(), 3);
        assert!(adj.faces_for_vertex(99).is_empty());
        assert!(adj.faces_for_edge(0, 99).is_none());
    }

    #[test]
    fn neighbors_are_distinct() {
        let n = vertex_neighbors(&tetrahedron());
        assert_eq!(n.get(&0), Some(&vec![1, 2, 3]));
    }
}
