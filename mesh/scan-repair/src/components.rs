//! Connected components.
//!
//! Raw scans carry floating noise islands (dust, turntable fragments, stray
//! hair). Faces are connected when they share a vertex.

use hashbrown::HashMap;
use scan_types::ScanMesh;
use tracing::debug;

/// Disjoint-set forest with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    /// Create `n` singleton sets.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]]; // Path compression
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// Number of distinct sets.
    pub fn set_count(&mut self) -> usize {
        (0..self.parent.len()).filter(|&i| self.find(i) == i).count()
    }
}

/// Group faces into connected components.
///
/// Each component is a list of face indices; components are ordered by
/// face count, largest first (ties by lowest face index).
#[must_use]
pub fn find_components(mesh: &ScanMesh) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(mesh.vertices.len());
    for face in &mesh.faces {
        uf.union(face[0] as usize, face[1] as usize);
        uf.union(face[1] as usize, face[2] as usize);
    }

    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, face) in mesh.faces.iter().enumerate() {
        by_root.entry(uf.find(face[0] as usize)).or_default().push(i);
    }

    let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
    components.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
    components
}

/// Keep only the largest connected component.
///
/// Returns the total number of components found (0 for an empty mesh).
/// Vertices no longer referenced are dropped.
pub fn keep_largest_component(mesh: &mut ScanMesh) -> usize {
    let components = find_components(mesh);
    let count = components.len();
    if count <= 1 {
        return count;
    }

    let keep: Vec<[u32; 3]> = components[0].iter().map(|&i| mesh.faces[i]).collect();
    debug!(
        components = count,
        kept_faces = keep.len(),
        dropped_faces = mesh.faces.len() - keep.len(),
        "Dropping small components"
    );
    mesh.faces = keep;
    remove_unreferenced_vertices(mesh);
    count
}

/// Remove vertices not referenced by any face, remapping face indices.
///
/// Returns the number of vertices removed.
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32
pub fn remove_unreferenced_vertices(mesh: &mut ScanMesh) -> usize {
    let original = mesh.vertices.len();
    let mut remap: Vec<Option<u32>> = vec![None; original];
    for face in &mesh.faces {
        for &v in face {
            remap[v as usize] = Some(0);
        }
    }

    let mut next = 0u32;
    let mut vertices = Vec::with_capacity(original);
    for (old, slot) in remap.iter_mut().enumerate() {
        if slot.is_some() {
            *slot = Some(next);
            vertices.push(mesh.vertices[old]);
            next += 1;
        }
    }
    if vertices.len() == original {
        return 0;
    }

    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            *v = remap[*v as usize].unwrap_or(*v);
        }
    }
    mesh.vertices = vertices;
    original - mesh.vertices.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_types::{revolve, MeshTopology, ProfileRing, Vector3};

    fn tube(radius: f64, rings: u32) -> ScanMesh {
        let profile: Vec<_> = (0..rings)
            .map(|i| ProfileRing::circle(f64::from(i) * 10.0, radius))
            .collect();
        revolve(&profile, 12, true)
    }

    #[test]
    fn union_find_merges() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(3, 4);
        uf.union(1, 4);
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(0), uf.find(2));
        assert_eq!(uf.set_count(), 2);
    }

    #[test]
    fn largest_component_survives() {
        let mut mesh = tube(50.0, 10);
        let big_faces = mesh.face_count();
        let big_vertices = mesh.vertex_count();
        let mut noise = tube(2.0, 2);
        noise.translate(Vector3::new(500.0, 0.0, 0.0));
        mesh.merge(&noise);

        let found = keep_largest_component(&mut mesh);
        assert_eq!(found, 2);
        assert_eq!(mesh.face_count(), big_faces);
        assert_eq!(mesh.vertex_count(), big_vertices);
        assert!(mesh.first_invalid_face().is_none());
    }

    #[test]
    fn single_component_untouched() {
        let mut mesh = tube(50.0, 4);
        let before = mesh.clone();
        assert_eq!(keep_largest_component(&mut mesh), 1);
        assert_eq!(mesh, before);
    }

    #[test]
    fn unreferenced_vertices_are_compacted() {
        let mut mesh = tube(50.0, 3);
        mesh.vertices.insert(0, scan_types::Vertex::from_coords(9.0, 9.0, 9.0));
        for face in &mut mesh.faces {
            for v in face.iter_mut() {
                *v += 1;
            }
        }
        assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
        assert!(mesh.first_invalid_face().is_none());
    }
}
