//! Seam lines from boundary and crease edges.
//!
//! Seams show up on a scan as open edges (hems, waistbands, cut lines) or as
//! creases where the fabric folds over stitching. Candidate edges are
//! chained into polylines, then each polyline is classified by its
//! direction and where it sits on the garment.

use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashSet;
use nalgebra::{Point3, Vector3};
use scan_repair::MeshAdjacency;
use scan_types::ScanMesh;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::{GarmentType, SeamKind};
use crate::params::GarmentParams;

/// A classified seam polyline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Seam {
    /// What the seam is.
    pub kind: SeamKind,
    /// Ordered vertex indices into the garment mesh. A closed loop repeats
    /// its first vertex at the end.
    pub vertices: Vec<u32>,
    /// Polyline length (mm).
    pub length: f64,
    /// First vertex position.
    pub start: Point3<f64>,
    /// Last vertex position.
    pub end: Point3<f64>,
}

impl Seam {
    /// True if the chain returns to its first vertex.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.vertices.len() > 2 && self.vertices.first() == self.vertices.last()
    }
}

/// Vertical extent and center of the garment, shared by every seam
/// classification.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SeamFrame {
    min_z: f64,
    height: f64,
    center: Point3<f64>,
}

impl SeamFrame {
    fn of(mesh: &ScanMesh) -> Self {
        let (min_z, max_z) = mesh
            .vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.position.z), hi.max(v.position.z))
            });
        Self {
            min_z,
            height: max_z - min_z,
            center: mesh.centroid(),
        }
    }

    fn relative_height(&self, z: f64) -> f64 {
        if self.height > 0.0 {
            (z - self.min_z) / self.height
        } else {
            0.0
        }
    }
}

/// Seam candidate edges, sorted: boundary edges plus interior edges whose
/// two faces meet at more than `sharp_angle_deg`.
#[must_use]
pub fn seam_candidates(mesh: &ScanMesh, sharp_angle_deg: f64) -> Vec<(u32, u32)> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let normals = mesh.face_normals();
    let threshold = sharp_angle_deg.to_radians();

    let mut edges = adjacency.boundary_edges();
    let boundary = edges.len();
    edges.extend(
        adjacency
            .interior_edges()
            .into_iter()
            .filter(|(_, [f0, f1])| match (normals[*f0], normals[*f1]) {
                (Some(n0), Some(n1)) => n0.dot(&n1).clamp(-1.0, 1.0).acos() > threshold,
                _ => false,
            })
            .map(|(edge, _)| edge),
    );
    edges.sort_unstable();
    debug!(boundary, sharp = edges.len() - boundary, "Found seam candidate edges");
    edges
}

/// Chain edges into polylines. Each edge is used by exactly one chain;
/// chains start from the first unused edge in input order and grow
/// forward, then backward.
#[must_use]
pub fn trace_chains(edges: &[(u32, u32)]) -> Vec<Vec<u32>> {
    let mut incident: BTreeMap<u32, Vec<(u32, u32)>> = BTreeMap::new();
    for &(a, b) in edges {
        incident.entry(a).or_default().push((a, b));
        incident.entry(b).or_default().push((a, b));
    }

    let mut used: HashSet<(u32, u32)> = HashSet::with_capacity(edges.len());
    let mut chains = Vec::new();

    let next_edge = |from: u32, used: &mut HashSet<(u32, u32)>| -> Option<u32> {
        let edge = incident
            .get(&from)?
            .iter()
            .copied()
            .find(|edge| !used.contains(edge))?;
        used.insert(edge);
        Some(if edge.0 == from { edge.1 } else { edge.0 })
    };

    for &edge in edges {
        if !used.insert(edge) {
            continue;
        }
        let mut chain = VecDeque::from([edge.0, edge.1]);
        while let Some(&tail) = chain.back() {
            match next_edge(tail, &mut used) {
                Some(v) => chain.push_back(v),
                None => break,
            }
        }
        while let Some(&head) = chain.front() {
            match next_edge(head, &mut used) {
                Some(v) => chain.push_front(v),
                None => break,
            }
        }
        chains.push(chain.into_iter().collect());
    }
    chains
}

fn classify_seam(
    points: &[Point3<f64>],
    garment_type: GarmentType,
    frame: &SeamFrame,
    params: &GarmentParams,
) -> SeamKind {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return SeamKind::Unknown;
    };
    #[allow(clippy::cast_precision_loss)]
    let center = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / points.len() as f64;
    let direction = (last - first)
        .try_normalize(1e-6)
        .unwrap_or_else(Vector3::zeros);

    let rel = frame.relative_height(center.z);
    let lateral = center - frame.center.coords;
    let vertical = direction.z.abs() > params.vertical_threshold;
    let horizontal = direction.z.abs() < params.horizontal_threshold;

    match garment_type {
        GarmentType::Pants if vertical => {
            if rel < 0.3 {
                if lateral.x.abs() < 50.0 {
                    SeamKind::Inseam
                } else {
                    SeamKind::Outseam
                }
            } else if rel > 0.7 {
                SeamKind::SideSeam
            } else {
                SeamKind::Unknown
            }
        }
        GarmentType::Pants if horizontal => {
            if rel > 0.9 {
                SeamKind::Waistband
            } else if rel < 0.1 {
                SeamKind::Hem
            } else {
                SeamKind::Crotch
            }
        }
        t if t.is_top() && vertical => {
            if lateral.y.abs() < 30.0 {
                if lateral.y > 0.0 {
                    SeamKind::CenterFront
                } else {
                    SeamKind::CenterBack
                }
            } else {
                SeamKind::SideSeam
            }
        }
        t if t.is_top() && horizontal => {
            if rel > 0.85 {
                SeamKind::Shoulder
            } else if rel < 0.1 {
                SeamKind::Hem
            } else {
                SeamKind::Unknown
            }
        }
        _ => SeamKind::Unknown,
    }
}

/// Find and classify the seams of an oriented garment.
///
/// # Example
///
/// ```
/// use garment_model::{detect_seams, tube, GarmentParams, GarmentType, SeamKind};
///
/// let seams = detect_seams(&tube(600.0, 150.0), GarmentType::Shirt, &GarmentParams::default());
/// assert_eq!(seams.len(), 2);
/// assert!(seams.iter().any(|s| s.kind == SeamKind::Hem));
/// assert!(seams.iter().any(|s| s.kind == SeamKind::Shoulder));
/// ```
#[must_use]
pub fn detect_seams(mesh: &ScanMesh, garment_type: GarmentType, params: &GarmentParams) -> Vec<Seam> {
    if mesh.vertices.is_empty() {
        return Vec::new();
    }
    let frame = SeamFrame::of(mesh);
    let candidates = seam_candidates(mesh, params.sharp_angle_deg);

    let seams: Vec<Seam> = trace_chains(&candidates)
        .into_iter()
        .filter(|chain| chain.len() >= params.min_seam_vertices)
        .filter_map(|vertices| {
            let points: Vec<Point3<f64>> = vertices
                .iter()
                .map(|&i| mesh.vertices[i as usize].position)
                .collect();
            let length = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
            let kind = classify_seam(&points, garment_type, &frame, params);
            Some(Seam {
                kind,
                length,
                start: *points.first()?,
                end: *points.last()?,
                vertices,
            })
        })
        .collect();

    debug!(count = seams.len(), %garment_type, "Traced seams");
    seams
}
