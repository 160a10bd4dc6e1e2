//! Pattern pieces: garment regions flattened to the plane.
//!
//! Regions are chosen per garment type from simple position rules, then
//! projected onto their two principal axes. This is a planar projection,
//! not a true unwrap, so curved pieces lose some area.

use nalgebra::{Point2, Point3};
use scan_orient::pca_points;
use scan_section::{convex_hull, polygon_area};
use scan_types::ScanMesh;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::GarmentType;
use crate::params::GarmentParams;

/// One region of the garment laid flat.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternPiece {
    /// Piece name, e.g. `front_left_leg`.
    pub name: String,
    /// Seams bordering the piece.
    pub seams: Vec<String>,
    /// Garment vertex indices in the piece.
    pub vertex_indices: Vec<u32>,
    /// Flattened position of each vertex, same order as `vertex_indices`.
    pub flattened: Vec<Point2<f64>>,
    /// Garment faces whose three vertices all lie in the piece.
    pub faces: Vec<[u32; 3]>,
    /// Convex outline of the flattened piece, counter-clockwise.
    pub boundary: Vec<Point2<f64>>,
    /// Outline area (mm²).
    pub area: f64,
}

struct Region<'a> {
    name: &'a str,
    seams: &'a [&'a str],
    contains: Box<dyn Fn(&Point3<f64>) -> bool + 'a>,
}

impl<'a> Region<'a> {
    fn new(name: &'a str, seams: &'a [&'a str], contains: impl Fn(&Point3<f64>) -> bool + 'a) -> Self {
        Self {
            name,
            seams,
            contains: Box::new(contains),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn regions(mesh: &ScanMesh, garment_type: GarmentType) -> Vec<Region<'static>> {
    let n = mesh.vertices.len().max(1) as f64;
    let (min_z, max_z) = mesh
        .vertices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.position.z), hi.max(v.position.z))
        });
    let height = max_z - min_z;
    let at = move |fraction: f64| min_z + fraction * height;

    match garment_type {
        GarmentType::Pants => {
            const LEG: &[&str] = &["inseam", "outseam", "hem"];
            let center_x = mesh.vertices.iter().map(|v| v.position.x).sum::<f64>() / n;
            let crotch = at(0.4);
            let leg = move |left: bool, front: bool| {
                move |p: &Point3<f64>| {
                    p.z < crotch && (p.x < center_x) == left && (p.y > 0.0) == front
                }
            };
            vec![
                Region::new("front_left_leg", LEG, leg(true, true)),
                Region::new("front_right_leg", LEG, leg(false, true)),
                Region::new("back_left_leg", LEG, leg(true, false)),
                Region::new("back_right_leg", LEG, leg(false, false)),
                Region::new("seat", &["waistband", "crotch"], move |p| {
                    p.z >= crotch && p.z < at(0.7)
                }),
                Region::new("waistband", &["waistband_top", "waistband_bottom"], move |p| {
                    p.z >= at(0.9)
                }),
            ]
        }
        GarmentType::Shirt | GarmentType::Jacket => {
            const TOP: &[&str] = &["shoulder", "side_seam", "hem"];
            let center_y = mesh.vertices.iter().map(|v| v.position.y).sum::<f64>() / n;
            vec![
                Region::new("front", TOP, move |p| p.y > center_y),
                Region::new("back", TOP, move |p| p.y <= center_y),
            ]
        }
        _ => vec![Region::new("main", &["seam"], |_| true)],
    }
}

/// Flatten the vertices selected by `mask` into a piece. `None` if PCA is
/// undefined for them.
fn flatten(mesh: &ScanMesh, name: &str, seams: &[&str], mask: &[bool]) -> Option<PatternPiece> {
    let vertex_indices: Vec<u32> = mask
        .iter()
        .enumerate()
        .filter(|&(_, &inside)| inside)
        .filter_map(|(i, _)| u32::try_from(i).ok())
        .collect();
    let points: Vec<Point3<f64>> = vertex_indices
        .iter()
        .map(|&i| mesh.vertices[i as usize].position)
        .collect();

    let pca = pca_points(&points)?;
    if pca.is_degenerate() {
        return None;
    }
    let (u, v) = (pca.primary_axis(), pca.secondary_axis());
    let flattened: Vec<Point2<f64>> = points
        .iter()
        .map(|p| {
            let d = p - pca.centroid;
            Point2::new(d.dot(&u), d.dot(&v))
        })
        .collect();

    let boundary = convex_hull(&flattened);
    let area = polygon_area(&boundary);
    let faces = mesh
        .faces
        .iter()
        .filter(|face| face.iter().all(|&i| mask[i as usize]))
        .copied()
        .collect();

    Some(PatternPiece {
        name: name.to_string(),
        seams: seams.iter().map(ToString::to_string).collect(),
        vertex_indices,
        flattened,
        faces,
        boundary,
        area,
    })
}

/// Split an oriented garment into flattened pattern pieces.
///
/// - pants: four leg quarters below 40% of the height (left/right of the
///   mean X, front/back by the sign of Y), the seat up to 70% and the
///   waistband above 90%
/// - shirts and jackets: front and back halves around the mean Y
/// - anything else: one `main` piece
///
/// Regions with fewer than `min_piece_vertices` vertices are dropped.
#[must_use]
pub fn segment_pieces(
    mesh: &ScanMesh,
    garment_type: GarmentType,
    params: &GarmentParams,
) -> Vec<PatternPiece> {
    let pieces: Vec<PatternPiece> = regions(mesh, garment_type)
        .into_iter()
        .filter_map(|region| {
            let mask: Vec<bool> = mesh
                .vertices
                .iter()
                .map(|v| (region.contains)(&v.position))
                .collect();
            let count = mask.iter().filter(|&&inside| inside).count();
            if count < params.min_piece_vertices {
                debug!(piece = region.name, count, "Too few vertices for pattern piece");
                return None;
            }
            flatten(mesh, region.name, region.seams, &mask)
        })
        .collect();
    debug!(count = pieces.len(), %garment_type, "Segmented pattern pieces");
    pieces
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{pants, tube};

    #[test]
    fn pants_have_six_pieces() {
        let mesh = pants();
        let pieces = segment_pieces(&mesh, GarmentType::Pants, &GarmentParams::default());
        let names: Vec<_> = pieces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "front_left_leg",
                "front_right_leg",
                "back_left_leg",
                "back_right_leg",
                "seat",
                "waistband"
            ]
        );
        for piece in &pieces {
            assert_eq!(piece.flattened.len(), piece.vertex_indices.len());
            assert!(piece.area > 0.0);
            assert!(piece.boundary.len() >= 3);
            assert!(!piece.faces.is_empty());
        }
        assert_eq!(pieces[0].seams, ["inseam", "outseam", "hem"]);
        assert_eq!(pieces[5].seams, ["waistband_top", "waistband_bottom"]);
    }

    #[test]
    fn leg_quarters_are_disjoint() {
        let pieces = segment_pieces(&pants(), GarmentType::Pants, &GarmentParams::default());
        let legs = &pieces[..4];
        for (i, a) in legs.iter().enumerate() {
            for b in &legs[i + 1..] {
                assert!(a.vertex_indices.iter().all(|v| !b.vertex_indices.contains(v)));
            }
        }
    }

    #[test]
    fn shirt_front_and_back_cover_every_vertex() {
        let mesh = tube(600.0, 150.0);
        let pieces = segment_pieces(&mesh, GarmentType::Shirt, &GarmentParams::default());
        assert_eq!(pieces.len(), 2);
        assert_eq!(
            pieces[0].vertex_indices.len() + pieces[1].vertex_indices.len(),
            mesh.vertices.len()
        );
    }

    #[test]
    fn flattened_piece_keeps_planar_area() {
        // A flat 100 × 200 grid in the XZ plane flattens without loss.
        let mut vertices = Vec::new();
        for i in 0..=10 {
            for j in 0..=20 {
                vertices.push(scan_types::Vertex::from_coords(
                    f64::from(i) * 10.0,
                    0.0,
                    f64::from(j) * 10.0,
                ));
            }
        }
        let mesh = ScanMesh::from_parts(vertices, vec![]);
        let pieces = segment_pieces(&mesh, GarmentType::Skirt, &GarmentParams::default());
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].name, "main");
        assert!((pieces[0].area - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn tiny_region_dropped() {
        let mesh = tube(100.0, 10.0);
        let params = GarmentParams::default().with_min_piece_vertices(10_000);
        assert!(segment_pieces(&mesh, GarmentType::Dress, &params).is_empty());
    }
}
