//! Garment type from silhouette topology.
//!
//! Pants show two separate islands in horizontal slices of the lower half
//! and one in the upper half. Everything else is a single tube, told apart
//! by height.

use hashbrown::HashMap;
use nalgebra::{Point2, Point3};
use scan_repair::UnionFind;
use scan_section::bands;
use tracing::debug;

use crate::kind::GarmentType;
use crate::params::GarmentParams;

/// Number of single-linkage clusters among `points`: two points share a
/// cluster when a chain of hops no longer than `distance` joins them.
///
/// # Example
///
/// ```
/// use garment_model::count_islands;
/// use nalgebra::Point2;
///
/// let points = [
///     Point2::new(0.0, 0.0),
///     Point2::new(40.0, 0.0),
///     Point2::new(80.0, 0.0),
///     Point2::new(300.0, 0.0),
/// ];
/// assert_eq!(count_islands(&points, 50.0), 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: cell coordinates of scan-sized clouds fit in i64
pub fn count_islands(points: &[Point2<f64>], distance: f64) -> usize {
    if points.len() < 2 || distance <= 0.0 {
        return points.len();
    }

    let cell_of = |p: &Point2<f64>| ((p.x / distance).floor() as i64, (p.y / distance).floor() as i64);
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, p) in points.iter().enumerate() {
        grid.entry(cell_of(p)).or_default().push(i);
    }

    let limit = distance * distance;
    let mut sets = UnionFind::new(points.len());
    for (i, p) in points.iter().enumerate() {
        let (cx, cy) = cell_of(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(cell) = grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &j in cell.iter().filter(|&&j| j > i) {
                    if (points[j] - p).norm_squared() <= limit {
                        sets.union(i, j);
                    }
                }
            }
        }
    }
    sets.set_count()
}

/// Island count of each silhouette slice, bottom to top. Sparse slices
/// count zero.
#[must_use]
pub fn silhouette_islands(positions: &[Point3<f64>], params: &GarmentParams) -> Vec<usize> {
    bands(positions, &params.silhouette)
        .into_iter()
        .map(|band| {
            if band.is_dense(params.silhouette.min_vertices) {
                count_islands(&band.points, params.island_distance)
            } else {
                0
            }
        })
        .collect()
}

/// Guess the garment type from its shape.
///
/// Only [`GarmentType::Pants`], [`GarmentType::Dress`] and
/// [`GarmentType::Shirt`] are ever returned.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_garment(positions: &[Point3<f64>], params: &GarmentParams) -> GarmentType {
    let islands = silhouette_islands(positions, params);
    let (lower, upper) = islands.split_at(islands.len() / 2);
    let mean = |counts: &[usize]| {
        if counts.is_empty() {
            0.0
        } else {
            counts.iter().sum::<usize>() as f64 / counts.len() as f64
        }
    };
    let (lower_mean, upper_mean) = (mean(lower), mean(upper));

    let height = positions
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
    let height = (height.1 - height.0).max(0.0);

    let garment_type = if lower_mean > params.leg_island_threshold
        && upper_mean < params.leg_island_threshold
    {
        GarmentType::Pants
    } else if height > params.dress_height {
        GarmentType::Dress
    } else {
        GarmentType::Shirt
    };
    debug!(
        lower_mean,
        upper_mean,
        height,
        %garment_type,
        "Classified garment from silhouette"
    );
    garment_type
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{pants, tube};

    #[test]
    fn single_linkage_chains_points() {
        let chain: Vec<_> = (0..10).map(|i| Point2::new(f64::from(i) * 45.0, 0.0)).collect();
        assert_eq!(count_islands(&chain, 50.0), 1);

        let spread: Vec<_> = (0..10).map(|i| Point2::new(f64::from(i) * 55.0, 0.0)).collect();
        assert_eq!(count_islands(&spread, 50.0), 10);
    }

    #[test]
    fn islands_across_cell_borders() {
        let points = [Point2::new(49.0, 49.0), Point2::new(51.0, 51.0), Point2::new(-1.0, 49.0)];
        assert_eq!(count_islands(&points, 50.0), 1);
        assert_eq!(count_islands(&[], 50.0), 0);
        assert_eq!(count_islands(&[Point2::origin()], 50.0), 1);
    }

    #[test]
    fn two_legs_make_pants() {
        let mesh = pants();
        let params = GarmentParams::default();
        let islands = silhouette_islands(&mesh.positions(), &params);
        assert_eq!(islands.len(), 20);
        assert_eq!(islands[0], 2);
        assert_eq!(islands[19], 1);
        assert_eq!(classify_garment(&mesh.positions(), &params), GarmentType::Pants);
    }

    #[test]
    fn single_tube_is_shirt_or_dress_by_height() {
        let params = GarmentParams::default();
        assert_eq!(
            classify_garment(&tube(700.0, 150.0).positions(), &params),
            GarmentType::Shirt
        );
        assert_eq!(
            classify_garment(&tube(1200.0, 150.0).positions(), &params),
            GarmentType::Dress
        );
    }
}
