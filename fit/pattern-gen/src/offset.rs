//! Inward polygon offset for stitch lines.

use nalgebra::{Point2, Vector2};
use scan_section::polygon_signed_area;

/// Corners sharper than this are clipped: no offset vertex moves more than
/// `MITER_LIMIT` times the offset distance.
pub const MITER_LIMIT: f64 = 4.0;

/// Move every vertex of a simple polygon `distance` inward.
///
/// Each vertex moves along the bisector of the inward normals of its two
/// edges, lengthened so both edges end up `distance` away (miter), up to
/// [`MITER_LIMIT`]. Works for either winding. Degenerate polygons are
/// returned unchanged.
///
/// # Example
///
/// ```
/// use nalgebra::Point2;
/// use pattern_gen::inset_polygon;
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(100.0, 0.0),
///     Point2::new(100.0, 100.0),
///     Point2::new(0.0, 100.0),
/// ];
/// let inner = inset_polygon(&square, 10.0);
/// assert!((inner[0] - Point2::new(10.0, 10.0)).norm() < 1e-9);
/// ```
#[must_use]
pub fn inset_polygon(polygon: &[Point2<f64>], distance: f64) -> Vec<Point2<f64>> {
    let n = polygon.len();
    if n < 3 || distance == 0.0 {
        return polygon.to_vec();
    }

    let winding = polygon_signed_area(polygon).signum();
    let inward = |a: Point2<f64>, b: Point2<f64>| {
        let edge = b - a;
        (Vector2::new(-edge.y, edge.x) * winding).try_normalize(f64::EPSILON)
    };

    (0..n)
        .map(|i| {
            let prev = polygon[(i + n - 1) % n];
            let current = polygon[i];
            let next = polygon[(i + 1) % n];
            let (n1, n2) = match (inward(prev, current), inward(current, next)) {
                (Some(a), Some(b)) => (a, b),
                (Some(a), None) | (None, Some(a)) => (a, a),
                (None, None) => return current,
            };
            // Opposite normals: a zero-width spike, nothing sensible to do.
            let Some(bisector) = (n1 + n2).try_normalize(f64::EPSILON) else {
                return current;
            };
            let cos_half = bisector.dot(&n1).max(1.0 / MITER_LIMIT);
            current + bisector * (distance / cos_half)
        })
        .collect()
}
