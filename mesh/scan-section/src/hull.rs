//! 2D convex hull and polygon metrics.

use nalgebra::Point2;

/// Convex hull of a planar point set, counter-clockwise, without collinear
/// points (Andrew's monotone chain).
///
/// Fewer than three distinct points are returned as-is (deduplicated).
///
/// # Example
///
/// ```
/// use nalgebra::Point2;
/// use scan_section::convex_hull;
///
/// let points = [
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// assert_eq!(convex_hull(&points).len(), 4);
/// ```
#[must_use]
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted: Vec<Point2<f64>> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && turn(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && turn(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Z component of `(b - a) × (c - a)`; positive for a left turn.
fn turn(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x).mul_add(c.y - a.y, -((b.y - a.y) * (c.x - a.x)))
}

/// Length of the closed polyline through `polygon`.
#[must_use]
pub fn polygon_perimeter(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (polygon[(i + 1) % n] - polygon[i]).norm()).sum()
}

/// Signed shoelace area; positive for counter-clockwise polygons.
#[must_use]
pub fn polygon_signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let (p, q) = (polygon[i], polygon[(i + 1) % n]);
            p.x.mul_add(q.y, -(q.x * p.y))
        })
        .sum();
    twice / 2.0
}

/// Unsigned shoelace area.
#[must_use]
pub fn polygon_area(polygon: &[Point2<f64>]) -> f64 {
    polygon_signed_area(polygon).abs()
}
