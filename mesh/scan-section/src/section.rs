//! Horizontal band sections of a Z-up point cloud.
//!
//! A band gathers every vertex within a capture distance of a height and
//! projects it onto the XY plane. A [`CrossSection`] summarizes the convex
//! hull of one band.

use nalgebra::{Point2, Point3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hull::{convex_hull, polygon_area, polygon_perimeter};
use crate::signal::linspace;

/// How a point cloud is cut into bands.
///
/// Band centers are `linspace(min_z + margin, max_z - margin, band_count)`
/// and each band captures vertices with
/// `|z - h| < capture_ratio * (max_z - min_z) / band_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SectionParams {
    /// Number of band centers. Default: 100.
    pub band_count: usize,

    /// Bands with fewer vertices are skipped. Default: 10.
    pub min_vertices: usize,

    /// Inset of the first and last band center from the extremes. Default: 1.0.
    pub margin: f64,

    /// Capture half-width as a fraction of band spacing. Default: 0.5.
    pub capture_ratio: f64,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self::body()
    }
}

impl SectionParams {
    /// Body sectioning: 100 bands, half-band capture, 1 mm inset.
    #[must_use]
    pub const fn body() -> Self {
        Self {
            band_count: 100,
            min_vertices: 10,
            margin: 1.0,
            capture_ratio: 0.5,
        }
    }

    /// Garment measurement: 50 bands, full-band capture, no inset.
    #[must_use]
    pub const fn garment() -> Self {
        Self {
            band_count: 50,
            min_vertices: 10,
            margin: 0.0,
            capture_ratio: 1.0,
        }
    }

    /// Coarse silhouette used for garment type detection: 20 bands.
    #[must_use]
    pub const fn silhouette() -> Self {
        Self {
            band_count: 20,
            min_vertices: 10,
            margin: 0.0,
            capture_ratio: 1.0,
        }
    }

    /// Sets the band count.
    #[must_use]
    pub const fn with_band_count(mut self, count: usize) -> Self {
        self.band_count = count;
        self
    }

    /// Sets the minimum vertex count per band.
    #[must_use]
    pub const fn with_min_vertices(mut self, count: usize) -> Self {
        self.min_vertices = count;
        self
    }

    /// Sets the capture ratio.
    #[must_use]
    pub const fn with_capture_ratio(mut self, ratio: f64) -> Self {
        self.capture_ratio = ratio;
        self
    }
}

/// Vertices captured around one height, projected to XY.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Band center height.
    pub height: f64,
    /// Captured vertices as `(x, y)`.
    pub points: Vec<Point2<f64>>,
}

impl Band {
    /// True if the band has at least `min` points.
    #[must_use]
    pub fn is_dense(&self, min: usize) -> bool {
        self.points.len() >= min
    }
}

/// Cut `positions` into bands. Every band center is returned, including
/// sparse ones; an empty cloud gives no bands.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bands(positions: &[Point3<f64>], params: &SectionParams) -> Vec<Band> {
    if positions.is_empty() || params.band_count == 0 {
        return Vec::new();
    }
    let (min_z, max_z) = positions
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
    let half_width = params.capture_ratio * (max_z - min_z) / params.band_count as f64;

    linspace(min_z + params.margin, max_z - params.margin, params.band_count)
        .into_iter()
        .map(|height| Band {
            height,
            points: positions
                .iter()
                .filter(|p| (p.z - height).abs() < half_width)
                .map(|p| Point2::new(p.x, p.y))
                .collect(),
        })
        .collect()
}

/// Summary of one horizontal band.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrossSection {
    /// Band center height (Z).
    pub height: f64,
    /// Convex hull of the band, counter-clockwise.
    pub boundary: Vec<Point2<f64>>,
    /// Hull perimeter.
    pub circumference: f64,
    /// Mean of the hull points.
    pub center: Point2<f64>,
    /// X extent.
    pub width: f64,
    /// Y extent.
    pub depth: f64,
    /// Hull area.
    pub area: f64,
    /// Number of captured vertices.
    pub vertex_count: usize,
}

impl CrossSection {
    /// Build a section from a band's points. `None` if the hull is not a
    /// polygon (fewer than three non-collinear points).
    ///
    /// # Example
    ///
    /// ```
    /// use nalgebra::Point2;
    /// use scan_section::CrossSection;
    ///
    /// let square = [
    ///     Point2::new(-1.0, -1.0),
    ///     Point2::new(1.0, -1.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(-1.0, 1.0),
    /// ];
    /// let section = CrossSection::from_points(10.0, &square).unwrap();
    /// assert!((section.circumference - 8.0).abs() < 1e-12);
    /// assert!((section.area - 4.0).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_points(height: f64, points: &[Point2<f64>]) -> Option<Self> {
        let boundary = convex_hull(points);
        if boundary.len() < 3 {
            return None;
        }

        let sum = boundary
            .iter()
            .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
        let center = Point2::from(sum / boundary.len() as f64);

        let (min, max) = boundary.iter().fold(
            (Point2::new(f64::INFINITY, f64::INFINITY), Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY)),
            |(lo, hi), p| {
                (
                    Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        );

        Some(Self {
            height,
            circumference: polygon_perimeter(&boundary),
            area: polygon_area(&boundary),
            center,
            width: max.x - min.x,
            depth: max.y - min.y,
            boundary,
            vertex_count: points.len(),
        })
    }
}

/// Sections of every dense band, ordered by ascending height.
///
/// # Example
///
/// ```
/// use scan_section::{cross_sections, SectionParams};
/// use scan_types::{revolve, ProfileRing};
///
/// let rings: Vec<_> = (0..=40).map(|i| ProfileRing::circle(f64::from(i) * 25.0, 100.0)).collect();
/// let tube = revolve(&rings, 32, false);
/// let sections = cross_sections(&tube.positions(), &SectionParams::body().with_band_count(20));
/// assert!(!sections.is_empty());
/// assert!(sections.iter().all(|s| (s.width - 200.0).abs() < 2.0));
/// ```
#[must_use]
pub fn cross_sections(positions: &[Point3<f64>], params: &SectionParams) -> Vec<CrossSection> {
    let all = bands(positions, params);
    let total = all.len();
    let sections: Vec<CrossSection> = all
        .into_iter()
        .filter(|band| band.is_dense(params.min_vertices))
        .filter_map(|band| CrossSection::from_points(band.height, &band.points))
        .collect();
    debug!(
        kept = sections.len(),
        skipped = total - sections.len(),
        "Computed cross-sections"
    );
    sections
}

/// Section whose height is closest to `height`.
#[must_use]
pub fn nearest_section(sections: &[CrossSection], height: f64) -> Option<&CrossSection> {
    sections
        .iter()
        .min_by(|a, b| (a.height - height).abs().total_cmp(&(b.height - height).abs()))
}
