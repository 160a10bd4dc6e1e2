//! Garment analysis parameters.

use scan_section::SectionParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning for garment classification, seam tracing, measurement and
/// segmentation.
///
/// # Example
///
/// ```
/// use garment_model::GarmentParams;
///
/// let params = GarmentParams::default().with_sharp_angle_deg(45.0);
/// assert_eq!(params.silhouette.band_count, 20);
/// assert_eq!(params.measurement.band_count, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GarmentParams {
    /// Slices used to count silhouette islands. Default:
    /// [`SectionParams::silhouette`].
    pub silhouette: SectionParams,

    /// Points closer than this (mm, in XY) belong to the same island.
    /// Default: 50.
    pub island_distance: f64,

    /// Mean island count separating one tube from two. Default: 1.5.
    pub leg_island_threshold: f64,

    /// Single-tube garments taller than this (mm) are dresses. Default: 1000.
    pub dress_height: f64,

    /// Interior edges whose faces meet at more than this angle (degrees)
    /// are seam candidates. Default: 30.
    pub sharp_angle_deg: f64,

    /// Shortest seam chain kept, in vertices. Default: 4.
    pub min_seam_vertices: usize,

    /// Chains with `|direction.z|` above this are vertical. Default: 0.7.
    pub vertical_threshold: f64,

    /// Chains with `|direction.z|` below this are horizontal. Default: 0.3.
    pub horizontal_threshold: f64,

    /// Slices used for measurements. Default: [`SectionParams::garment`].
    pub measurement: SectionParams,

    /// Thigh circumference is read this far below the crotch (mm).
    /// Default: 50.
    pub thigh_drop: f64,

    /// Smallest vertex count for a pattern piece. Default: 11.
    pub min_piece_vertices: usize,
}

impl Default for GarmentParams {
    fn default() -> Self {
        Self {
            silhouette: SectionParams::silhouette(),
            island_distance: 50.0,
            leg_island_threshold: 1.5,
            dress_height: 1000.0,
            sharp_angle_deg: 30.0,
            min_seam_vertices: 4,
            vertical_threshold: 0.7,
            horizontal_threshold: 0.3,
            measurement: SectionParams::garment(),
            thigh_drop: 50.0,
            min_piece_vertices: 11,
        }
    }
}

impl GarmentParams {
    /// Sets the island linkage distance.
    #[must_use]
    pub const fn with_island_distance(mut self, distance: f64) -> Self {
        self.island_distance = distance;
        self
    }

    /// Sets the dress height threshold.
    #[must_use]
    pub const fn with_dress_height(mut self, height: f64) -> Self {
        self.dress_height = height;
        self
    }

    /// Sets the sharp-edge angle.
    #[must_use]
    pub const fn with_sharp_angle_deg(mut self, degrees: f64) -> Self {
        self.sharp_angle_deg = degrees;
        self
    }

    /// Sets the shortest seam chain.
    #[must_use]
    pub const fn with_min_seam_vertices(mut self, count: usize) -> Self {
        self.min_seam_vertices = count;
        self
    }

    /// Sets the measurement slicing.
    #[must_use]
    pub const fn with_measurement(mut self, sections: SectionParams) -> Self {
        self.measurement = sections;
        self
    }

    /// Sets the smallest pattern piece.
    #[must_use]
    pub const fn with_min_piece_vertices(mut self, count: usize) -> Self {
        self.min_piece_vertices = count;
        self
    }
}
