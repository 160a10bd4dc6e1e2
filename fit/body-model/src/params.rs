//! Landmark detection parameters.

use scan_section::SectionParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning for body cross-sectioning and landmark heuristics.
///
/// The crotch and knee constants are empirical; they are exposed so callers
/// can adapt them to scans that do not fit the defaults.
///
/// # Example
///
/// ```
/// use body_model::LandmarkParams;
///
/// let params = LandmarkParams::default().with_knee_ratio(0.47);
/// assert_eq!(params.sections.band_count, 100);
/// assert!((params.crotch_drop_ratio - 0.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LandmarkParams {
    /// Band layout. Default: [`SectionParams::body`].
    pub sections: SectionParams,

    /// Gaussian smoothing of the circumference/width signals, in bands.
    /// Default: 3.0.
    pub smoothing_sigma: f64,

    /// The crotch is where circumference first falls below this fraction
    /// of the hip circumference (scanning down). Default: 0.6.
    pub crotch_drop_ratio: f64,

    /// Bands to step back up after the drop. Default: 2.
    pub crotch_step_back: usize,

    /// Knee height as a fraction of the floor-to-crotch distance.
    /// Default: 0.45.
    pub knee_ratio: f64,

    /// Thigh circumference is read this far below the crotch (mm).
    /// Default: 50.
    pub thigh_drop: f64,
}

impl Default for LandmarkParams {
    fn default() -> Self {
        Self {
            sections: SectionParams::body(),
            smoothing_sigma: 3.0,
            crotch_drop_ratio: 0.6,
            crotch_step_back: 2,
            knee_ratio: 0.45,
            thigh_drop: 50.0,
        }
    }
}

impl LandmarkParams {
    /// Sets the band layout.
    #[must_use]
    pub const fn with_sections(mut self, sections: SectionParams) -> Self {
        self.sections = sections;
        self
    }

    /// Sets the smoothing sigma.
    #[must_use]
    pub const fn with_smoothing_sigma(mut self, sigma: f64) -> Self {
        self.smoothing_sigma = sigma;
        self
    }

    /// Sets the crotch drop ratio.
    #[must_use]
    pub const fn with_crotch_drop_ratio(mut self, ratio: f64) -> Self {
        self.crotch_drop_ratio = ratio;
        self
    }

    /// Sets the crotch step-back in bands.
    #[must_use]
    pub const fn with_crotch_step_back(mut self, bands: usize) -> Self {
        self.crotch_step_back = bands;
        self
    }

    /// Sets the knee ratio.
    #[must_use]
    pub const fn with_knee_ratio(mut self, ratio: f64) -> Self {
        self.knee_ratio = ratio;
        self
    }
}
