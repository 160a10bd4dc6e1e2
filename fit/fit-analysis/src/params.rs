//! Fit analysis thresholds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds for turning distances and length deficits into issues.
///
/// # Example
///
/// ```
/// use fit_analysis::FitParams;
///
/// let params = FitParams::static_fit();
/// assert!(!params.check_movement);
/// assert!((params.compression_threshold + 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FitParams {
    /// Signed distances below this are compression (mm). Default: -5.
    pub compression_threshold: f64,

    /// Signed distances above this are gaps (mm). Default: 20.
    pub gap_threshold: f64,

    /// Check the movement envelope against the garment. Default: true.
    pub check_movement: bool,

    /// Envelope points farther than this from the garment conflict (mm).
    /// Default: 30.
    pub movement_threshold: f64,

    /// Inseam, outseam and rise deficits up to this are ignored (mm).
    /// Default: 10.
    pub leg_length_tolerance: f64,

    /// Torso length deficits up to this are ignored (mm). Default: 20.
    pub torso_length_tolerance: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            compression_threshold: -5.0,
            gap_threshold: 20.0,
            check_movement: true,
            movement_threshold: 30.0,
            leg_length_tolerance: 10.0,
            torso_length_tolerance: 20.0,
        }
    }
}

impl FitParams {
    /// Standing fit only, no movement check.
    #[must_use]
    pub fn static_fit() -> Self {
        Self::default().with_check_movement(false)
    }

    /// Sets the compression threshold.
    #[must_use]
    pub const fn with_compression_threshold(mut self, mm: f64) -> Self {
        self.compression_threshold = mm;
        self
    }

    /// Sets the gap threshold.
    #[must_use]
    pub const fn with_gap_threshold(mut self, mm: f64) -> Self {
        self.gap_threshold = mm;
        self
    }

    /// Enables or disables the movement check.
    #[must_use]
    pub const fn with_check_movement(mut self, enabled: bool) -> Self {
        self.check_movement = enabled;
        self
    }

    /// Sets the movement conflict distance.
    #[must_use]
    pub const fn with_movement_threshold(mut self, mm: f64) -> Self {
        self.movement_threshold = mm;
        self
    }
}
