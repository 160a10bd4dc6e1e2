//! Pipeline configuration.

use std::path::Path;

use body_model::{LandmarkParams, MovementProfile};
use fit_analysis::FitParams;
use garment_model::GarmentParams;
use pattern_gen::{FabricType, SvgStyle};
use scan_orient::OrientParams;
use scan_repair::CleanOptions;
use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;

/// Every tunable of every stage.
///
/// Read from JSON; absent fields keep their defaults, so `{}` is a valid
/// configuration.
///
/// # Example
///
/// ```
/// use body_model::MovementProfile;
/// use fit_pipeline::PipelineConfig;
/// use pattern_gen::FabricType;
///
/// let config = PipelineConfig::from_json(r#"{"fabric": "knit", "fit": {"gap_threshold": 25.0}}"#).unwrap();
/// assert_eq!(config.fabric, FabricType::Knit);
/// assert_eq!(config.fit.gap_threshold, 25.0);
/// assert_eq!(config.profile, MovementProfile::Wild);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scan cleanup.
    pub clean: CleanOptions,
    /// Body orientation.
    pub orient: OrientParams,
    /// Body landmark detection.
    pub landmarks: LandmarkParams,
    /// Garment analysis.
    pub garment: GarmentParams,
    /// Fit thresholds.
    pub fit: FitParams,
    /// Pattern drawings.
    pub svg: SvgStyle,
    /// Movement envelope profile. Default: wild.
    pub profile: MovementProfile,
    /// Fabric the pieces will be cut from.
    pub fabric: FabricType,
    /// Garment type name; detected from the scan when absent.
    pub garment_type: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clean: CleanOptions::default(),
            orient: OrientParams::default(),
            landmarks: LandmarkParams::default(),
            garment: GarmentParams::default(),
            fit: FitParams::default(),
            svg: SvgStyle::default(),
            profile: MovementProfile::Wild,
            fabric: FabricType::default(),
            garment_type: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Config`](crate::PipelineError::Config) on malformed
    /// JSON or a field of the wrong type.
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// An I/O error if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(scan_io::IoError::from)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON with every field.
    ///
    /// # Errors
    ///
    /// Only if serialization fails, which the field types do not allow.
    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the movement profile.
    #[must_use]
    pub const fn with_profile(mut self, profile: MovementProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the fabric.
    #[must_use]
    pub const fn with_fabric(mut self, fabric: FabricType) -> Self {
        self.fabric = fabric;
        self
    }

    /// Sets the fit thresholds.
    #[must_use]
    pub const fn with_fit(mut self, fit: FitParams) -> Self {
        self.fit = fit;
        self
    }

    /// Sets the garment type name.
    #[must_use]
    pub fn with_garment_type(mut self, name: impl Into<String>) -> Self {
        self.garment_type = Some(name.into());
        self
    }
}
