//! Which pipeline stages are available.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A pipeline stage that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Cleanup, orientation and alignment of raw scans.
    MeshProcessing,
    /// Body landmarks, measurements and movement envelope.
    BodyModel,
    /// Garment type, seams, measurements and pieces.
    GarmentModel,
    /// Body-to-garment distance field, issues and recommendations.
    FitAnalysis,
    /// Pattern pieces and drawings.
    PatternGeneration,
}

impl Feature {
    /// Every feature, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::MeshProcessing,
        Self::BodyModel,
        Self::GarmentModel,
        Self::FitAnalysis,
        Self::PatternGeneration,
    ];

    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MeshProcessing => "mesh_processing",
            Self::BodyModel => "body_model",
            Self::GarmentModel => "garment_model",
            Self::FitAnalysis => "fit_analysis",
            Self::PatternGeneration => "pattern_generation",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    /// Accepts the snake-case name, with `-` for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// The set of enabled features.
///
/// # Example
///
/// ```
/// use fit_pipeline::{Capabilities, Feature};
///
/// let caps = Capabilities::full().without(Feature::PatternGeneration);
/// assert!(caps.has(Feature::FitAnalysis));
/// assert_eq!(caps.missing(&[Feature::FitAnalysis, Feature::PatternGeneration]), vec![Feature::PatternGeneration]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    enabled: BTreeSet<Feature>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

impl Capabilities {
    /// Everything on.
    #[must_use]
    pub fn full() -> Self {
        Self {
            enabled: Feature::ALL.into_iter().collect(),
        }
    }

    /// Everything off.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }

    /// Turns a feature on.
    #[must_use]
    pub fn with(mut self, feature: Feature) -> Self {
        self.enabled.insert(feature);
        self
    }

    /// Turns a feature off.
    #[must_use]
    pub fn without(mut self, feature: Feature) -> Self {
        self.enabled.remove(&feature);
        self
    }

    /// Features on in both sets.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            enabled: self.enabled.intersection(&other.enabled).copied().collect(),
        }
    }

    /// True if `feature` is on.
    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }

    /// The features of `required` that are off, in the given order.
    #[must_use]
    pub fn missing(&self, required: &[Feature]) -> Vec<Feature> {
        required.iter().copied().filter(|f| !self.has(*f)).collect()
    }

    /// Fail unless every feature in `required` is on.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`] listing the features that are off.
    pub fn require(&self, required: &[Feature]) -> PipelineResult<()> {
        let features = self.missing(required);
        if features.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Unavailable { features })
        }
    }

    /// Status report for health checks.
    #[must_use]
    pub fn health(&self) -> HealthReport {
        let features: BTreeMap<Feature, bool> =
            Feature::ALL.into_iter().map(|f| (f, self.has(f))).collect();
        let status = if features.values().all(|on| *on) {
            "healthy"
        } else {
            "degraded"
        };
        HealthReport {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            features,
        }
    }
}

/// What a health check reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy` when every feature is on, otherwise `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Each feature and whether it is on.
    pub features: BTreeMap<Feature, bool>,
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {} (v{})", self.status, self.version)?;
        for (feature, on) in &self.features {
            writeln!(f, "  {feature:<20} {}", if *on { "yes" } else { "no" })?;
        }
        Ok(())
    }
}
