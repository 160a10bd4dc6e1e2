//! Scans held between pipeline calls.

use std::fmt;

use body_model::{BodyAnalysis, BodyMeasurements, BodySummary, Landmarks};
use garment_model::{GarmentAnalysis, GarmentMeasurements, GarmentSummary, GarmentType};
use scan_orient::{MeshStats, OrientReport};
use scan_repair::CleanReport;
use scan_types::ScanMesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Feature;
use crate::error::{PipelineError, PipelineResult};

/// Which of the two scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanRole {
    /// The wearer.
    Body,
    /// The garment.
    Garment,
}

impl ScanRole {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Garment => "garment",
        }
    }
}

impl fmt::Display for ScanRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What loading and preprocessing did to one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Which scan.
    pub role: ScanRole,
    /// Filename or format hint it was loaded with.
    pub source: String,
    /// Statistics straight after loading.
    pub loaded: MeshStats,
    /// Statistics after preprocessing.
    pub stats: MeshStats,
    /// Cleanup result, if cleanup ran.
    pub cleaning: Option<CleanReport>,
    /// Orientation result, if orientation ran.
    pub orientation: Option<OrientReport>,
    /// Stages that were off.
    pub skipped: Vec<Feature>,
    /// Processing log, in order.
    pub log: Vec<String>,
}

impl ScanReport {
    pub(crate) fn new(role: ScanRole, source: &str, mesh: &ScanMesh) -> Self {
        let loaded = MeshStats::compute(mesh);
        Self {
            role,
            source: source.to_string(),
            stats: loaded.clone(),
            loaded,
            cleaning: None,
            orientation: None,
            skipped: Vec::new(),
            log: vec![format!("Loaded {role} scan from {source}")],
        }
    }

    pub(crate) fn skip(&mut self, feature: Feature, step: &str) {
        debug!(role = %self.role, %feature, "Skipping {step}");
        if !self.skipped.contains(&feature) {
            self.skipped.push(feature);
        }
        self.log.push(format!("Skipped {step} ({feature} unavailable)"));
    }
}

/// A scan that has been loaded and preprocessed, ready for analysis.
#[derive(Debug, Clone)]
pub struct PreparedScan {
    /// The processed mesh.
    pub mesh: ScanMesh,
    /// How it got that way.
    pub report: ScanReport,
}

/// An analyzed body scan.
#[derive(Debug, Clone)]
pub struct BodyScan {
    /// Landmarks, measurements, envelope and the mesh itself.
    pub analysis: BodyAnalysis,
    /// Loading and preprocessing.
    pub report: ScanReport,
}

/// An analyzed garment scan.
#[derive(Debug, Clone)]
pub struct GarmentScan {
    /// Type, seams, measurements, pieces and the mesh itself.
    pub analysis: GarmentAnalysis,
    /// Loading and preprocessing.
    pub report: ScanReport,
}

/// Serializable view of a [`BodyScan`], without the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyReport {
    /// Loading and preprocessing.
    pub scan: ScanReport,
    /// Counts.
    pub summary: BodySummary,
    /// Detected landmarks.
    pub landmarks: Landmarks,
    /// Derived measurements.
    pub measurements: BodyMeasurements,
}

/// Serializable view of a [`GarmentScan`], without the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentReport {
    /// Loading and preprocessing.
    pub scan: ScanReport,
    /// Counts.
    pub summary: GarmentSummary,
    /// Resolved type.
    pub garment_type: GarmentType,
    /// True if the type came from the scan rather than the caller.
    pub type_detected: bool,
    /// Derived measurements.
    pub measurements: GarmentMeasurements,
}

impl BodyScan {
    /// Report without the mesh.
    #[must_use]
    pub fn report(&self) -> BodyReport {
        BodyReport {
            scan: self.report.clone(),
            summary: self.analysis.summary(),
            landmarks: self.analysis.landmarks.clone(),
            measurements: self.analysis.measurements.clone(),
        }
    }
}

impl GarmentScan {
    /// Report without the mesh.
    #[must_use]
    pub fn report(&self) -> GarmentReport {
        GarmentReport {
            scan: self.report.clone(),
            summary: self.analysis.summary(),
            garment_type: self.analysis.garment_type,
            type_detected: self.analysis.type_detected,
            measurements: self.analysis.measurements.clone(),
        }
    }
}

/// Which scans a session holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// A body scan is loaded.
    pub body_loaded: bool,
    /// A garment scan is loaded.
    pub garment_loaded: bool,
    /// Body statistics after preprocessing.
    pub body_stats: Option<MeshStats>,
    /// Garment statistics after preprocessing.
    pub garment_stats: Option<MeshStats>,
}

/// One body slot and one garment slot, filled by uploads and read by fit
/// analysis.
///
/// Uploading replaces whatever the slot held.
#[derive(Debug, Clone, Default)]
pub struct Session {
    body: Option<BodyScan>,
    garment: Option<GarmentScan>,
}

impl Session {
    /// An empty session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            body: None,
            garment: None,
        }
    }

    /// Stores a body scan, returning it.
    pub fn set_body(&mut self, scan: BodyScan) -> &BodyScan {
        self.body.insert(scan)
    }

    /// Stores a garment scan, returning it.
    pub fn set_garment(&mut self, scan: GarmentScan) -> &GarmentScan {
        self.garment.insert(scan)
    }

    /// The body scan, if loaded.
    #[must_use]
    pub const fn body(&self) -> Option<&BodyScan> {
        self.body.as_ref()
    }

    /// The garment scan, if loaded.
    #[must_use]
    pub const fn garment(&self) -> Option<&GarmentScan> {
        self.garment.as_ref()
    }

    /// Both scans.
    ///
    /// # Errors
    ///
    /// [`PipelineError::MissingScan`] naming the first empty slot.
    pub fn pair(&self) -> PipelineResult<(&BodyScan, &GarmentScan)> {
        let body = self.body.as_ref().ok_or(PipelineError::MissingScan {
            role: ScanRole::Body,
        })?;
        let garment = self.garment.as_ref().ok_or(PipelineError::MissingScan {
            role: ScanRole::Garment,
        })?;
        Ok((body, garment))
    }

    /// What is loaded.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            body_loaded: self.body.is_some(),
            garment_loaded: self.garment.is_some(),
            body_stats: self.body.as_ref().map(|b| b.report.stats.clone()),
            garment_stats: self.garment.as_ref().map(|g| g.report.stats.clone()),
        }
    }

    /// Empties both slots.
    pub fn clear(&mut self) {
        self.body = None;
        self.garment = None;
    }
}
