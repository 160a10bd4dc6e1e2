//! Staged body analysis.
//!
//! ```text
//! Uninitialized → CrossSectioned → LandmarksDetected → MeasurementsExtracted
//! ```
//!
//! Each stage consumes the previous stage's output. Running a stage out of
//! order returns [`BodyError::StageOrder`].

use std::fmt;

use nalgebra::Point3;
use scan_section::{cross_sections, CrossSection};
use scan_types::ScanMesh;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detect::detect_landmarks;
use crate::envelope::{generate_envelope, MovementEnvelope, MovementProfile};
use crate::error::{BodyError, BodyResult};
use crate::landmark::Landmarks;
use crate::measurements::{extract_measurements, BodyMeasurements};
use crate::params::LandmarkParams;

/// Progress of a [`BodyModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyStage {
    /// Nothing computed yet.
    Uninitialized,
    /// Cross-sections available.
    CrossSectioned,
    /// Landmarks available.
    LandmarksDetected,
    /// Measurements available; terminal.
    MeasurementsExtracted,
}

impl fmt::Display for BodyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::CrossSectioned => "cross-sectioned",
            Self::LandmarksDetected => "landmarks detected",
            Self::MeasurementsExtracted => "measurements extracted",
        })
    }
}

/// An oriented body scan and what has been learned about it so far.
///
/// # Example
///
/// ```
/// use body_model::{mannequin, BodyModel, BodyStage, LandmarkParams};
///
/// let model = BodyModel::analyze(mannequin(), LandmarkParams::default()).unwrap();
/// assert_eq!(model.stage(), BodyStage::MeasurementsExtracted);
/// assert!(model.measurements().unwrap().waist_circumference.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct BodyModel {
    mesh: ScanMesh,
    params: LandmarkParams,
    stage: BodyStage,
    floor: f64,
    top: f64,
    sections: Vec<CrossSection>,
    landmarks: Landmarks,
    measurements: Option<BodyMeasurements>,
}

impl BodyModel {
    /// Wrap an oriented (Z-up, millimeter) body scan.
    ///
    /// # Errors
    ///
    /// [`BodyError::EmptyMesh`] if the scan has no vertices.
    pub fn new(mesh: ScanMesh, params: LandmarkParams) -> BodyResult<Self> {
        if mesh.vertices.is_empty() {
            return Err(BodyError::EmptyMesh);
        }
        let (floor, top) = mesh
            .vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.position.z), hi.max(v.position.z))
            });
        Ok(Self {
            mesh,
            params,
            stage: BodyStage::Uninitialized,
            floor,
            top,
            sections: Vec::new(),
            landmarks: Landmarks::new(),
            measurements: None,
        })
    }

    /// Run every stage.
    ///
    /// # Errors
    ///
    /// [`BodyError::EmptyMesh`] if the scan has no vertices.
    pub fn analyze(mesh: ScanMesh, params: LandmarkParams) -> BodyResult<Self> {
        let mut model = Self::new(mesh, params)?;
        model.compute_cross_sections()?;
        model.detect_landmarks()?;
        model.extract_measurements()?;
        Ok(model)
    }

    fn require(&self, requested: &'static str, required: BodyStage) -> BodyResult<()> {
        if self.stage == required {
            Ok(())
        } else {
            Err(BodyError::stage_order(requested, required, self.stage))
        }
    }

    /// Slice the scan into horizontal sections.
    ///
    /// # Errors
    ///
    /// [`BodyError::StageOrder`] unless the model is uninitialized.
    pub fn compute_cross_sections(&mut self) -> BodyResult<&[CrossSection]> {
        self.require("cross-sectioning", BodyStage::Uninitialized)?;
        self.sections = cross_sections(&self.mesh.positions(), &self.params.sections);
        self.stage = BodyStage::CrossSectioned;
        Ok(&self.sections)
    }

    /// Locate landmarks on the section signals.
    ///
    /// # Errors
    ///
    /// [`BodyError::StageOrder`] unless cross-sections were just computed.
    pub fn detect_landmarks(&mut self) -> BodyResult<&Landmarks> {
        self.require("landmark detection", BodyStage::CrossSectioned)?;
        self.landmarks = detect_landmarks(&self.sections, self.apex(), &self.params);
        self.stage = BodyStage::LandmarksDetected;
        Ok(&self.landmarks)
    }

    /// Turn landmarks into measurements.
    ///
    /// # Errors
    ///
    /// [`BodyError::StageOrder`] unless landmarks were just detected.
    pub fn extract_measurements(&mut self) -> BodyResult<&BodyMeasurements> {
        self.require("measurement extraction", BodyStage::LandmarksDetected)?;
        let measurements = extract_measurements(
            &self.sections,
            &self.landmarks,
            self.floor,
            self.top,
            &self.params,
        );
        self.stage = BodyStage::MeasurementsExtracted;
        info!(
            landmarks = self.landmarks.len(),
            sections = self.sections.len(),
            height = measurements.total_height,
            "Body measurements extracted"
        );
        Ok(&*self.measurements.insert(measurements))
    }

    /// Expand the body surface by movement ease. Uses whatever landmarks
    /// are known; before detection every vertex gets the fallback ease.
    #[must_use]
    pub fn movement_envelope(&self, profile: MovementProfile) -> MovementEnvelope {
        generate_envelope(&self.mesh.positions(), &self.landmarks, profile)
    }

    fn apex(&self) -> Option<Point3<f64>> {
        self.mesh
            .vertices
            .iter()
            .map(|v| v.position)
            .max_by(|a, b| a.z.total_cmp(&b.z))
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> BodyStage {
        self.stage
    }

    /// The scan being analyzed.
    #[must_use]
    pub const fn mesh(&self) -> &ScanMesh {
        &self.mesh
    }

    /// Lowest vertex height.
    #[must_use]
    pub const fn floor(&self) -> f64 {
        self.floor
    }

    /// Highest vertex height.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.top
    }

    /// Cross-sections, empty before the first stage.
    #[must_use]
    pub fn sections(&self) -> &[CrossSection] {
        &self.sections
    }

    /// Detected landmarks.
    #[must_use]
    pub const fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Measurements, once extracted.
    #[must_use]
    pub const fn measurements(&self) -> Option<&BodyMeasurements> {
        self.measurements.as_ref()
    }

    /// Give back the scan.
    #[must_use]
    pub fn into_mesh(self) -> ScanMesh {
        self.mesh
    }
}
