//! One-call body analysis.

use scan_section::CrossSection;
use scan_types::ScanMesh;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::envelope::{MovementEnvelope, MovementProfile};
use crate::error::BodyResult;
use crate::landmark::Landmarks;
use crate::measurements::BodyMeasurements;
use crate::model::BodyModel;
use crate::params::LandmarkParams;

/// Everything the fit stage needs to know about a body.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyAnalysis {
    /// The oriented body scan.
    pub mesh: ScanMesh,
    /// Cross-sections, bottom to top.
    pub sections: Vec<CrossSection>,
    /// Detected landmarks.
    pub landmarks: Landmarks,
    /// Derived measurements.
    pub measurements: BodyMeasurements,
    /// Expanded surface for movement checks.
    pub envelope: MovementEnvelope,
}

/// Counts for a compact report line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodySummary {
    /// Body vertex count.
    pub vertex_count: usize,
    /// Cross-sections kept.
    pub section_count: usize,
    /// Landmarks detected.
    pub landmark_count: usize,
    /// Measurements available.
    pub measurement_count: usize,
    /// Floor to top of head.
    pub height: f64,
}

impl std::fmt::Display for BodySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Body: {:.0} mm tall, {} landmarks, {} measurements from {} sections",
            self.height, self.landmark_count, self.measurement_count, self.section_count
        )
    }
}

impl BodyAnalysis {
    /// Summary counts.
    #[must_use]
    pub fn summary(&self) -> BodySummary {
        BodySummary {
            vertex_count: self.mesh.vertices.len(),
            section_count: self.sections.len(),
            landmark_count: self.landmarks.len(),
            measurement_count: self.measurements.entries().len(),
            height: self.measurements.total_height,
        }
    }
}

/// Run the full body analysis and build the movement envelope.
///
/// # Errors
///
/// [`BodyError::EmptyMesh`](crate::BodyError::EmptyMesh) if the scan has
/// no vertices. A scan on which no landmark can be found is not an error.
pub fn analyze_body(
    mesh: ScanMesh,
    profile: MovementProfile,
    params: &LandmarkParams,
) -> BodyResult<BodyAnalysis> {
    let model = BodyModel::analyze(mesh, *params)?;
    let envelope = model.movement_envelope(profile);
    let measurements = model.measurements().cloned().unwrap_or_default();
    let sections = model.sections().to_vec();
    let landmarks = model.landmarks().clone();
    Ok(BodyAnalysis {
        mesh: model.into_mesh(),
        sections,
        landmarks,
        measurements,
        envelope,
    })
}
