//! One-call fit analysis.

use std::collections::BTreeMap;
use std::fmt;

use body_model::BodyAnalysis;
use garment_model::GarmentAnalysis;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detect::{compression_issues, gap_issues, length_issues, movement_issues, BodyFrame};
use crate::distance::SurfaceIndex;
use crate::error::{FitError, FitResult};
use crate::issue::{fit_score, FitIssue, IssueKind};
use crate::params::FitParams;
use crate::recommend::{recommend, Recommendation};
use crate::zone::{BodyZone, ZoneClassifier};

/// Issues, recommendations and score for one body and one garment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitAnalysisResult {
    /// Issues in detection order: compression, gap, length, movement.
    pub issues: Vec<FitIssue>,
    /// Alterations, by priority.
    pub recommendations: Vec<Recommendation>,
    /// 0 to 100.
    pub score: f64,
    /// Signed distance of each body vertex to the garment.
    pub distances: Vec<f64>,
}

impl FitAnalysisResult {
    /// Number of issues of each kind.
    #[must_use]
    pub fn counts_by_kind(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Number of issues in each zone.
    #[must_use]
    pub fn counts_by_zone(&self) -> BTreeMap<BodyZone, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.zone).or_insert(0) += 1;
        }
        counts
    }

    /// True if nothing needs altering.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for FitAnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Fit score: {:.0}/100 ({} issues, {} recommendations)",
            self.score,
            self.issues.len(),
            self.recommendations.len()
        )?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        for rec in &self.recommendations {
            writeln!(f, "  {rec}")?;
        }
        Ok(())
    }
}

/// Measure the garment against the body.
///
/// Both meshes must share a frame (see `scan_orient::align`). Zones use the
/// body landmarks with a relative-height fallback; the movement check runs
/// only when enabled and the body carries an envelope.
///
/// # Errors
///
/// [`FitError::EmptyBody`] or [`FitError::EmptyGarment`] if either mesh has
/// no vertices.
pub fn analyze_fit(
    body: &BodyAnalysis,
    garment: &GarmentAnalysis,
    params: &FitParams,
) -> FitResult<FitAnalysisResult> {
    if body.mesh.vertices.is_empty() {
        return Err(FitError::EmptyBody);
    }
    let index = SurfaceIndex::build(&garment.mesh)?;

    let positions = body.mesh.positions();
    let floor = positions.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
    let zones = ZoneClassifier::new(&body.landmarks, floor, body.measurements.total_height);

    let distances = index.signed_distances(&positions);
    debug!(vertices = distances.len(), "Computed signed distance field");

    let mut issues = compression_issues(
        &positions,
        &distances,
        &zones,
        params.compression_threshold,
    );
    issues.extend(gap_issues(&positions, &distances, &zones, params.gap_threshold));
    let frame = BodyFrame {
        measurements: &body.measurements,
        landmarks: &body.landmarks,
        floor,
    };
    issues.extend(length_issues(
        &frame,
        &garment.measurements,
        garment.garment_type,
        params,
    ));
    if params.check_movement && !body.envelope.expanded.is_empty() {
        issues.extend(movement_issues(
            &body.envelope,
            &index,
            &zones,
            params.movement_threshold,
        ));
    } else {
        debug!("Skipped movement check");
    }

    let recommendations = recommend(&issues);
    let score = fit_score(&issues);
    info!(
        score,
        issues = issues.len(),
        recommendations = recommendations.len(),
        "Analyzed fit"
    );

    Ok(FitAnalysisResult {
        issues,
        recommendations,
        score,
        distances,
    })
}
