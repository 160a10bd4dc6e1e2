//! Workflow results and their serializable views.

use std::collections::BTreeMap;

use body_model::BodySummary;
use fit_analysis::{BodyZone, FitAnalysisResult, FitIssue, IssueKind, Recommendation};
use garment_model::GarmentSummary;
use pattern_gen::PatternSet;
use scan_orient::AlignReport;
use serde::{Deserialize, Serialize};

use crate::capability::Feature;
use crate::session::{BodyReport, BodyScan, GarmentReport, GarmentScan};

/// Fit analysis without the per-vertex distance field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// 0 to 100.
    pub score: f64,
    /// Detected issues.
    pub issues: Vec<FitIssue>,
    /// Alterations, by priority.
    pub recommendations: Vec<Recommendation>,
    /// Issue counts per kind.
    pub counts_by_kind: BTreeMap<IssueKind, usize>,
    /// Issue counts per zone.
    pub counts_by_zone: BTreeMap<BodyZone, usize>,
}

impl From<&FitAnalysisResult> for FitReport {
    fn from(result: &FitAnalysisResult) -> Self {
        Self {
            score: result.score,
            issues: result.issues.clone(),
            recommendations: result.recommendations.clone(),
            counts_by_kind: result.counts_by_kind(),
            counts_by_zone: result.counts_by_zone(),
        }
    }
}

/// Everything a full workflow run produced.
#[derive(Debug, Clone)]
pub struct Workflow {
    /// The analyzed body.
    pub body: BodyScan,
    /// The analyzed garment.
    pub garment: GarmentScan,
    /// Unit harmonization and overlay, if mesh processing was on.
    pub alignment: Option<AlignReport>,
    /// Fit issues, recommendations, score and distances.
    pub fit: FitAnalysisResult,
    /// Pattern pieces and drawings; empty if nothing needs a piece or
    /// pattern generation was off.
    pub patterns: PatternSet,
    /// Stages that were off, across the whole run.
    pub skipped: Vec<Feature>,
}

/// Serializable summary of a [`Workflow`].
///
/// Drawings are left out; they are written as separate files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowReport {
    /// Body scan and analysis.
    pub body: BodyReport,
    /// Garment scan and analysis.
    pub garment: GarmentReport,
    /// Alignment, if it ran.
    pub alignment: Option<AlignReport>,
    /// Fit analysis.
    pub fit: FitReport,
    /// Names of the generated pieces, in recommendation order.
    pub patterns: Vec<String>,
    /// Instructions for alterations that need no new piece.
    pub instructions_only: Vec<String>,
    /// Stages that were off.
    pub skipped: Vec<Feature>,
}

impl Workflow {
    /// Serializable summary.
    #[must_use]
    pub fn report(&self) -> WorkflowReport {
        WorkflowReport {
            body: self.body.report(),
            garment: self.garment.report(),
            alignment: self.alignment.clone(),
            fit: FitReport::from(&self.fit),
            patterns: self.patterns.patterns.iter().map(|p| p.name.clone()).collect(),
            instructions_only: self.patterns.instructions_only.clone(),
            skipped: self.skipped.clone(),
        }
    }

    /// Body and garment summaries, for a short text report.
    #[must_use]
    pub fn summaries(&self) -> (BodySummary, GarmentSummary) {
        (self.body.analysis.summary(), self.garment.analysis.summary())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use fit_analysis::{recommend, Severity};
    use scan_types::Point3;

    #[test]
    fn fit_report_drops_distances_and_counts() {
        let issue = FitIssue {
            kind: IssueKind::Gap,
            severity: Severity::Moderate,
            zone: BodyZone::Waist,
            location: Point3::origin(),
            amount: 45.0,
            affected_vertices: vec![1, 2],
            description: "Excess fabric at waist".into(),
        };
        let result = FitAnalysisResult {
            recommendations: recommend(std::slice::from_ref(&issue)),
            issues: vec![issue],
            score: 92.0,
            distances: vec![0.0; 1000],
        };
        let report = FitReport::from(&result);
        assert_eq!(report.score, 92.0);
        assert_eq!(report.counts_by_kind[&IssueKind::Gap], 1);
        assert_eq!(report.counts_by_zone[&BodyZone::Waist], 1);
        assert_eq!(report.recommendations.len(), 1);

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("distances"));
        assert!(json.contains(r#""counts_by_kind":{"gap":1}"#));
    }
}
