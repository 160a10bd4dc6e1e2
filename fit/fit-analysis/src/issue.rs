//! Fit issues and the score they add up to.

use std::fmt;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::zone::BodyZone;

/// What is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IssueKind {
    /// Body surface outside the garment: too tight.
    Compression,
    /// Garment stands far off the body: too loose.
    Gap,
    /// Garment does not reach far enough.
    TooShort,
    /// Moving body would push through the garment.
    MovementConflict,
}

impl IssueKind {
    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compression => "compression",
            Self::Gap => "gap",
            Self::TooShort => "too_short",
            Self::MovementConflict => "movement_conflict",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How bad an issue is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    /// Cosmetic.
    Minor,
    /// Noticeable; worth fixing.
    Moderate,
    /// Functional problem.
    Severe,
    /// Will damage the garment or hurt.
    Critical,
}

impl Severity {
    /// Points taken off the fit score.
    #[must_use]
    pub const fn penalty(self) -> f64 {
        match self {
            Self::Minor => 3.0,
            Self::Moderate => 8.0,
            Self::Severe => 15.0,
            Self::Critical => 25.0,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One fit problem in one body zone.
///
/// `amount` is signed: negative for compression (mm the body pokes through),
/// positive for gaps, length deficits and missing movement ease.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitIssue {
    /// What is wrong.
    pub kind: IssueKind,
    /// How bad.
    pub severity: Severity,
    /// Where on the body.
    pub zone: BodyZone,
    /// Representative 3D point.
    pub location: Point3<f64>,
    /// Signed size (mm).
    pub amount: f64,
    /// Body vertex indices involved; empty for length checks.
    pub affected_vertices: Vec<usize>,
    /// Human-readable summary.
    pub description: String,
}

impl fmt::Display for FitIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {} ({:.1} mm)",
            self.severity, self.kind, self.zone, self.description, self.amount
        )
    }
}

/// Overall fit, 0 to 100: 100 less each issue's severity penalty, never
/// below zero.
///
/// # Example
///
/// ```
/// use fit_analysis::fit_score;
///
/// assert_eq!(fit_score(&[]), 100.0);
/// ```
#[must_use]
pub fn fit_score(issues: &[FitIssue]) -> f64 {
    let penalty: f64 = issues.iter().map(|issue| issue.severity.penalty()).sum();
    (100.0 - penalty).max(0.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> FitIssue {
        FitIssue {
            kind: IssueKind::Gap,
            severity,
            zone: BodyZone::Waist,
            location: Point3::origin(),
            amount: 25.0,
            affected_vertices: vec![],
            description: "Waist gap".into(),
        }
    }

    #[test]
    fn score_deducts_per_severity() {
        let issues = [
            issue(Severity::Minor),
            issue(Severity::Moderate),
            issue(Severity::Severe),
            issue(Severity::Critical),
        ];
        assert_eq!(fit_score(&issues), 100.0 - 3.0 - 8.0 - 15.0 - 25.0);
    }

    #[test]
    fn score_floors_at_zero() {
        let issues = vec![issue(Severity::Critical); 5];
        assert_eq!(fit_score(&issues), 0.0);
    }

    #[test]
    fn score_never_increases_as_issues_are_added() {
        let all = [
            Severity::Moderate,
            Severity::Critical,
            Severity::Minor,
            Severity::Severe,
            Severity::Critical,
            Severity::Critical,
        ]
        .map(issue);
        let mut last = fit_score(&[]);
        assert_eq!(last, 100.0);
        for n in 1..=all.len() {
            let score = fit_score(&all[..n]);
            assert!(score <= last);
            assert!(score < 100.0);
            last = score;
        }
    }

    #[test]
    fn severity_order() {
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Severe < Severity::Critical);
        assert_eq!(issue(Severity::Severe).to_string(), "[severe] gap at waist: Waist gap (25.0 mm)");
    }
}
