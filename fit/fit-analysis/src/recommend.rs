//! Alteration recommendations derived from fit issues.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::issue::{FitIssue, IssueKind, Severity};
use crate::zone::BodyZone;

/// Kind of alteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModificationKind {
    /// Add length with a new panel.
    Extension,
    /// Insert a shaped piece for room.
    Gusset,
    /// Fold out excess with a dart.
    Dart,
    /// Release seam allowance.
    LetOut,
    /// Sew a seam deeper.
    TakeIn,
}

impl ModificationKind {
    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Gusset => "gusset",
            Self::Dart => "dart",
            Self::LetOut => "let_out",
            Self::TakeIn => "take_in",
        }
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One alteration, addressing one issue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recommendation {
    /// Kind of the issue addressed.
    pub issue_kind: IssueKind,
    /// Zone of the issue addressed.
    pub zone: BodyZone,
    /// Severity of the issue addressed.
    pub severity: Severity,
    /// What to do.
    pub kind: ModificationKind,
    /// How much (mm, always positive).
    pub amount: f64,
    /// Where on the garment, e.g. `side_seam` or `hips_ease`.
    pub location: String,
    /// 1 is most urgent.
    pub priority: u32,
    /// Sewing instructions.
    pub instructions: String,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} {:.0} mm at {}: {}",
            self.priority, self.kind, self.amount, self.location, self.instructions
        )
    }
}

/// Recommendation for a single issue, or `None` if no alteration is known
/// for its kind and zone.
///
/// # Example
///
/// ```
/// use fit_analysis::{recommend_for, BodyZone, FitIssue, IssueKind, ModificationKind, Severity};
/// use nalgebra::Point3;
///
/// let issue = FitIssue {
///     kind: IssueKind::Compression,
///     severity: Severity::Moderate,
///     zone: BodyZone::Hips,
///     location: Point3::origin(),
///     amount: -15.0,
///     affected_vertices: vec![],
///     description: "Hip compression".into(),
/// };
/// let rec = recommend_for(&issue, 1).unwrap();
/// assert_eq!(rec.kind, ModificationKind::LetOut);
/// assert_eq!(rec.amount, 25.0);
/// assert_eq!(rec.location, "side_seam");
/// ```
#[must_use]
pub fn recommend_for(issue: &FitIssue, priority: u32) -> Option<Recommendation> {
    let a = issue.amount;
    let (kind, amount, location, instructions) = match (issue.kind, issue.zone) {
        (IssueKind::Compression, BodyZone::Shoulders) => {
            let amount = a.abs() + 20.0;
            (
                ModificationKind::Gusset,
                amount,
                "shoulder_seam".to_string(),
                format!(
                    "Add diamond gusset at shoulder seam. Gusset should add {amount:.0}mm width. \
                     Reinforce seam to prevent future ripping."
                ),
            )
        }
        (IssueKind::Compression, BodyZone::Hips) => {
            let amount = a.abs() + 10.0;
            (
                ModificationKind::LetOut,
                amount,
                "side_seam".to_string(),
                format!(
                    "Let out side seams by {amount:.0}mm. \
                     If insufficient seam allowance, add side panel insert."
                ),
            )
        }
        (IssueKind::Compression, BodyZone::Thighs) => {
            let amount = a.abs() + 20.0;
            (
                ModificationKind::Gusset,
                amount,
                "inner_thigh".to_string(),
                format!(
                    "Add diamond gusset along the inseam at the inner thigh for {amount:.0}mm \
                     additional room."
                ),
            )
        }
        (IssueKind::Compression, BodyZone::Knees) => {
            let amount = a.abs() + 20.0;
            (
                ModificationKind::Gusset,
                amount,
                "knee".to_string(),
                format!(
                    "Add diamond gusset behind the knee for {amount:.0}mm additional room. \
                     Use stretch fabric so the knee can bend."
                ),
            )
        }
        (IssueKind::Compression, BodyZone::Crotch) => {
            let amount = a.abs() + 30.0;
            (
                ModificationKind::Gusset,
                amount,
                "crotch".to_string(),
                format!(
                    "Add crotch gusset for {amount:.0}mm additional room. \
                     Use stretch fabric for comfort."
                ),
            )
        }
        (IssueKind::Gap, BodyZone::Bust) => (
            ModificationKind::Dart,
            a,
            "bust".to_string(),
            format!(
                "Add bust darts to remove {a:.0}mm excess. \
                 Position darts from side seam toward bust apex. \
                 This addresses tenting from less projection."
            ),
        ),
        (IssueKind::Gap, BodyZone::Waist) => (
            ModificationKind::TakeIn,
            a,
            "waist_seam".to_string(),
            format!(
                "Take in waist by {a:.0}mm at side seams. \
                 Taper gradually into hip for smooth line."
            ),
        ),
        (IssueKind::Gap, BodyZone::Hips) => (
            ModificationKind::TakeIn,
            a,
            "side_seam".to_string(),
            format!("Take in hips by {a:.0}mm at side seams."),
        ),
        (IssueKind::TooShort, BodyZone::Ankles) => {
            let amount = a + 25.0;
            (
                ModificationKind::Extension,
                amount,
                "hem".to_string(),
                format!(
                    "Add {amount:.0}mm extension at hem. Match leg taper - measure \
                     circumference at current hem and desired final hem. \
                     Includes 25mm hem allowance."
                ),
            )
        }
        (IssueKind::TooShort, BodyZone::Crotch) => (
            ModificationKind::Extension,
            a,
            "rise".to_string(),
            format!(
                "Add {a:.0}mm to rise. Extend waistband upward, maintaining shape. \
                 Critical for long-torso fit."
            ),
        ),
        (IssueKind::TooShort, BodyZone::Waist) => (
            ModificationKind::Extension,
            a,
            "torso_length".to_string(),
            format!(
                "Add {a:.0}mm to body length. Insert horizontal band below waist or \
                 extend hem to prevent ride-up."
            ),
        ),
        (IssueKind::MovementConflict, zone) => (
            ModificationKind::Gusset,
            a,
            format!("{zone}_ease"),
            format!(
                "Add ease gusset at {zone} for movement. Required additional space: {a:.0}mm. \
                 Use stretch fabric or action pleats for dynamic movement."
            ),
        ),
        _ => return None,
    };

    Some(Recommendation {
        issue_kind: issue.kind,
        zone: issue.zone,
        severity: issue.severity,
        kind,
        amount,
        location,
        priority,
        instructions,
    })
}

/// Recommendations for all issues, most severe first.
///
/// Issues are ordered by severity, then by the size of the amount, both
/// descending (ties keep their input order). Compressions carry negative
/// amounts, so the sign is ignored. Priorities count up from 1 over the issues
/// that produce a recommendation.
#[must_use]
pub fn recommend(issues: &[FitIssue]) -> Vec<Recommendation> {
    let mut ordered: Vec<&FitIssue> = issues.iter().collect();
    ordered.sort_by(|a, b| match b.severity.cmp(&a.severity) {
        Ordering::Equal => b.amount.abs().total_cmp(&a.amount.abs()),
        other => other,
    });

    let mut recommendations = Vec::new();
    for issue in ordered {
        let priority = u32::try_from(recommendations.len() + 1).unwrap_or(u32::MAX);
        if let Some(rec) = recommend_for(issue, priority) {
            recommendations.push(rec);
        }
    }
    recommendations
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn issue(kind: IssueKind, zone: BodyZone, severity: Severity, amount: f64) -> FitIssue {
        FitIssue {
            kind,
            severity,
            zone,
            location: Point3::origin(),
            amount,
            affected_vertices: vec![],
            description: String::new(),
        }
    }

    #[test]
    fn short_inseam_gets_hem_extension() {
        let rec = recommend_for(
            &issue(IssueKind::TooShort, BodyZone::Ankles, Severity::Moderate, 50.0),
            1,
        )
        .unwrap();
        assert_eq!(rec.kind, ModificationKind::Extension);
        assert_eq!(rec.amount, 75.0);
        assert_eq!(rec.location, "hem");
        assert!(rec.instructions.starts_with("Add 75mm extension at hem."));
    }

    #[test]
    fn compression_dispatch_by_zone() {
        let cases = [
            (BodyZone::Shoulders, ModificationKind::Gusset, 32.0, "shoulder_seam"),
            (BodyZone::Hips, ModificationKind::LetOut, 22.0, "side_seam"),
            (BodyZone::Thighs, ModificationKind::Gusset, 32.0, "inner_thigh"),
            (BodyZone::Knees, ModificationKind::Gusset, 32.0, "knee"),
            (BodyZone::Crotch, ModificationKind::Gusset, 42.0, "crotch"),
        ];
        for (zone, kind, amount, location) in cases {
            let rec = recommend_for(
                &issue(IssueKind::Compression, zone, Severity::Moderate, -12.0),
                1,
            )
            .unwrap();
            assert_eq!(rec.kind, kind, "{zone}");
            assert_eq!(rec.amount, amount, "{zone}");
            assert_eq!(rec.location, location);
        }
        assert!(recommend_for(
            &issue(IssueKind::Compression, BodyZone::Calves, Severity::Minor, -6.0),
            1
        )
        .is_none());
    }

    #[test]
    fn gaps_and_lengths() {
        let dart = recommend_for(&issue(IssueKind::Gap, BodyZone::Bust, Severity::Minor, 24.0), 1).unwrap();
        assert_eq!((dart.kind, dart.amount), (ModificationKind::Dart, 24.0));
        let waist = recommend_for(&issue(IssueKind::Gap, BodyZone::Waist, Severity::Minor, 24.0), 1).unwrap();
        assert_eq!((waist.kind, waist.location.as_str()), (ModificationKind::TakeIn, "waist_seam"));
        assert!(recommend_for(&issue(IssueKind::Gap, BodyZone::Knees, Severity::Minor, 24.0), 1).is_none());

        let rise = recommend_for(&issue(IssueKind::TooShort, BodyZone::Crotch, Severity::Severe, 35.0), 1).unwrap();
        assert_eq!((rise.amount, rise.location.as_str()), (35.0, "rise"));
        let torso = recommend_for(&issue(IssueKind::TooShort, BodyZone::Waist, Severity::Moderate, 40.0), 1).unwrap();
        assert_eq!(torso.location, "torso_length");
    }

    #[test]
    fn movement_conflict_names_the_zone() {
        let rec = recommend_for(
            &issue(IssueKind::MovementConflict, BodyZone::Knees, Severity::Moderate, 44.0),
            3,
        )
        .unwrap();
        assert_eq!(rec.kind, ModificationKind::Gusset);
        assert_eq!(rec.location, "knees_ease");
        assert_eq!(rec.priority, 3);
        assert_eq!(rec.amount, 44.0);
    }

    #[test]
    fn deeper_compression_ranks_first_within_a_severity() {
        let issues = [
            issue(IssueKind::Compression, BodyZone::Shoulders, Severity::Moderate, -8.0),
            issue(IssueKind::Compression, BodyZone::Hips, Severity::Moderate, -18.0),
        ];
        let recs = recommend(&issues);
        let order: Vec<_> = recs.iter().map(|r| (r.priority, r.zone)).collect();
        assert_eq!(order, vec![(1, BodyZone::Hips), (2, BodyZone::Shoulders)]);
    }

    #[test]
    fn priorities_follow_severity_then_amount() {
        let issues = [
            issue(IssueKind::Gap, BodyZone::Waist, Severity::Minor, 25.0),
            issue(IssueKind::Compression, BodyZone::Calves, Severity::Critical, -40.0),
            issue(IssueKind::TooShort, BodyZone::Ankles, Severity::Severe, 60.0),
            issue(IssueKind::Compression, BodyZone::Hips, Severity::Critical, -35.0),
            issue(IssueKind::Gap, BodyZone::Hips, Severity::Minor, 30.0),
        ];
        let recs = recommend(&issues);

        // Calves compression has no alteration and takes no priority.
        let order: Vec<_> = recs.iter().map(|r| (r.priority, r.zone, r.issue_kind)).collect();
        assert_eq!(
            order,
            vec![
                (1, BodyZone::Hips, IssueKind::Compression),
                (2, BodyZone::Ankles, IssueKind::TooShort),
                (3, BodyZone::Hips, IssueKind::Gap),
                (4, BodyZone::Waist, IssueKind::Gap),
            ]
        );
        assert!(recs.iter().all(|r| r.amount > 0.0));
    }

    #[test]
    fn display_line() {
        let rec = recommend_for(
            &issue(IssueKind::Gap, BodyZone::Hips, Severity::Minor, 30.0),
            2,
        )
        .unwrap();
        assert_eq!(
            rec.to_string(),
            "2. take_in 30 mm at side_seam: Take in hips by 30mm at side seams."
        );
    }
}
