//! Score and recommendation invariants over arbitrary issue lists.

use fit_analysis::{fit_score, recommend, BodyZone, FitIssue, IssueKind, Severity};
use nalgebra::Point3;
use proptest::prelude::*;

const ZONES: [BodyZone; 9] = [
    BodyZone::Shoulders,
    BodyZone::Bust,
    BodyZone::Waist,
    BodyZone::Hips,
    BodyZone::Crotch,
    BodyZone::Thighs,
    BodyZone::Knees,
    BodyZone::Calves,
    BodyZone::Ankles,
];

const KINDS: [IssueKind; 4] = [
    IssueKind::Compression,
    IssueKind::Gap,
    IssueKind::TooShort,
    IssueKind::MovementConflict,
];

const SEVERITIES: [Severity; 4] = [
    Severity::Minor,
    Severity::Moderate,
    Severity::Severe,
    Severity::Critical,
];

fn issue() -> impl Strategy<Value = FitIssue> {
    (0usize..4, 0usize..9, 0usize..4, 5.5f64..120.0).prop_map(|(k, z, s, size)| {
        let kind = KINDS[k];
        FitIssue {
            kind,
            severity: SEVERITIES[s],
            zone: ZONES[z],
            location: Point3::origin(),
            amount: if kind == IssueKind::Compression { -size } else { size },
            affected_vertices: vec![],
            description: String::new(),
        }
    })
}

proptest! {
    #[test]
    fn score_is_bounded_and_perfect_only_without_issues(
        issues in proptest::collection::vec(issue(), 0..20),
    ) {
        let score = fit_score(&issues);
        prop_assert!((0.0..=100.0).contains(&score));
        prop_assert_eq!(score >= 100.0, issues.is_empty());
    }

    #[test]
    fn adding_an_issue_never_raises_the_score(
        issues in proptest::collection::vec(issue(), 0..20),
        extra in issue(),
    ) {
        let before = fit_score(&issues);
        let mut more = issues;
        more.push(extra);
        prop_assert!(fit_score(&more) <= before);
    }

    #[test]
    fn priorities_are_dense_and_ordered(
        issues in proptest::collection::vec(issue(), 0..20),
    ) {
        let recs = recommend(&issues);
        prop_assert!(recs.len() <= issues.len());
        for (i, rec) in recs.iter().enumerate() {
            prop_assert_eq!(rec.priority as usize, i + 1);
            prop_assert!(rec.amount > 0.0);
        }
        for pair in recs.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }
        // Movement conflicts always have an alteration.
        let conflicts = issues.iter().filter(|i| i.kind == IssueKind::MovementConflict).count();
        let eased = recs.iter().filter(|r| r.location.ends_with("_ease")).count();
        prop_assert_eq!(conflicts, eased);
    }
}
