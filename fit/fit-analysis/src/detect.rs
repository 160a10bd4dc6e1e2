//! Turning distances, length deficits and envelope clearance into issues.
//!
//! Every detector returns at most one issue per zone, in zone order.

use std::collections::BTreeMap;

use body_model::{BodyLandmark, BodyMeasurements, Landmarks, MovementEnvelope};
use garment_model::{GarmentMeasurements, GarmentType};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::distance::SurfaceIndex;
use crate::issue::{FitIssue, IssueKind, Severity};
use crate::params::FitParams;
use crate::zone::{BodyZone, ZoneClassifier};

#[derive(Debug, Default)]
struct ZoneGroup {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl ZoneGroup {
    #[allow(clippy::cast_precision_loss)]
    fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    #[allow(clippy::cast_precision_loss)]
    fn centroid(&self, points: &[Point3<f64>]) -> Point3<f64> {
        let sum = self
            .indices
            .iter()
            .fold(Vector3::zeros(), |acc, &i| acc + points[i].coords);
        Point3::from(sum / self.indices.len() as f64)
    }
}

/// Bucket the body vertices whose distance passes `keep` by zone.
fn group_by_zone(
    body: &[Point3<f64>],
    distances: &[f64],
    zones: &ZoneClassifier,
    keep: impl Fn(f64) -> bool,
) -> BTreeMap<BodyZone, ZoneGroup> {
    let mut groups: BTreeMap<BodyZone, ZoneGroup> = BTreeMap::new();
    for (i, (point, &d)) in body.iter().zip(distances).enumerate() {
        if keep(d) {
            let group = groups.entry(zones.classify(point.z)).or_default();
            group.indices.push(i);
            group.values.push(d);
        }
    }
    groups
}

fn compression_description(zone: BodyZone) -> &'static str {
    match zone {
        BodyZone::Shoulders => "Shoulder compression - risk of ripping at shoulder seams",
        BodyZone::Bust => "Bust compression - garment pulling across chest",
        BodyZone::Waist => "Waist compression - garment too tight at waist",
        BodyZone::Hips => "Hip compression - garment restricting hip movement",
        BodyZone::Crotch => "Crotch compression - insufficient rise",
        BodyZone::Thighs => "Thigh compression - legs too tight",
        BodyZone::Knees => "Knee compression - restricted knee bend",
        BodyZone::Calves => "Calf compression - lower leg too tight",
        BodyZone::Ankles => "Ankle compression - hem too tight",
    }
}

fn gap_description(zone: BodyZone) -> String {
    match zone {
        BodyZone::Bust => "Bust gap - tenting due to less projection than garment expects".into(),
        BodyZone::Hips => "Hip gap - excess fabric due to less hip curve".into(),
        BodyZone::Waist => "Waist gap - garment loose at waist".into(),
        BodyZone::Thighs => "Thigh gap - excess fabric in thigh area".into(),
        other => format!("Excess fabric in {other}"),
    }
}

/// Body vertices pushing through the garment (`distance < threshold`,
/// threshold negative).
///
/// Amount is the zone's mean distance; severity follows the deepest point:
/// below -30 critical, -20 severe, -10 moderate, otherwise minor.
#[must_use]
pub fn compression_issues(
    body: &[Point3<f64>],
    distances: &[f64],
    zones: &ZoneClassifier,
    threshold: f64,
) -> Vec<FitIssue> {
    group_by_zone(body, distances, zones, |d| d < threshold)
        .into_iter()
        .map(|(zone, group)| {
            let deepest = group.min();
            let severity = if deepest < -30.0 {
                Severity::Critical
            } else if deepest < -20.0 {
                Severity::Severe
            } else if deepest < -10.0 {
                Severity::Moderate
            } else {
                Severity::Minor
            };
            FitIssue {
                kind: IssueKind::Compression,
                severity,
                zone,
                location: group.centroid(body),
                amount: group.mean(),
                affected_vertices: group.indices,
                description: compression_description(zone).to_string(),
            }
        })
        .collect()
}

/// Garment standing off the body by more than `threshold`.
///
/// Amount is the zone's mean distance; severity follows the widest gap:
/// above 60 severe, 40 moderate, otherwise minor.
#[must_use]
pub fn gap_issues(
    body: &[Point3<f64>],
    distances: &[f64],
    zones: &ZoneClassifier,
    threshold: f64,
) -> Vec<FitIssue> {
    group_by_zone(body, distances, zones, |d| d > threshold)
        .into_iter()
        .map(|(zone, group)| {
            let widest = group.max();
            let severity = if widest > 60.0 {
                Severity::Severe
            } else if widest > 40.0 {
                Severity::Moderate
            } else {
                Severity::Minor
            };
            FitIssue {
                kind: IssueKind::Gap,
                severity,
                zone,
                location: group.centroid(body),
                amount: group.mean(),
                affected_vertices: group.indices,
                description: gap_description(zone),
            }
        })
        .collect()
}

/// Inputs to [`length_issues`] taken from the body side.
#[derive(Debug, Clone, Copy)]
pub struct BodyFrame<'a> {
    /// Body measurements.
    pub measurements: &'a BodyMeasurements,
    /// Body landmarks, for issue locations.
    pub landmarks: &'a Landmarks,
    /// Lowest body vertex height.
    pub floor: f64,
}

impl BodyFrame<'_> {
    fn at_landmark_or(&self, landmark: BodyLandmark, fraction: f64) -> Point3<f64> {
        self.landmarks.get(landmark).unwrap_or_else(|| {
            Point3::new(
                0.0,
                0.0,
                fraction.mul_add(self.measurements.total_height, self.floor),
            )
        })
    }
}

fn too_short(
    zone: BodyZone,
    severity: Severity,
    location: Point3<f64>,
    deficit: f64,
    description: String,
) -> FitIssue {
    FitIssue {
        kind: IssueKind::TooShort,
        severity,
        zone,
        location,
        amount: deficit,
        affected_vertices: Vec::new(),
        description,
    }
}

/// Keep one issue per zone: a later issue replaces an earlier one in the
/// same zone only if its amount is larger.
fn push_worst(issues: &mut Vec<FitIssue>, issue: FitIssue) {
    match issues.iter_mut().find(|existing| existing.zone == issue.zone) {
        Some(existing) if issue.amount > existing.amount => *existing = issue,
        Some(_) => {}
        None => issues.push(issue),
    }
}

/// Compare body and garment lengths.
///
/// * inseam and outseam deficits beyond the leg tolerance are a hem
///   problem at the ankles (above 50 severe, 25 moderate, else minor); the
///   larger deficit is reported
/// * a front rise deficit beyond the leg tolerance pulls at the crotch
///   (above 30 severe, else moderate)
/// * for shirts, a torso longer than the garment body by more than the
///   torso tolerance rides up at the waist (moderate)
#[must_use]
pub fn length_issues(
    body: &BodyFrame<'_>,
    garment: &GarmentMeasurements,
    garment_type: GarmentType,
    params: &FitParams,
) -> Vec<FitIssue> {
    let mut issues = Vec::new();
    let deficit = |b: Option<f64>, g: Option<f64>| b.zip(g).map(|(b, g)| b - g);
    let leg_severity = |d: f64| {
        if d > 50.0 {
            Severity::Severe
        } else if d > 25.0 {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    };
    let hem = Point3::new(0.0, 0.0, body.floor);

    if let Some(d) = deficit(body.measurements.inseam, garment.inseam)
        .filter(|&d| d > params.leg_length_tolerance)
    {
        let description = format!("Inseam {d:.0}mm too short for body");
        push_worst(&mut issues, too_short(BodyZone::Ankles, leg_severity(d), hem, d, description));
    }

    if let Some(d) = deficit(body.measurements.outseam, garment.outseam)
        .filter(|&d| d > params.leg_length_tolerance)
    {
        let description = format!("Outseam {d:.0}mm too short");
        push_worst(&mut issues, too_short(BodyZone::Ankles, leg_severity(d), hem, d, description));
    }

    if let Some(d) = deficit(body.measurements.front_rise, garment.front_rise)
        .filter(|&d| d > params.leg_length_tolerance)
    {
        let severity = if d > 30.0 {
            Severity::Severe
        } else {
            Severity::Moderate
        };
        let location = body.at_landmark_or(BodyLandmark::Crotch, 0.4);
        let description = format!("Rise {d:.0}mm too short - will pull at crotch");
        push_worst(&mut issues, too_short(BodyZone::Crotch, severity, location, d, description));
    }

    if garment_type == GarmentType::Shirt {
        if let Some(d) = deficit(body.measurements.torso_length, garment.body_length)
            .filter(|&d| d > params.torso_length_tolerance)
        {
            let location = body.at_landmark_or(BodyLandmark::Waist, 0.55);
            let description = format!("Torso {d:.0}mm too short - will ride up");
            push_worst(
                &mut issues,
                too_short(BodyZone::Waist, Severity::Moderate, location, d, description),
            );
        }
    }

    debug!(count = issues.len(), "Checked garment lengths");
    issues
}

/// Envelope vertices farther than `threshold` from any garment vertex.
///
/// Conflicts are attributed to the zone of the matching base vertex. The
/// issue keeps the largest distance as its amount and that vertex as its
/// location.
#[must_use]
pub fn movement_issues(
    envelope: &MovementEnvelope,
    garment: &SurfaceIndex,
    zones: &ZoneClassifier,
    threshold: f64,
) -> Vec<FitIssue> {
    let mut worst: BTreeMap<BodyZone, (f64, Point3<f64>, Vec<usize>)> = BTreeMap::new();
    for (i, (base, expanded)) in envelope.base.iter().zip(&envelope.expanded).enumerate() {
        let (_, distance) = garment.nearest(expanded);
        if distance <= threshold {
            continue;
        }
        let entry = worst
            .entry(zones.classify(base.z))
            .or_insert((distance, *expanded, Vec::new()));
        if distance > entry.0 {
            entry.0 = distance;
            entry.1 = *expanded;
        }
        entry.2.push(i);
    }

    worst
        .into_iter()
        .map(|(zone, (distance, location, indices))| FitIssue {
            kind: IssueKind::MovementConflict,
            severity: Severity::Moderate,
            zone,
            location,
            amount: distance,
            affected_vertices: indices,
            description: format!("Movement restricted in {zone} - need {distance:.0}mm more ease"),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use body_model::{generate_envelope, MovementProfile};
    use scan_types::{revolve, ProfileRing};

    fn hip_landmarks() -> Landmarks {
        let mut landmarks = Landmarks::new();
        landmarks.insert(BodyLandmark::Hip, Point3::new(0.0, 0.0, 900.0));
        landmarks.insert(BodyLandmark::Crotch, Point3::new(0.0, 0.0, 780.0));
        landmarks
    }

    fn hip_ring(count: usize) -> Vec<Point3<f64>> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f64 / count as f64 * std::f64::consts::TAU;
                Point3::new(180.0 * t.cos(), 130.0 * t.sin(), 900.0)
            })
            .collect()
    }

    #[test]
    fn uniform_hip_compression_is_one_moderate_issue() {
        let body = hip_ring(40);
        let distances = vec![-15.0; body.len()];
        let zones = ZoneClassifier::new(&hip_landmarks(), 0.0, 1700.0);

        let issues = compression_issues(&body, &distances, &zones, -5.0);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.kind, IssueKind::Compression);
        assert_eq!(issue.zone, BodyZone::Hips);
        assert_eq!(issue.severity, Severity::Moderate);
        assert_relative_eq!(issue.amount, -15.0);
        assert_eq!(issue.affected_vertices.len(), 40);
        assert_relative_eq!(issue.location.z, 900.0);
        assert_relative_eq!(issue.location.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn compression_severity_follows_deepest_point() {
        let body = hip_ring(4);
        let zones = ZoneClassifier::new(&hip_landmarks(), 0.0, 1700.0);
        let cases = [
            (-8.0, Severity::Minor),
            (-10.0, Severity::Minor),
            (-10.5, Severity::Moderate),
            (-20.5, Severity::Severe),
            (-31.0, Severity::Critical),
        ];
        for (deepest, expected) in cases {
            let distances = [-6.0, -6.0, -6.0, deepest];
            let issues = compression_issues(&body, &distances, &zones, -5.0);
            assert_eq!(issues[0].severity, expected, "deepest = {deepest}");
            assert!(issues[0].amount < 0.0);
        }
    }

    #[test]
    fn gaps_group_by_zone_in_zone_order() {
        let mut body = hip_ring(4);
        body.extend(hip_ring(4).into_iter().map(|p| Point3::new(p.x, p.y, 50.0)));
        let distances = [25.0, 25.0, 45.0, 3.0, 70.0, 21.0, 21.0, 21.0];
        let zones = ZoneClassifier::new(&hip_landmarks(), 0.0, 1700.0);

        let issues = gap_issues(&body, &distances, &zones, 20.0);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].zone, BodyZone::Hips);
        assert_eq!(issues[0].severity, Severity::Moderate);
        assert_relative_eq!(issues[0].amount, 95.0 / 3.0);
        assert_eq!(issues[0].affected_vertices, vec![0, 1, 2]);
        assert_eq!(issues[1].zone, BodyZone::Ankles);
        assert_eq!(issues[1].severity, Severity::Severe);
        assert_eq!(issues[1].description, "Excess fabric in ankles");
        assert!(issues.iter().all(|issue| issue.amount > 0.0));
    }

    #[test]
    fn within_thresholds_is_clean() {
        let body = hip_ring(8);
        let distances = [-5.0, 0.0, 20.0, 10.0, -4.9, 19.9, 0.0, 1.0];
        let zones = ZoneClassifier::new(&hip_landmarks(), 0.0, 1700.0);
        assert!(compression_issues(&body, &distances, &zones, -5.0).is_empty());
        assert!(gap_issues(&body, &distances, &zones, 20.0).is_empty());
    }

    fn frame<'a>(measurements: &'a BodyMeasurements, landmarks: &'a Landmarks) -> BodyFrame<'a> {
        BodyFrame {
            measurements,
            landmarks,
            floor: -850.0,
        }
    }

    #[test]
    fn short_inseam_is_a_moderate_ankle_issue() {
        let body = BodyMeasurements {
            total_height: 1700.0,
            inseam: Some(800.0),
            ..BodyMeasurements::default()
        };
        let garment = GarmentMeasurements {
            inseam: Some(750.0),
            ..GarmentMeasurements::default()
        };
        let landmarks = Landmarks::new();
        let issues = length_issues(&frame(&body, &landmarks), &garment, GarmentType::Pants, &FitParams::default());

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.kind, IssueKind::TooShort);
        assert_eq!(issue.zone, BodyZone::Ankles);
        assert_eq!(issue.severity, Severity::Moderate);
        assert_relative_eq!(issue.amount, 50.0);
        assert_eq!(issue.location, Point3::new(0.0, 0.0, -850.0));
        assert_eq!(issue.description, "Inseam 50mm too short for body");
    }

    #[test]
    fn inseam_and_outseam_share_the_ankle_issue() {
        let body = BodyMeasurements {
            inseam: Some(800.0),
            outseam: Some(1100.0),
            ..BodyMeasurements::default()
        };
        let garment = GarmentMeasurements {
            inseam: Some(780.0),
            outseam: Some(1040.0),
            ..GarmentMeasurements::default()
        };
        let landmarks = Landmarks::new();
        let issues = length_issues(&frame(&body, &landmarks), &garment, GarmentType::Pants, &FitParams::default());
        assert_eq!(issues.len(), 1);
        assert_relative_eq!(issues[0].amount, 60.0);
        assert_eq!(issues[0].severity, Severity::Severe);
        assert_eq!(issues[0].description, "Outseam 60mm too short");
    }

    #[test]
    fn rise_and_torso_deficits() {
        let body = BodyMeasurements {
            total_height: 1700.0,
            front_rise: Some(260.0),
            torso_length: Some(450.0),
            ..BodyMeasurements::default()
        };
        let garment = GarmentMeasurements {
            front_rise: Some(240.0),
            body_length: Some(400.0),
            ..GarmentMeasurements::default()
        };
        let landmarks = hip_landmarks();
        let params = FitParams::default();

        let pants = length_issues(&frame(&body, &landmarks), &garment, GarmentType::Pants, &params);
        assert_eq!(pants.len(), 1);
        assert_eq!(pants[0].zone, BodyZone::Crotch);
        assert_eq!(pants[0].severity, Severity::Moderate);
        assert_eq!(pants[0].location.z, 780.0);
        assert_eq!(pants[0].description, "Rise 20mm too short - will pull at crotch");

        let shirt = length_issues(&frame(&body, &landmarks), &garment, GarmentType::Shirt, &params);
        let torso = shirt.iter().find(|i| i.zone == BodyZone::Waist).unwrap();
        assert_eq!(torso.severity, Severity::Moderate);
        assert_relative_eq!(torso.amount, 50.0);
        // No waist landmark: 0.55 of the body above the floor.
        assert_relative_eq!(torso.location.z, 0.55f64.mul_add(1700.0, -850.0));
        assert_eq!(torso.description, "Torso 50mm too short - will ride up");
    }

    #[test]
    fn small_deficits_are_tolerated() {
        let body = BodyMeasurements {
            inseam: Some(800.0),
            front_rise: Some(250.0),
            torso_length: Some(420.0),
            ..BodyMeasurements::default()
        };
        let garment = GarmentMeasurements {
            inseam: Some(790.0),
            front_rise: Some(241.0),
            body_length: Some(400.0),
            ..GarmentMeasurements::default()
        };
        let landmarks = Landmarks::new();
        let issues = length_issues(&frame(&body, &landmarks), &garment, GarmentType::Shirt, &FitParams::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn narrow_garment_restricts_movement() {
        let rings: Vec<_> = (0..=20)
            .map(|i| ProfileRing::circle(f64::from(i).mul_add(10.0, 800.0), 150.0))
            .collect();
        let garment = revolve(&rings, 48, false);
        let index = SurfaceIndex::build(&garment).unwrap();
        let zones = ZoneClassifier::new(&hip_landmarks(), 0.0, 1700.0);

        let base: Vec<_> = hip_ring(16)
            .into_iter()
            .map(|p| Point3::new(p.x * 0.8, p.y * 0.8, 900.0))
            .collect();
        // Hip ease 40 moves the points on the X axis from 144 to 184.
        let envelope = generate_envelope(&base, &hip_landmarks(), MovementProfile::Default);

        let issues = movement_issues(&envelope, &index, &zones, 30.0);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.kind, IssueKind::MovementConflict);
        assert_eq!(issue.zone, BodyZone::Hips);
        assert_eq!(issue.severity, Severity::Moderate);
        assert!(issue.amount > 30.0);
        assert!(issue.description.starts_with("Movement restricted in hips - need "));

        let roomy = movement_issues(&envelope, &index, &zones, 200.0);
        assert!(roomy.is_empty());
    }
}
