//! Landmark detection from circumference and width signals.
//!
//! Signals are read bottom to top over the body cross-sections and
//! Gaussian-smoothed. Each landmark is the extremum of a signal over a
//! fixed fraction of the height range; dependent landmarks are skipped when
//! their prerequisite is missing.

use nalgebra::Point3;
use scan_section::{argmax_in, argmin_in, gaussian_smooth, search_sorted, CrossSection};
use tracing::debug;

use crate::landmark::{BodyLandmark, Landmarks};
use crate::params::LandmarkParams;

/// Smoothed per-section signals.
struct Signals {
    heights: Vec<f64>,
    circumference: Vec<f64>,
    width: Vec<f64>,
}

impl Signals {
    fn new(sections: &[CrossSection], sigma: f64) -> Self {
        let heights = sections.iter().map(|s| s.height).collect();
        let circumference: Vec<f64> = sections.iter().map(|s| s.circumference).collect();
        let width: Vec<f64> = sections.iter().map(|s| s.width).collect();
        Self {
            heights,
            circumference: gaussian_smooth(&circumference, sigma),
            width: gaussian_smooth(&width, sigma),
        }
    }
}

fn center_point(section: &CrossSection) -> Point3<f64> {
    Point3::new(section.center.x, section.center.y, section.height)
}

fn offset_point(section: &CrossSection, dx: f64) -> Point3<f64> {
    Point3::new(section.center.x + dx, section.center.y, section.height)
}

/// Detect landmarks over ascending `sections`.
///
/// `apex` is the highest vertex of the scan, recorded as
/// [`BodyLandmark::TopOfHead`].
#[must_use]
pub fn detect_landmarks(
    sections: &[CrossSection],
    apex: Option<Point3<f64>>,
    params: &LandmarkParams,
) -> Landmarks {
    let mut landmarks = Landmarks::new();
    if let Some(apex) = apex {
        landmarks.insert(BodyLandmark::TopOfHead, apex);
    }

    let n = sections.len();
    if n == 0 {
        debug!("No cross-sections, only the head apex is known");
        return landmarks;
    }
    let signals = Signals::new(sections, params.smoothing_sigma);

    if let Some(waist) = argmin_in(&signals.circumference, n * 3 / 10..n * 6 / 10) {
        landmarks.insert(BodyLandmark::Waist, center_point(&sections[waist]));
        detect_torso(sections, &signals, waist, params, &mut landmarks);
    } else {
        debug!(sections = n, "Too few sections to locate the waist");
    }

    let upper = n * 3 / 4;
    if n - upper > 3 {
        if let Some(i) = argmax_in(&signals.width, upper..n) {
            let s = &sections[i];
            landmarks.insert(BodyLandmark::LeftShoulder, offset_point(s, -s.width / 2.0));
            landmarks.insert(BodyLandmark::RightShoulder, offset_point(s, s.width / 2.0));
            landmarks.insert(BodyLandmark::ShoulderCenter, center_point(s));
        }
    }

    if n > 2 {
        let s = &sections[2];
        landmarks.insert(BodyLandmark::LeftAnkle, offset_point(s, -s.width / 4.0));
        landmarks.insert(BodyLandmark::RightAnkle, offset_point(s, s.width / 4.0));
    }

    debug!(found = landmarks.len(), "Detected body landmarks");
    landmarks
}

/// Hip, bust, crotch and knees, all anchored on the waist index.
fn detect_torso(
    sections: &[CrossSection],
    signals: &Signals,
    waist: usize,
    params: &LandmarkParams,
    landmarks: &mut Landmarks,
) {
    let n = sections.len();

    let bust_end = n * 85 / 100;
    if bust_end > waist + 5 {
        if let Some(i) = argmax_in(&signals.circumference, waist..bust_end) {
            let s = &sections[i];
            landmarks.insert(BodyLandmark::BustApexLeft, offset_point(s, -s.width / 4.0));
            landmarks.insert(BodyLandmark::BustApexRight, offset_point(s, s.width / 4.0));
        }
    }

    if waist <= 5 {
        debug!(waist, "Too few sections below the waist for hip detection");
        return;
    }
    let Some(hip) = argmax_in(&signals.circumference, 0..waist) else {
        return;
    };
    landmarks.insert(BodyLandmark::Hip, center_point(&sections[hip]));

    if hip <= 10 {
        debug!(hip, "Too few sections below the hip for crotch detection");
        return;
    }
    let threshold = signals.circumference[hip] * params.crotch_drop_ratio;
    let Some(drop) = (0..hip).rev().find(|&i| signals.circumference[i] < threshold) else {
        debug!(threshold, "Circumference never drops below crotch threshold");
        return;
    };
    let crotch = (drop + params.crotch_step_back).min(n - 1);
    landmarks.insert(BodyLandmark::Crotch, center_point(&sections[crotch]));

    let floor = signals.heights[0];
    let knee_height = params
        .knee_ratio
        .mul_add(sections[crotch].height - floor, floor);
    let knee = search_sorted(&signals.heights, knee_height);
    if knee > 0 && knee < n {
        let s = &sections[knee];
        landmarks.insert(BodyLandmark::LeftKnee, offset_point(s, -s.width / 4.0));
        landmarks.insert(BodyLandmark::RightKnee, offset_point(s, s.width / 4.0));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    /// Sections with a given circumference profile; width tracks it.
    fn sections_from(circ: &[f64]) -> Vec<CrossSection> {
        circ.iter()
            .enumerate()
            .map(|(i, &c)| {
                let r = c / std::f64::consts::TAU;
                let ring: Vec<_> = (0..32)
                    .map(|k| {
                        let t = f64::from(k) / 32.0 * std::f64::consts::TAU;
                        Point2::new(r * t.cos(), r * t.sin())
                    })
                    .collect();
                #[allow(clippy::cast_precision_loss)]
                let h = i as f64 * 10.0;
                CrossSection::from_points(h, &ring).unwrap()
            })
            .collect()
    }

    /// Symmetric hourglass: wide at both ends, narrowest at index 45.
    fn hourglass() -> Vec<f64> {
        (0..100)
            .map(|i| {
                let d = f64::from(i) - 45.0;
                600.0 + 0.15 * d * d
            })
            .collect()
    }

    #[test]
    fn hourglass_waist_is_narrowest_band() {
        let sections = sections_from(&hourglass());
        let landmarks = detect_landmarks(&sections, None, &LandmarkParams::default());
        assert_relative_eq!(landmarks.height(BodyLandmark::Waist).unwrap(), 450.0);

        let hip = landmarks.height(BodyLandmark::Hip).unwrap();
        let bust = landmarks.height(BodyLandmark::BustApexLeft).unwrap();
        assert!(hip < 450.0);
        assert!(bust > 450.0);
        assert_relative_eq!(
            landmarks.height(BodyLandmark::BustApexRight).unwrap(),
            bust
        );
        let left = landmarks.get(BodyLandmark::BustApexLeft).unwrap();
        let right = landmarks.get(BodyLandmark::BustApexRight).unwrap();
        assert!(left.x < right.x);
    }

    #[test]
    fn crotch_sits_above_the_drop() {
        // Legs (narrow) below index 30, hips peak at 38, waist at 50.
        let circ: Vec<f64> = (0..100)
            .map(|i| match i {
                0..=29 => 400.0,
                30..=45 => 1000.0 - 8.0 * (f64::from(i) - 38.0).abs(),
                46..=60 => 700.0,
                _ => 900.0,
            })
            .collect();
        let sections = sections_from(&circ);
        let landmarks = detect_landmarks(&sections, None, &LandmarkParams::default());

        let crotch = landmarks.height(BodyLandmark::Crotch).unwrap();
        let hip = landmarks.height(BodyLandmark::Hip).unwrap();
        assert!(crotch < hip);
        assert!((250.0..=350.0).contains(&crotch));

        let knee = landmarks.height(BodyLandmark::LeftKnee).unwrap();
        assert!(knee > 0.0 && knee < crotch);
    }

    #[test]
    fn crotch_is_stable_under_small_perturbation() {
        let circ: Vec<f64> = (0..100)
            .map(|i| match i {
                0..=29 => 400.0,
                30..=45 => 1000.0 - 8.0 * (f64::from(i) - 38.0).abs(),
                46..=60 => 700.0,
                _ => 900.0,
            })
            .collect();
        let sections = sections_from(&circ);
        let base = detect_landmarks(&sections, None, &LandmarkParams::default());
        let base_crotch = base.height(BodyLandmark::Crotch).unwrap();
        let base_knee = base.height(BodyLandmark::LeftKnee).unwrap();

        for (ratio, knee_ratio) in [(0.57, 0.43), (0.63, 0.47)] {
            let params = LandmarkParams::default()
                .with_crotch_drop_ratio(ratio)
                .with_knee_ratio(knee_ratio);
            let found = detect_landmarks(&sections, None, &params);
            let crotch = found.height(BodyLandmark::Crotch).unwrap();
            let knee = found.height(BodyLandmark::LeftKnee).unwrap();
            assert!((crotch - base_crotch).abs() <= 30.0);
            assert!((knee - base_knee).abs() <= 30.0);
        }
    }

    #[test]
    fn shoulders_use_widest_upper_band() {
        let mut circ = vec![700.0; 100];
        circ[90] = 1400.0;
        let sections = sections_from(&circ);
        let landmarks = detect_landmarks(&sections, None, &LandmarkParams::default());
        assert_relative_eq!(landmarks.height(BodyLandmark::ShoulderCenter).unwrap(), 900.0);
        let left = landmarks.get(BodyLandmark::LeftShoulder).unwrap();
        let right = landmarks.get(BodyLandmark::RightShoulder).unwrap();
        assert_relative_eq!(right.x - left.x, sections[90].width, epsilon = 1e-9);
    }

    #[test]
    fn few_sections_give_partial_landmarks() {
        let sections = sections_from(&[500.0, 510.0, 520.0]);
        let apex = Point3::new(0.0, 0.0, 30.0);
        let landmarks = detect_landmarks(&sections, Some(apex), &LandmarkParams::default());
        assert!(landmarks.contains(BodyLandmark::TopOfHead));
        assert!(landmarks.contains(BodyLandmark::LeftAnkle));
        assert!(!landmarks.contains(BodyLandmark::Hip));
        assert!(!landmarks.contains(BodyLandmark::Crotch));
        assert!(!landmarks.contains(BodyLandmark::BustApexLeft));
        assert!(!landmarks.contains(BodyLandmark::ShoulderCenter));
    }

    #[test]
    fn no_sections_only_apex() {
        let landmarks = detect_landmarks(&[], Some(Point3::origin()), &LandmarkParams::default());
        assert_eq!(landmarks.len(), 1);
    }
}
