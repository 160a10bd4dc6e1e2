//! Body measurements derived from landmarks and cross-sections.

use scan_section::{nearest_section, CrossSection};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::landmark::{BodyLandmark, Landmarks};
use crate::params::LandmarkParams;

/// Body measurements in millimeters.
///
/// Heights are measured from the floor (lowest vertex). A field is `None`
/// when the landmark it depends on was not detected.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyMeasurements {
    /// Floor to top of head.
    pub total_height: f64,
    /// Floor to shoulder line.
    pub shoulder_height: Option<f64>,
    /// Floor to bust apex.
    pub bust_height: Option<f64>,
    /// Floor to waist.
    pub waist_height: Option<f64>,
    /// Floor to hip.
    pub hip_height: Option<f64>,
    /// Floor to crotch.
    pub crotch_height: Option<f64>,
    /// Floor to knee.
    pub knee_height: Option<f64>,
    /// Floor to ankle.
    pub ankle_height: Option<f64>,

    /// Bust circumference.
    pub bust_circumference: Option<f64>,
    /// Waist circumference.
    pub waist_circumference: Option<f64>,
    /// Hip circumference.
    pub hip_circumference: Option<f64>,
    /// Single-leg thigh circumference.
    pub thigh_circumference: Option<f64>,
    /// Single-leg knee circumference.
    pub knee_circumference: Option<f64>,
    /// Single-leg ankle circumference.
    pub ankle_circumference: Option<f64>,

    /// Distance between the shoulder points.
    pub shoulder_width: Option<f64>,
    /// Waist section width.
    pub waist_width: Option<f64>,
    /// Hip section width.
    pub hip_width: Option<f64>,

    /// Shoulder to waist.
    pub torso_length: Option<f64>,
    /// Waist to crotch, front.
    pub front_rise: Option<f64>,
    /// Waist to crotch, back.
    pub back_rise: Option<f64>,
    /// Crotch to ankle.
    pub inseam: Option<f64>,
    /// Waist to ankle.
    pub outseam: Option<f64>,
}

impl BodyMeasurements {
    /// Present measurements as `(name, value)` pairs, for reports.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let fields = [
            ("shoulder_height", self.shoulder_height),
            ("bust_height", self.bust_height),
            ("waist_height", self.waist_height),
            ("hip_height", self.hip_height),
            ("crotch_height", self.crotch_height),
            ("knee_height", self.knee_height),
            ("ankle_height", self.ankle_height),
            ("bust_circumference", self.bust_circumference),
            ("waist_circumference", self.waist_circumference),
            ("hip_circumference", self.hip_circumference),
            ("thigh_circumference", self.thigh_circumference),
            ("knee_circumference", self.knee_circumference),
            ("ankle_circumference", self.ankle_circumference),
            ("shoulder_width", self.shoulder_width),
            ("waist_width", self.waist_width),
            ("hip_width", self.hip_width),
            ("torso_length", self.torso_length),
            ("front_rise", self.front_rise),
            ("back_rise", self.back_rise),
            ("inseam", self.inseam),
            ("outseam", self.outseam),
        ];
        std::iter::once(("total_height", Some(self.total_height)))
            .chain(fields)
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// Derive measurements. `floor` and `top` are the lowest and highest
/// vertex heights of the scan.
#[must_use]
pub fn extract_measurements(
    sections: &[CrossSection],
    landmarks: &Landmarks,
    floor: f64,
    top: f64,
    params: &LandmarkParams,
) -> BodyMeasurements {
    let height = |l: BodyLandmark| landmarks.height(l);
    let above_floor = |l: BodyLandmark| height(l).map(|h| h - floor);
    let section_at = |l: BodyLandmark| height(l).and_then(|h| nearest_section(sections, h));
    let circumference = |l: BodyLandmark| section_at(l).map(|s| s.circumference);
    let single_leg = |h: Option<f64>| {
        h.and_then(|h| nearest_section(sections, h))
            .map(|s| s.circumference / 2.0)
    };
    let between = |upper: BodyLandmark, lower: BodyLandmark| {
        height(upper).zip(height(lower)).map(|(u, l)| u - l)
    };

    let rise = between(BodyLandmark::Waist, BodyLandmark::Crotch);

    BodyMeasurements {
        total_height: top - floor,
        shoulder_height: above_floor(BodyLandmark::ShoulderCenter),
        bust_height: above_floor(BodyLandmark::BustApexLeft),
        waist_height: above_floor(BodyLandmark::Waist),
        hip_height: above_floor(BodyLandmark::Hip),
        crotch_height: above_floor(BodyLandmark::Crotch),
        knee_height: above_floor(BodyLandmark::LeftKnee),
        ankle_height: above_floor(BodyLandmark::LeftAnkle),

        bust_circumference: circumference(BodyLandmark::BustApexLeft),
        waist_circumference: circumference(BodyLandmark::Waist),
        hip_circumference: circumference(BodyLandmark::Hip),
        thigh_circumference: single_leg(height(BodyLandmark::Crotch).map(|h| h - params.thigh_drop)),
        knee_circumference: single_leg(height(BodyLandmark::LeftKnee)),
        ankle_circumference: single_leg(height(BodyLandmark::LeftAnkle)),

        shoulder_width: landmarks
            .get(BodyLandmark::LeftShoulder)
            .zip(landmarks.get(BodyLandmark::RightShoulder))
            .map(|(l, r)| (l - r).norm()),
        waist_width: section_at(BodyLandmark::Waist).map(|s| s.width),
        hip_width: section_at(BodyLandmark::Hip).map(|s| s.width),

        torso_length: between(BodyLandmark::ShoulderCenter, BodyLandmark::Waist),
        front_rise: rise,
        back_rise: rise,
        inseam: between(BodyLandmark::Crotch, BodyLandmark::LeftAnkle),
        outseam: between(BodyLandmark::Waist, BodyLandmark::LeftAnkle),
    }
}
