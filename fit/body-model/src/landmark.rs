//! Anatomical landmarks.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named anatomical points detected on a body scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyLandmark {
    /// Highest point of the scan.
    TopOfHead,
    /// Outer end of the left shoulder line.
    LeftShoulder,
    /// Outer end of the right shoulder line.
    RightShoulder,
    /// Center of the shoulder section.
    ShoulderCenter,
    /// Left bust apex.
    BustApexLeft,
    /// Right bust apex.
    BustApexRight,
    /// Narrowest torso section.
    Waist,
    /// Widest section below the waist.
    Hip,
    /// Where the legs separate.
    Crotch,
    /// Left knee.
    LeftKnee,
    /// Right knee.
    RightKnee,
    /// Left ankle.
    LeftAnkle,
    /// Right ankle.
    RightAnkle,
}

impl BodyLandmark {
    /// Every landmark, head to foot.
    pub const ALL: [Self; 13] = [
        Self::TopOfHead,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::ShoulderCenter,
        Self::BustApexLeft,
        Self::BustApexRight,
        Self::Waist,
        Self::Hip,
        Self::Crotch,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Snake-case name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopOfHead => "top_of_head",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::ShoulderCenter => "shoulder_center",
            Self::BustApexLeft => "bust_apex_left",
            Self::BustApexRight => "bust_apex_right",
            Self::Waist => "waist",
            Self::Hip => "hip",
            Self::Crotch => "crotch",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detected landmark positions. Absent landmarks could not be found.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Landmarks(BTreeMap<BodyLandmark, Point3<f64>>);

impl Landmarks {
    /// No landmarks.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a landmark, replacing any previous position.
    pub fn insert(&mut self, landmark: BodyLandmark, position: Point3<f64>) {
        self.0.insert(landmark, position);
    }

    /// Position of a landmark.
    #[must_use]
    pub fn get(&self, landmark: BodyLandmark) -> Option<Point3<f64>> {
        self.0.get(&landmark).copied()
    }

    /// Height (Z) of a landmark.
    #[must_use]
    pub fn height(&self, landmark: BodyLandmark) -> Option<f64> {
        self.get(landmark).map(|p| p.z)
    }

    /// True if the landmark was detected.
    #[must_use]
    pub fn contains(&self, landmark: BodyLandmark) -> bool {
        self.0.contains_key(&landmark)
    }

    /// Number of detected landmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Landmarks in head-to-foot order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyLandmark, Point3<f64>)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn ordered_head_to_foot() {
        let mut landmarks = Landmarks::new();
        landmarks.insert(BodyLandmark::RightAnkle, Point3::new(0.0, 0.0, 30.0));
        landmarks.insert(BodyLandmark::Waist, Point3::new(0.0, 0.0, 1000.0));
        landmarks.insert(BodyLandmark::TopOfHead, Point3::new(0.0, 0.0, 1700.0));

        let names: Vec<_> = landmarks.iter().map(|(l, _)| l.name()).collect();
        assert_eq!(names, ["top_of_head", "waist", "right_ankle"]);
        assert_eq!(landmarks.height(BodyLandmark::Waist), Some(1000.0));
        assert!(landmarks.get(BodyLandmark::Hip).is_none());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = BodyLandmark::ALL.iter().map(|l| l.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BodyLandmark::ALL.len());
    }
}
