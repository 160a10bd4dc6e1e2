//! Body zones and the rules that assign a height to one.

use std::fmt;

use body_model::{BodyLandmark, Landmarks};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Region of the body an issue belongs to, head to foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyZone {
    /// Shoulder line and above.
    Shoulders,
    /// Chest.
    Bust,
    /// Waist.
    Waist,
    /// Hips and seat.
    Hips,
    /// Crotch.
    Crotch,
    /// Upper legs.
    Thighs,
    /// Knees.
    Knees,
    /// Lower legs.
    Calves,
    /// Ankles and hem line.
    Ankles,
}

impl BodyZone {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shoulders => "shoulders",
            Self::Bust => "bust",
            Self::Waist => "waist",
            Self::Hips => "hips",
            Self::Crotch => "crotch",
            Self::Thighs => "thighs",
            Self::Knees => "knees",
            Self::Calves => "calves",
            Self::Ankles => "ankles",
        }
    }
}

impl fmt::Display for BodyZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A zone anchored on a landmark: heights within `half_width` of the
/// landmark belong to `zone`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRule {
    /// Zone assigned.
    pub zone: BodyZone,
    /// Anchor landmark.
    pub landmark: BodyLandmark,
    /// Half-height of the band (mm).
    pub half_width: f64,
}

impl ZoneRule {
    const fn new(zone: BodyZone, landmark: BodyLandmark, half_width: f64) -> Self {
        Self {
            zone,
            landmark,
            half_width,
        }
    }
}

/// Landmark rules, tried in order; the first match wins.
pub const ZONE_RULES: [ZoneRule; 6] = [
    ZoneRule::new(BodyZone::Shoulders, BodyLandmark::ShoulderCenter, 100.0),
    ZoneRule::new(BodyZone::Bust, BodyLandmark::BustApexLeft, 100.0),
    ZoneRule::new(BodyZone::Waist, BodyLandmark::Waist, 100.0),
    ZoneRule::new(BodyZone::Hips, BodyLandmark::Hip, 100.0),
    ZoneRule::new(BodyZone::Crotch, BodyLandmark::Crotch, 80.0),
    ZoneRule::new(BodyZone::Knees, BodyLandmark::LeftKnee, 80.0),
];

/// Relative-height fallback for heights no rule claims: a height above
/// `fraction` of the body belongs to `zone`. Ankles take the rest.
const FALLBACK: [(f64, BodyZone); 7] = [
    (0.85, BodyZone::Shoulders),
    (0.7, BodyZone::Bust),
    (0.55, BodyZone::Waist),
    (0.4, BodyZone::Hips),
    (0.3, BodyZone::Thighs),
    (0.2, BodyZone::Knees),
    (0.1, BodyZone::Calves),
];

/// Assigns body heights to zones for one body.
///
/// # Example
///
/// ```
/// use body_model::{BodyLandmark, Landmarks};
/// use fit_analysis::{BodyZone, ZoneClassifier};
/// use nalgebra::Point3;
///
/// let mut landmarks = Landmarks::new();
/// landmarks.insert(BodyLandmark::Hip, Point3::new(0.0, 0.0, 900.0));
/// let zones = ZoneClassifier::new(&landmarks, 0.0, 1700.0);
/// assert_eq!(zones.classify(950.0), BodyZone::Hips);
/// assert_eq!(zones.classify(1600.0), BodyZone::Shoulders);
/// assert_eq!(zones.classify(50.0), BodyZone::Ankles);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneClassifier {
    anchors: Vec<(BodyZone, f64, f64)>,
    floor: f64,
    height: f64,
}

impl ZoneClassifier {
    /// Resolve [`ZONE_RULES`] against `landmarks`. `floor` is the lowest
    /// body vertex and `height` the floor-to-top distance.
    #[must_use]
    pub fn new(landmarks: &Landmarks, floor: f64, height: f64) -> Self {
        let anchors = ZONE_RULES
            .iter()
            .filter_map(|rule| {
                landmarks
                    .height(rule.landmark)
                    .map(|h| (rule.zone, h, rule.half_width))
            })
            .collect();
        Self {
            anchors,
            floor,
            height,
        }
    }

    /// Zone of a body point at height `z`.
    #[must_use]
    pub fn classify(&self, z: f64) -> BodyZone {
        if let Some(&(zone, _, _)) = self
            .anchors
            .iter()
            .find(|(_, h, half_width)| (z - h).abs() < *half_width)
        {
            return zone;
        }
        let rel = if self.height > 0.0 {
            (z - self.floor) / self.height
        } else {
            0.0
        };
        FALLBACK
            .iter()
            .find(|(fraction, _)| rel > *fraction)
            .map_or(BodyZone::Ankles, |&(_, zone)| zone)
    }
}
