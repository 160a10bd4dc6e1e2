//! Movement envelope: the body surface pushed outward by the ease each
//! region needs to move freely.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector2};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::landmark::{BodyLandmark, Landmarks};

/// Ease applied to vertices outside every landmark zone (mm).
pub const FALLBACK_EASE: f64 = 20.0;

/// How much room the wearer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MovementProfile {
    /// Everyday active movement.
    #[default]
    Default,
    /// Dancing, kicks, splits.
    Wild,
}

impl MovementProfile {
    /// Ease table for this profile.
    #[must_use]
    pub const fn ease(self) -> EaseMap {
        match self {
            Self::Default => EaseMap {
                shoulder: 50.0,
                bust: 30.0,
                waist: 20.0,
                hip: 40.0,
                crotch: 60.0,
                knee: 50.0,
                elbow: 40.0,
            },
            Self::Wild => EaseMap {
                shoulder: 80.0,
                bust: 50.0,
                waist: 40.0,
                hip: 70.0,
                crotch: 100.0,
                knee: 80.0,
                elbow: 60.0,
            },
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Wild => "wild",
        }
    }
}

impl fmt::Display for MovementProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MovementProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "wild" => Ok(Self::Wild),
            other => Err(format!("unknown movement profile '{other}'")),
        }
    }
}

/// Ease per body region, in millimeters.
///
/// `elbow` is carried for completeness; arm landmarks are not detected, so
/// no vertex currently receives it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EaseMap {
    /// Around and above the shoulder line.
    pub shoulder: f64,
    /// Around the bust.
    pub bust: f64,
    /// Around the waist.
    pub waist: f64,
    /// Around the hip.
    pub hip: f64,
    /// Around the crotch.
    pub crotch: f64,
    /// Around the knees.
    pub knee: f64,
    /// Around the elbows.
    pub elbow: f64,
}

impl EaseMap {
    /// Ease for a vertex at `height`.
    ///
    /// Zones are tried in order knee, crotch, hip, waist, bust (each within
    /// 100 mm of its landmark), then shoulder (above the shoulder line less
    /// 50 mm). Anything else gets [`FALLBACK_EASE`].
    #[must_use]
    pub fn ease_at(&self, height: f64, landmarks: &Landmarks) -> f64 {
        let near = |landmark: BodyLandmark| {
            landmarks
                .height(landmark)
                .is_some_and(|h| (height - h).abs() < 100.0)
        };
        let zones = [
            (BodyLandmark::LeftKnee, self.knee),
            (BodyLandmark::Crotch, self.crotch),
            (BodyLandmark::Hip, self.hip),
            (BodyLandmark::Waist, self.waist),
            (BodyLandmark::BustApexLeft, self.bust),
        ];
        if let Some(&(_, ease)) = zones.iter().find(|(landmark, _)| near(*landmark)) {
            return ease;
        }
        match landmarks.height(BodyLandmark::ShoulderCenter) {
            Some(shoulder) if height > shoulder - 50.0 => self.shoulder,
            _ => FALLBACK_EASE,
        }
    }
}

/// The body surface expanded by movement ease.
///
/// `expanded[i]` corresponds to `base[i]`; faces of the body mesh apply to
/// both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MovementEnvelope {
    /// Profile the ease came from.
    pub profile: MovementProfile,
    /// Ease table used.
    pub ease: EaseMap,
    /// Original vertex positions.
    pub base: Vec<Point3<f64>>,
    /// Positions pushed outward by their zone's ease.
    pub expanded: Vec<Point3<f64>>,
}

impl MovementEnvelope {
    /// Largest outward displacement of any vertex.
    #[must_use]
    pub fn max_displacement(&self) -> f64 {
        self.base
            .iter()
            .zip(&self.expanded)
            .map(|(b, e)| (e - b).norm())
            .fold(0.0, f64::max)
    }
}

/// Push every vertex horizontally away from the body's vertical axis (the
/// XY mean of all vertices) by the ease of its zone.
///
/// # Example
///
/// ```
/// use body_model::{generate_envelope, Landmarks, MovementProfile};
/// use nalgebra::Point3;
///
/// let base = vec![Point3::new(100.0, 0.0, 500.0), Point3::new(-100.0, 0.0, 500.0)];
/// let envelope = generate_envelope(&base, &Landmarks::new(), MovementProfile::Default);
/// assert!((envelope.expanded[0].x - 120.0).abs() < 1e-9);
/// assert!((envelope.expanded[1].x + 120.0).abs() < 1e-9);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_envelope(
    base: &[Point3<f64>],
    landmarks: &Landmarks,
    profile: MovementProfile,
) -> MovementEnvelope {
    let ease = profile.ease();
    let axis = if base.is_empty() {
        Vector2::zeros()
    } else {
        base.iter()
            .fold(Vector2::zeros(), |acc, p| acc + Vector2::new(p.x, p.y))
            / base.len() as f64
    };

    let expanded = base
        .iter()
        .map(|p| {
            let radial = Vector2::new(p.x, p.y) - axis;
            match radial.try_normalize(f64::EPSILON) {
                Some(dir) => {
                    let push = dir * ease.ease_at(p.z, landmarks);
                    Point3::new(p.x + push.x, p.y + push.y, p.z)
                }
                None => *p,
            }
        })
        .collect();

    let envelope = MovementEnvelope {
        profile,
        ease,
        base: base.to_vec(),
        expanded,
    };
    debug!(
        profile = %profile,
        max_displacement = envelope.max_displacement(),
        "Generated movement envelope"
    );
    envelope
}
