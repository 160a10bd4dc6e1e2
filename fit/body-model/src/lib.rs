//! Body scan analysis.
//!
//! Works on an oriented, millimeter-scale body scan (Z up, feet at the
//! bottom):
//!
//! 1. [`cross_sections`](scan_section::cross_sections) slice the body into
//!    horizontal bands
//! 2. [`detect_landmarks`] finds waist, hip, bust, shoulders, crotch, knees
//!    and ankles from the smoothed circumference and width signals
//! 3. [`extract_measurements`] turns landmarks into lengths and
//!    circumferences
//! 4. [`generate_envelope`] expands the surface by movement ease
//!
//! [`BodyModel`] runs these as a checked state machine; [`analyze_body`]
//! runs them all.
//!
//! Scans that defeat a heuristic yield fewer landmarks, never an error.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod analysis;
mod detect;
mod envelope;
mod error;
mod fixtures;
mod landmark;
mod measurements;
mod model;
mod params;

pub use analysis::{analyze_body, BodyAnalysis, BodySummary};
pub use detect::detect_landmarks;
pub use envelope::{generate_envelope, EaseMap, MovementEnvelope, MovementProfile, FALLBACK_EASE};
pub use error::{BodyError, BodyResult};
pub use fixtures::{mannequin, mannequin_rings};
pub use landmark::{BodyLandmark, Landmarks};
pub use measurements::{extract_measurements, BodyMeasurements};
pub use model::{BodyModel, BodyStage};
pub use params::LandmarkParams;
