//! Garment scan analysis.
//!
//! Works on an oriented, millimeter-scale garment scan (Z up):
//!
//! 1. [`classify_garment`] tells pants from single-tube garments by counting
//!    silhouette islands
//! 2. [`detect_seams`] chains boundary and crease edges into classified
//!    seam lines
//! 3. [`extract_garment_measurements`] reads circumferences and lengths off
//!    horizontal sections
//! 4. [`segment_pieces`] splits the garment into flattened pattern pieces
//!
//! [`analyze_garment`] runs them all.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod analysis;
mod classify;
mod error;
mod fixtures;
mod kind;
mod measurements;
mod params;
mod pieces;
mod seams;

pub use analysis::{analyze_garment, GarmentAnalysis, GarmentSummary};
pub use classify::{classify_garment, count_islands, silhouette_islands};
pub use error::{GarmentError, GarmentResult};
pub use fixtures::{pants, tube};
pub use kind::{GarmentType, SeamKind};
pub use measurements::{extract_garment_measurements, GarmentMeasurements};
pub use params::GarmentParams;
pub use pieces::{segment_pieces, PatternPiece};
pub use seams::{detect_seams, seam_candidates, trace_chains, Seam};
