//! Orientation, unit handling and alignment for scans.
//!
//! After loading and cleaning, scans still sit in whatever frame and unit
//! the scanner used. This crate moves them into the canonical frame:
//!
//! - [`orient_body`] - center, PCA-align height to +Z, feet down
//! - [`orient_garment`] - center and PCA-align, no flip
//! - [`align`] - convert both scans to millimeters and overlay centroids
//! - [`LengthUnit`] - unit detection from human-scale extents
//! - [`MeshStats`] - quick summary used by inspection tools
//!
//! A scan without a dominant axis (a blob, a sphere) is not an error: the
//! rotation falls back to identity and [`OrientReport::fallback`] says why.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod align;
mod orient;
mod pca;
mod stats;
mod units;

pub use align::{align, AlignReport};
pub use orient::{
    orient_body, orient_body_with, orient_garment, AlignmentFailure, OrientParams, OrientReport,
};
pub use pca::{pca_points, PcaResult};
pub use stats::MeshStats;
pub use units::{convert_units, LengthUnit};
