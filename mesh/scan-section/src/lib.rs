//! Cross-sections of Z-up scans.
//!
//! Body and garment measurements are read off horizontal slices: each band
//! of vertices is projected to XY and summarized by its convex hull.
//!
//! - [`bands`] / [`cross_sections`] - cut a point cloud into bands
//! - [`CrossSection`] - circumference, width, depth, area of one band
//! - [`convex_hull`], [`polygon_perimeter`], [`polygon_area`] - planar helpers
//! - [`gaussian_smooth`], [`argmin_in`], [`argmax_in`] - signal helpers for
//!   landmark detection

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod hull;
mod section;
mod signal;

pub use hull::{convex_hull, polygon_area, polygon_perimeter, polygon_signed_area};
pub use section::{bands, cross_sections, nearest_section, Band, CrossSection, SectionParams};
pub use signal::{argmax_in, argmin_in, gaussian_smooth, linspace, search_sorted};
