//! Sewing pattern pieces for garment alterations.
//!
//! Turns prioritized fit recommendations into pieces a sewist can cut:
//!
//! 1. [`FabricType`] fixes the seam allowance
//! 2. [`PatternGenerator`] shapes one piece per recommendation: tapered
//!    extensions, diamond and football gussets, dart templates and side
//!    insert panels, see [`GeneratedPattern`]
//! 3. [`inset_polygon`] derives each stitch line from its cut line
//! 4. [`render_svg`] draws every piece at 1:1 scale
//!
//! [`generate_patterns`] runs them all and collects a [`PatternSet`].
//! Take-in alterations produce no piece; their instructions are kept in
//! [`PatternSet::instructions_only`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod fabric;
mod generate;
mod offset;
mod shape;
mod svg;

pub use error::{PatternError, PatternResult};
pub use fabric::FabricType;
pub use generate::{generate_patterns, generate_patterns_with, PatternGenerator, PatternSet};
pub use offset::{inset_polygon, MITER_LIMIT};
pub use shape::{GeneratedPattern, GrainLine, Label, Notch, PieceKind, FOOTBALL_SAMPLES};
pub use svg::{render_svg, SvgStyle};
