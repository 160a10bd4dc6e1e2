//! Body-to-garment fit analysis.
//!
//! Takes an analyzed body and an analyzed garment in a shared frame and
//! reports what is wrong and how to fix it:
//!
//! 1. [`SurfaceIndex`] gives each body vertex a signed distance to the
//!    garment (positive is room to spare, negative is the body pushing
//!    through)
//! 2. [`ZoneClassifier`] assigns body heights to [`BodyZone`]s
//! 3. the detectors in this crate turn distances, length deficits and
//!    movement-envelope clearance into [`FitIssue`]s, one per kind and zone
//! 4. [`recommend`] maps issues to prioritized [`Recommendation`]s and
//!    [`fit_score`] sums severity penalties into a 0 to 100 score
//!
//! [`analyze_fit`] runs them all.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod analyze;
mod detect;
mod distance;
mod error;
mod issue;
mod params;
mod recommend;
mod zone;

pub use analyze::{analyze_fit, FitAnalysisResult};
pub use detect::{compression_issues, gap_issues, length_issues, movement_issues, BodyFrame};
pub use distance::{vertex_normals, SurfaceIndex};
pub use error::{FitError, FitResult};
pub use issue::{fit_score, FitIssue, IssueKind, Severity};
pub use params::FitParams;
pub use recommend::{recommend, recommend_for, ModificationKind, Recommendation};
pub use zone::{BodyZone, ZoneClassifier, ZoneRule, ZONE_RULES};
