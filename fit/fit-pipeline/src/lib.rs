//! Scan-to-pattern fit workflow.
//!
//! Ties the stage crates together behind one [`FitPipeline`]:
//!
//! 1. A [`MeshBackend`] loads each scan and, when it can, cleans, orients
//!    and aligns it
//! 2. `body-model` and `garment-model` analyze the prepared scans
//! 3. `fit-analysis` compares them and recommends alterations
//! 4. `pattern-gen` turns the recommendations into pieces and drawings
//!
//! [`Capabilities`] say which stages are on. Mesh processing and pattern
//! generation are optional: when off, the pipeline carries on and records
//! them in the reports as skipped. The analysis stages are required by the
//! operations that use them and fail with
//! [`PipelineError::Unavailable`].
//!
//! A [`Session`] keeps the latest body and garment between calls, so a fit
//! can be run after both have been uploaded separately.
//!
//! # Example
//!
//! ```
//! use fit_pipeline::{Feature, FitPipeline, PipelineConfig, Session};
//!
//! let pipeline = FitPipeline::new(PipelineConfig::default());
//! assert_eq!(pipeline.capabilities().health().status, "healthy");
//!
//! let session = Session::new();
//! assert!(pipeline.session_fit(&session).is_err());
//! assert!(pipeline.capabilities().has(Feature::PatternGeneration));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod backend;
mod capability;
mod config;
mod error;
mod pipeline;
mod report;
mod session;

pub use backend::{MeshBackend, NativeBackend, PassthroughBackend};
pub use capability::{Capabilities, Feature, HealthReport};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::FitPipeline;
pub use report::{FitReport, Workflow, WorkflowReport};
pub use session::{
    BodyReport, BodyScan, GarmentReport, GarmentScan, PreparedScan, ScanReport, ScanRole,
    Session, SessionStatus,
};
