//! Error types for the fit pipeline.

use thiserror::Error;

use crate::capability::Feature;
use crate::session::ScanRole;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while running the pipeline.
///
/// Stage errors are wrapped unchanged so callers can match on the original
/// variant.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading a scan failed.
    #[error("scan loading failed: {0}")]
    Io(#[from] scan_io::IoError),

    /// Body analysis failed.
    #[error("body analysis failed: {0}")]
    Body(#[from] body_model::BodyError),

    /// Garment analysis failed.
    #[error("garment analysis failed: {0}")]
    Garment(#[from] garment_model::GarmentError),

    /// Fit analysis failed.
    #[error("fit analysis failed: {0}")]
    Fit(#[from] fit_analysis::FitError),

    /// Pattern generation failed.
    #[error("pattern generation failed: {0}")]
    Pattern(#[from] pattern_gen::PatternError),

    /// The configuration could not be read or written.
    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A required stage is disabled.
    #[error("missing features: {}", join(features))]
    Unavailable {
        /// Every required feature that is off.
        features: Vec<Feature>,
    },

    /// A session operation needs a scan that has not been uploaded.
    #[error("no {role} scan loaded; upload one first")]
    MissingScan {
        /// Which scan is missing.
        role: ScanRole,
    },
}

fn join(features: &[Feature]) -> String {
    features
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PipelineError {
    /// True for errors caused by the uploaded data rather than the setup.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        match self {
            Self::Io(err) => err.is_format_error(),
            Self::Body(_) | Self::Garment(_) | Self::Fit(_) | Self::Pattern(_) => true,
            Self::Config(_) | Self::Unavailable { .. } | Self::MissingScan { .. } => false,
        }
    }
}
