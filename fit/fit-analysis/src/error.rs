//! Error types for fit analysis.

use thiserror::Error;

/// Result type for fit analysis.
pub type FitResult<T> = Result<T, FitError>;

/// Errors raised by [`analyze_fit`](crate::analyze_fit).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    /// The garment has no vertices to measure against.
    #[error("garment scan has no vertices")]
    EmptyGarment,

    /// The body has no vertices to measure from.
    #[error("body scan has no vertices")]
    EmptyBody,
}
