//! Error types for pattern generation.

use thiserror::Error;

/// Result type for pattern generation.
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors raised while generating patterns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    /// A recommendation asks for a non-positive or non-finite amount.
    #[error("recommendation at '{location}' has unusable amount {amount}")]
    InvalidAmount {
        /// Garment location of the recommendation.
        location: String,
        /// The amount given.
        amount: f64,
    },

    /// Fabric name not recognized.
    #[error("unknown fabric type '{name}'")]
    UnknownFabric {
        /// The name given.
        name: String,
    },
}
