//! Error types for garment analysis.

use thiserror::Error;

/// Result type for garment analysis.
pub type GarmentResult<T> = Result<T, GarmentError>;

/// Errors raised while analyzing a garment scan.
///
/// A garment whose seams or measurements cannot be found is not an error;
/// those results are simply empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GarmentError {
    /// The scan has no vertices.
    #[error("garment scan has no vertices")]
    EmptyMesh,

    /// A garment type name was not recognized.
    #[error("unknown garment type '{name}' (expected pants, shirt, dress, skirt or jacket)")]
    UnknownType {
        /// The name as given.
        name: String,
    },
}

impl GarmentError {
    pub(crate) fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }
}
