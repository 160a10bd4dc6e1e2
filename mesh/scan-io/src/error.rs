//! Error types for scan I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scan I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading or saving a scan.
#[derive(Debug, Error)]
pub enum IoError {
    /// The format hint does not name a supported format.
    #[error("unsupported mesh format: {hint:?} (expected stl, ply or obj)")]
    UnsupportedFormat {
        /// The hint as given by the caller.
        hint: String,
    },

    /// The bytes could not be parsed as the hinted format, or the parsed
    /// mesh is structurally unusable.
    #[error("corrupt mesh: {message}")]
    CorruptMesh {
        /// Description of what was wrong.
        message: String,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create a `CorruptMesh` error with the given message.
    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptMesh {
            message: message.into(),
        }
    }

    /// Create an `UnsupportedFormat` error for a hint.
    #[must_use]
    pub fn unsupported(hint: impl Into<String>) -> Self {
        Self::UnsupportedFormat { hint: hint.into() }
    }

    /// True for errors caused by the input data rather than the environment.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. } | Self::CorruptMesh { .. })
    }
}
