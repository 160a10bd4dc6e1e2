//! Error types for body analysis.

use thiserror::Error;

use crate::model::BodyStage;

/// Result type for body analysis.
pub type BodyResult<T> = Result<T, BodyError>;

/// Errors raised by [`BodyModel`](crate::BodyModel).
///
/// Missing landmarks are not errors; they are simply absent from the
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The scan has no vertices.
    #[error("body scan has no vertices")]
    EmptyMesh,

    /// A stage was run before its prerequisite, or twice.
    #[error("cannot run {requested} while model is {current} (requires {required})")]
    StageOrder {
        /// Stage that was attempted.
        requested: &'static str,
        /// Stage the model must be in.
        required: BodyStage,
        /// Stage the model is in.
        current: BodyStage,
    },
}

impl BodyError {
    pub(crate) const fn stage_order(
        requested: &'static str,
        required: BodyStage,
        current: BodyStage,
    ) -> Self {
        Self::StageOrder {
            requested,
            required,
            current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_message() {
        let err = BodyError::stage_order(
            "landmark detection",
            BodyStage::CrossSectioned,
            BodyStage::Uninitialized,
        );
        let text = err.to_string();
        assert!(text.contains("landmark detection"));
        assert!(text.contains("uninitialized"));
        assert!(text.contains("cross-sectioned"));
    }
}
