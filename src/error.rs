//! Errors raised while authoring, compiling and scoring trees.

use crate::data::{AccessError, FeatureId};

/// Result alias used across tree and forest operations.
pub type Result<T> = std::result::Result<T, ForestError>;

/// Errors raised by [`Leaf`](crate::repr::Leaf) and [`Forest`](crate::repr::Forest).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    /// The reserved sentinel was used as a split feature.
    #[error("feature id must be valid")]
    IllegalFeatureId,

    #[error("terminal leaf does not have a split")]
    NotInternal,

    #[error("non-terminal leaf does not have a value")]
    NotTerminal,

    #[error("child of a non-terminal leaf must not be absent")]
    NullChild,

    /// A tree has more terminal leaves than a mask has bits.
    #[error("the number of leaves in the tree must not be greater than 64, got {leaves}")]
    CapacityExceeded { leaves: usize },

    #[error("threshold of the split on feature {feature_id} is NaN")]
    NanThreshold { feature_id: FeatureId },

    /// Propagated verbatim from the feature vector.
    #[error(transparent)]
    Access(#[from] AccessError),
}
