//! Errors for forest persistence.

use crate::data::FeatureId;
use crate::repr::ForestValidationError;

/// Errors raised when reading a serialized forest.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid forest: {0}")]
    Validation(#[from] ForestValidationError),
}

/// Errors raised when writing a forest.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON has no representation for infinities.
    #[error("split on feature {feature_id} has a non-finite threshold")]
    NonFiniteThreshold { feature_id: FeatureId },
}
