//! Feature vector access for tree traversal and forest scoring.
//!
//! # Module Structure
//!
//! - [`accessor`]: The [`FeatureVector`] trait and its dense/sparse implementations

pub mod accessor;

pub use accessor::{
    AccessError, FeatureId, FeatureVector, SparseFeatureMap, SparseFeatureVector, Strict,
    FEATURE_ID_ILLEGAL,
};
