//! bitforest: compact online scoring for FIFO ensembles of decision trees.
//!
//! Trees are authored as owned [`Leaf`] structures and compiled into a
//! [`Forest`], which scores a feature vector against every live tree at once
//! by intersecting 64-bit leaf masks stored in per-feature, threshold-sorted
//! buckets. The ensemble grows at the back and retires its oldest tree from
//! the front, which suits sliding-window online learning.
//!
//! # Key Types
//!
//! - [`Leaf`] - Owned binary tree with a reference walk
//! - [`Forest`] - Compiled FIFO ensemble returning one value per tree
//! - [`FeatureVector`] - Read access to dense and sparse inputs
//! - [`ForestConfig`] - Access policy and batch-scoring threads
//!
//! # Example
//!
//! ```
//! use bitforest::{Forest, Leaf};
//!
//! let mut tree = Leaf::new_internal(0, -2.5, 0.0f32, 1.0)?;
//! tree.set_right(Some(Leaf::new_internal(1, 0.0, 1.0, 2.0)?))?;
//!
//! let mut forest = Forest::new();
//! forest.enqueue([&tree, &tree])?;
//! assert_eq!(forest.predict(&[-2.0f32, 1.0])?, vec![2.0, 2.0]);
//! # Ok::<(), bitforest::ForestError>(())
//! ```
//!
//! # Persistence
//!
//! Compiled forests round-trip through JSON, see [`persist`].

pub mod config;
pub mod data;
pub mod error;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{AccessPolicy, ForestConfig};
pub use error::{ForestError, Result};

pub use data::{
    AccessError, FeatureId, FeatureVector, SparseFeatureMap, SparseFeatureVector, Strict,
    FEATURE_ID_ILLEGAL,
};

pub use repr::{Forest, ForestValidationError, Leaf, MAX_LEAVES};

pub use utils::{run_with_threads, Parallelism};
