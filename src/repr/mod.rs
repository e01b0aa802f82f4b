//! Tree representations.
//!
//! - [`Leaf`]: owned binary tree for authoring, inspection and reference walks
//! - [`Forest`]: FIFO ensemble compiled into per-feature split buckets
//! - [`FeatureBucket`]: sorted splits of all live trees on one feature

pub mod bucket;
pub mod forest;
pub mod leaf;

pub use bucket::FeatureBucket;
pub use forest::{CompiledTree, Forest, ForestValidationError, MAX_LEAVES};
pub use leaf::Leaf;
