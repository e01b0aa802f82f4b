//! Forest configuration with builder pattern.
//!
//! [`ForestConfig`] controls how a [`Forest`](crate::repr::Forest) reads
//! feature vectors and how many threads batch scoring may use. It uses the
//! `bon` crate for builder generation.
//!
//! # Example
//!
//! ```
//! use bitforest::config::{AccessPolicy, ForestConfig};
//!
//! // All defaults: lenient access, automatic thread count
//! let config = ForestConfig::builder().build();
//! assert_eq!(config.access_policy, AccessPolicy::Lenient);
//!
//! let config = ForestConfig::builder()
//!     .access_policy(AccessPolicy::Strict)
//!     .n_threads(4)
//!     .build();
//! assert_eq!(config.n_threads, 4);
//! ```

use bon::Builder;

/// How out-of-range feature reads are treated during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Ids at or beyond the vector dimension read as `0.0`.
    #[default]
    Lenient,
    /// Ids at or beyond the vector dimension fail with
    /// [`AccessError::OutOfRange`](crate::data::AccessError::OutOfRange).
    Strict,
}

/// Configuration of a [`Forest`](crate::repr::Forest).
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(derive(Clone, Debug))]
pub struct ForestConfig {
    /// Feature read policy. Default: [`AccessPolicy::Lenient`].
    #[builder(default)]
    pub access_policy: AccessPolicy,

    /// Threads used by batch scoring.
    ///
    /// - `0` = auto (rayon's global pool)
    /// - `1` = sequential
    /// - `n > 1` = exactly `n` threads
    #[builder(default)]
    pub n_threads: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
