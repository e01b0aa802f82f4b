//! Read-only feature access for a single data point.
//!
//! This module provides the capability consumed by both [`Leaf::predict`] and
//! [`Forest::predict`]:
//!
//! - [`FeatureVector`]: `dimension()` plus a fallible `get(id)`
//! - Dense implementations on `[f32]`, `[f32; N]` and `Vec<f32>`
//! - [`SparseFeatureVector`]: sorted `(id, value)` pairs
//! - [`SparseFeatureMap`]: fixed dimension backed by a hash map
//! - [`Strict`]: adapter rejecting ids at or beyond the dimension
//!
//! # Contract
//!
//! Reading an id at or beyond [`FeatureVector::dimension`] yields `0.0`, not an
//! error. Only [`FEATURE_ID_ILLEGAL`] fails. Wrap a vector in [`Strict`] (or
//! configure [`AccessPolicy::Strict`]) to turn out-of-range reads into errors.
//!
//! [`Leaf::predict`]: crate::repr::Leaf::predict
//! [`Forest::predict`]: crate::repr::Forest::predict
//! [`AccessPolicy::Strict`]: crate::config::AccessPolicy::Strict

use std::collections::HashMap;

// ============================================================================
// Feature identifiers
// ============================================================================

/// Identifier of a feature inside a vector.
pub type FeatureId = u32;

/// Reserved id that never names a real feature.
///
/// Accessors always fail for it, and leaves refuse it as a split feature.
pub const FEATURE_ID_ILLEGAL: FeatureId = FeatureId::MAX;

/// Errors raised by a [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("feature id must be a legal one")]
    IllegalFeatureId,

    #[error("feature id {id} is out of range [0:{dimension}]")]
    OutOfRange { id: FeatureId, dimension: usize },
}

#[inline]
fn check_legal(id: FeatureId) -> Result<(), AccessError> {
    if id == FEATURE_ID_ILLEGAL {
        Err(AccessError::IllegalFeatureId)
    } else {
        Ok(())
    }
}

// ============================================================================
// FeatureVector Trait
// ============================================================================

/// Read-only access to the feature values of one data point.
///
/// Storage managers only need to expose reads, so any layout (dense buffer,
/// sparse pairs, columnar store) can back a vector.
pub trait FeatureVector {
    /// Vector dimension.
    fn dimension(&self) -> usize;

    /// Get the value of feature `id`.
    ///
    /// Ids at or beyond the dimension return `0.0`. Fails with
    /// [`AccessError::IllegalFeatureId`] for [`FEATURE_ID_ILLEGAL`].
    fn get(&self, id: FeatureId) -> Result<f32, AccessError>;
}

impl FeatureVector for [f32] {
    #[inline]
    fn dimension(&self) -> usize {
        self.len()
    }

    #[inline]
    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        check_legal(id)?;
        Ok(<[f32]>::get(self, id as usize).copied().unwrap_or(0.0))
    }
}

// Enables `&[0.5f32, 1.0]` syntax
impl<const N: usize> FeatureVector for [f32; N] {
    #[inline]
    fn dimension(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        FeatureVector::get(self.as_slice(), id)
    }
}

impl FeatureVector for Vec<f32> {
    #[inline]
    fn dimension(&self) -> usize {
        self.len()
    }

    #[inline]
    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        FeatureVector::get(self.as_slice(), id)
    }
}

impl<T: FeatureVector + ?Sized> FeatureVector for &T {
    #[inline]
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    #[inline]
    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        (**self).get(id)
    }
}

// ============================================================================
// SparseFeatureVector
// ============================================================================

/// Sparse data point stored as `(id, value)` pairs sorted by id.
///
/// Missing ids read as `0.0`. The dimension is one past the largest stored id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseFeatureVector {
    entries: Vec<(FeatureId, f32)>,
}

impl SparseFeatureVector {
    /// Create a vector from arbitrary-order pairs.
    ///
    /// Pairs are sorted by id; for duplicated ids the first pair given wins.
    pub fn new(mut entries: Vec<(FeatureId, f32)>) -> Self {
        entries.sort_by_key(|&(id, _)| id);
        entries.dedup_by_key(|&mut (id, _)| id);
        Self { entries }
    }

    /// Stored pairs in ascending id order.
    #[inline]
    pub fn entries(&self) -> &[(FeatureId, f32)] {
        &self.entries
    }

    /// Number of stored (non-default) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(FeatureId, f32)> for SparseFeatureVector {
    fn from_iter<I: IntoIterator<Item = (FeatureId, f32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FeatureVector for SparseFeatureVector {
    fn dimension(&self) -> usize {
        self.entries.last().map_or(0, |&(id, _)| id as usize + 1)
    }

    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        check_legal(id)?;
        Ok(self
            .entries
            .binary_search_by_key(&id, |&(key, _)| key)
            .map_or(0.0, |pos| self.entries[pos].1))
    }
}

// ============================================================================
// SparseFeatureMap
// ============================================================================

/// Sparse data point with a fixed dimension, backed by a hash map.
///
/// Suited to incremental construction via [`set`](Self::set).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseFeatureMap {
    dimension: usize,
    values: HashMap<FeatureId, f32>,
}

impl SparseFeatureMap {
    /// Create an empty map with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            values: HashMap::new(),
        }
    }

    /// Set the value of feature `id`.
    ///
    /// Fails for [`FEATURE_ID_ILLEGAL`] and for ids at or beyond the dimension.
    pub fn set(&mut self, id: FeatureId, value: f32) -> Result<(), AccessError> {
        check_legal(id)?;
        if id as usize >= self.dimension {
            return Err(AccessError::OutOfRange {
                id,
                dimension: self.dimension,
            });
        }
        self.values.insert(id, value);
        Ok(())
    }

    /// Number of explicitly set entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl FeatureVector for SparseFeatureMap {
    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        check_legal(id)?;
        Ok(self.values.get(&id).copied().unwrap_or(0.0))
    }
}

// ============================================================================
// Strict adapter
// ============================================================================

/// Adapter that fails for ids at or beyond the wrapped vector's dimension.
///
/// ```
/// use bitforest::data::{AccessError, FeatureVector, Strict};
///
/// let x = vec![1.0f32, 2.0];
/// assert_eq!(FeatureVector::get(&x, 5), Ok(0.0));
/// assert_eq!(
///     Strict(&x).get(5),
///     Err(AccessError::OutOfRange { id: 5, dimension: 2 })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strict<V>(pub V);

impl<V: FeatureVector> FeatureVector for Strict<V> {
    #[inline]
    fn dimension(&self) -> usize {
        self.0.dimension()
    }

    #[inline]
    fn get(&self, id: FeatureId) -> Result<f32, AccessError> {
        check_legal(id)?;
        let dimension = self.0.dimension();
        if id as usize >= dimension {
            return Err(AccessError::OutOfRange { id, dimension });
        }
        self.0.get(id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_vector_defaults_beyond_dimension() {
        let x = vec![-2.0f32, -1.0, 0.0, 1.0, 2.0];
        assert_eq!(x.dimension(), 5);
        assert_eq!(FeatureVector::get(&x, 0), Ok(-2.0));
        assert_eq!(FeatureVector::get(&x, 1), Ok(-1.0));
        assert_eq!(FeatureVector::get(&x, 4), Ok(2.0));
        assert_eq!(FeatureVector::get(&x, 5), Ok(0.0));
        assert_eq!(
            FeatureVector::get(&x, FEATURE_ID_ILLEGAL),
            Err(AccessError::IllegalFeatureId)
        );
    }

    #[test]
    fn dense_array_and_slice_agree() {
        let arr = [0.5f32, 1.5, 2.5];
        let slice: &[f32] = &arr;
        for id in 0..5 {
            assert_eq!(FeatureVector::get(&arr, id), FeatureVector::get(slice, id));
        }
        assert_eq!(arr.dimension(), slice.dimension());
    }

    #[test]
    fn sparse_vector_sorts_entries() {
        let x = SparseFeatureVector::new(vec![(1, -1.0), (4, 2.0), (0, -2.0)]);
        assert_eq!(x.entries(), &[(0, -2.0), (1, -1.0), (4, 2.0)]);
        assert_eq!(x.dimension(), 5);
        assert_eq!(x.get(0), Ok(-2.0));
        assert_eq!(x.get(1), Ok(-1.0));
        assert_eq!(x.get(2), Ok(0.0));
        assert_eq!(x.get(3), Ok(0.0));
        assert_eq!(x.get(4), Ok(2.0));
        assert_eq!(x.get(5), Ok(0.0));
        assert_eq!(x.get(FEATURE_ID_ILLEGAL), Err(AccessError::IllegalFeatureId));
    }

    #[test]
    fn sparse_vector_keeps_first_duplicate() {
        let x: SparseFeatureVector = [(3, 1.0), (3, 7.0), (0, 2.0)].into_iter().collect();
        assert_eq!(x.nnz(), 2);
        assert_eq!(x.get(3), Ok(1.0));
    }

    #[test]
    fn sparse_map_set_and_get() {
        let mut x = SparseFeatureMap::new(4);
        x.set(1, 3.0).unwrap();
        x.set(3, -1.0).unwrap();

        assert_eq!(x.dimension(), 4);
        assert_eq!(x.nnz(), 2);
        assert_eq!(x.get(0), Ok(0.0));
        assert_eq!(x.get(1), Ok(3.0));
        assert_eq!(x.get(3), Ok(-1.0));
        assert_eq!(x.get(10), Ok(0.0));

        assert_eq!(
            x.set(4, 1.0),
            Err(AccessError::OutOfRange { id: 4, dimension: 4 })
        );
        assert_eq!(x.set(FEATURE_ID_ILLEGAL, 1.0), Err(AccessError::IllegalFeatureId));
    }

    #[test]
    fn strict_rejects_out_of_range() {
        let x = vec![-2.0f32, -1.0, 0.0, 1.0, 2.0];
        let strict = Strict(&x);
        assert_eq!(strict.get(4), Ok(2.0));
        assert_eq!(
            strict.get(5),
            Err(AccessError::OutOfRange { id: 5, dimension: 5 })
        );
        assert_eq!(
            strict.get(5).unwrap_err().to_string(),
            "feature id 5 is out of range [0:5]"
        );
        assert_eq!(strict.get(FEATURE_ID_ILLEGAL), Err(AccessError::IllegalFeatureId));
    }
}
