//! Compact forest representation scored by bitmask intersection.
//!
//! # Compilation
//!
//! Every terminal leaf of a tree gets a bit position: leaves under a node's
//! right child are numbered before the leaves under its left child, at every
//! level. Leaf values are stored in that order, so a tree's value table is
//! indexed by bit position.
//!
//! Each internal node becomes one entry in the bucket of its split feature:
//! `(threshold, tree slot, mask)`, where `mask` clears exactly the bits of the
//! node's left subtree. For a node whose subtree starts at bit `off`, with `R`
//! leaves on the right and `N` leaves in total, the cleared range is
//! `[off + R, off + N)`.
//!
//! # Scoring
//!
//! Each tree starts with all of its leaf bits set. For every feature bucket,
//! the splits whose threshold is strictly below the feature value send the
//! walk right, so their masks are ANDed into the owning tree's accumulator.
//! The leftmost surviving leaf, which is the most significant set bit, is the
//! leaf a plain walk would reach.
//!
//! # Capacity
//!
//! A tree has at most [`MAX_LEAVES`] terminal leaves, one per mask bit.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, trace, warn};

use crate::config::{AccessPolicy, ForestConfig};
use crate::data::{FeatureId, FeatureVector, Strict, FEATURE_ID_ILLEGAL};
use crate::error::{ForestError, Result};
use crate::utils::run_with_threads;

use super::bucket::FeatureBucket;
use super::leaf::Leaf;

/// Maximum number of terminal leaves in a compiled tree.
pub const MAX_LEAVES: usize = u64::BITS as usize;

// ============================================================================
// CompiledTree
// ============================================================================

/// Value table of one compiled tree, indexed by leaf bit position.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTree<V> {
    values: Vec<V>,
}

impl<V> CompiledTree<V> {
    pub(crate) fn new(values: Vec<V>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.values.len()
    }

    /// Accumulator with one bit set per leaf.
    #[inline]
    fn full_mask(&self) -> u64 {
        low_bits(self.values.len())
    }

    pub(crate) fn into_values(self) -> Vec<V> {
        self.values
    }
}

// ============================================================================
// ForestValidationError
// ============================================================================

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("tree {slot} has {n_leaves} leaves, expected 1..={max}", max = MAX_LEAVES)]
    LeafCountOutOfRange { slot: usize, n_leaves: usize },

    #[error("bucket of feature {feature_id} has arrays of different lengths")]
    BucketLenMismatch { feature_id: FeatureId },

    #[error("bucket registered under the illegal feature id")]
    IllegalFeatureId,

    #[error("bucket of feature {feature_id} is empty")]
    EmptyBucket { feature_id: FeatureId },

    #[error("bucket of feature {feature_id} contains a NaN threshold")]
    NanThreshold { feature_id: FeatureId },

    #[error("bucket of feature {feature_id} is not sorted by threshold")]
    UnsortedBucket { feature_id: FeatureId },

    #[error("bucket of feature {feature_id} references tree {slot}, but only {n_trees} are live")]
    SlotOutOfRange {
        feature_id: FeatureId,
        slot: u32,
        n_trees: usize,
    },

    #[error("split on feature {feature_id} of tree {slot} clears the rightmost leaf")]
    RightmostLeafCleared { feature_id: FeatureId, slot: u32 },
}

// ============================================================================
// Forest
// ============================================================================

/// FIFO ensemble of compiled trees.
///
/// Designed for compact, fast online prediction: trees cannot be modified once
/// enqueued; the ensemble only grows at the back and shrinks at the front.
/// [`predict`](Self::predict) returns one value per tree, so callers can weight
/// the individual predictions however they like.
///
/// # Example
///
/// ```
/// use bitforest::repr::{Forest, Leaf};
///
/// let mut tree = Leaf::new_internal(0, -2.5, 0.0f32, 1.0).unwrap();
/// tree.set_right(Some(Leaf::new_internal(1, 0.0, 1.0, 2.0).unwrap())).unwrap();
///
/// let mut forest = Forest::new();
/// forest.enqueue([&tree]).unwrap();
/// assert_eq!(forest.predict(&[-2.0f32, -1.0]).unwrap(), vec![1.0]);
///
/// forest.dequeue();
/// assert!(forest.predict(&[-2.0f32, -1.0]).unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Forest<V> {
    config: ForestConfig,
    trees: VecDeque<CompiledTree<V>>,
    features: BTreeMap<FeatureId, FeatureBucket>,
}

impl<V> Default for Forest<V> {
    fn default() -> Self {
        Self::with_config(ForestConfig::default())
    }
}

impl<V> Forest<V> {
    /// Create an empty forest with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty forest with the given configuration.
    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            config,
            trees: VecDeque::new(),
            features: BTreeMap::new(),
        }
    }

    /// Assemble a forest from already compiled parts.
    ///
    /// Callers are expected to run [`validate`](Self::validate) afterwards.
    pub(crate) fn from_parts(
        trees: Vec<CompiledTree<V>>,
        features: BTreeMap<FeatureId, FeatureBucket>,
    ) -> Self {
        Self {
            config: ForestConfig::default(),
            trees: trees.into(),
            features,
        }
    }

    #[inline]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Replace the configuration. Compiled trees are unaffected.
    pub fn set_config(&mut self, config: ForestConfig) {
        self.config = config;
    }

    /// Number of live trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Number of features with at least one split.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Compiled tree at FIFO position `slot` (0 = oldest).
    #[inline]
    pub fn tree(&self, slot: usize) -> Option<&CompiledTree<V>> {
        self.trees.get(slot)
    }

    /// Iterate compiled trees from oldest to newest.
    pub fn trees(&self) -> impl Iterator<Item = &CompiledTree<V>> {
        self.trees.iter()
    }

    /// Number of leaves of the tree at `slot`.
    #[inline]
    pub fn n_leaves(&self, slot: usize) -> Option<usize> {
        self.trees.get(slot).map(CompiledTree::n_leaves)
    }

    /// Leaf values of the tree at `slot`, indexed by leaf bit position.
    #[inline]
    pub fn tree_values(&self, slot: usize) -> Option<&[V]> {
        self.trees.get(slot).map(CompiledTree::values)
    }

    /// Split bucket of `feature_id`, if any live tree splits on it.
    #[inline]
    pub fn bucket(&self, feature_id: FeatureId) -> Option<&FeatureBucket> {
        self.features.get(&feature_id)
    }

    /// Iterate `(feature_id, bucket)` pairs in ascending feature order.
    pub fn buckets(&self) -> impl Iterator<Item = (FeatureId, &FeatureBucket)> {
        self.features.iter().map(|(&id, bucket)| (id, bucket))
    }

    /// Remove every tree.
    pub fn clear(&mut self) {
        self.trees.clear();
        self.features.clear();
    }

    // ------------------------------------------------------------------------
    // Enqueue / dequeue
    // ------------------------------------------------------------------------

    /// Compile and append the given trees, in order.
    ///
    /// Each tree is compiled atomically: a tree that fails leaves the forest
    /// exactly as it was before that tree, and the trees after it are not
    /// compiled. Trees before it stay enqueued.
    ///
    /// # Errors
    ///
    /// - [`ForestError::CapacityExceeded`] if a tree has more than [`MAX_LEAVES`] leaves
    /// - [`ForestError::IllegalFeatureId`] if a split uses the sentinel id
    /// - [`ForestError::NanThreshold`] if a split threshold is NaN
    pub fn enqueue<'a, I>(&mut self, trees: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Leaf<V>>,
        V: Clone + 'a,
    {
        let mut touched = BTreeSet::new();
        let mut result = Ok(());
        let mut n_compiled = 0;

        for tree in trees {
            if let Err(err) = self.compile_tree(tree, &mut touched) {
                warn!("rejected tree for slot {}: {err}", self.trees.len());
                result = Err(err);
                break;
            }
            n_compiled += 1;
        }

        for feature_id in &touched {
            if let Some(bucket) = self.features.get_mut(feature_id) {
                bucket.sort_by_threshold();
            }
        }

        debug!(
            "enqueued {n_compiled} trees ({} live, {} touched features)",
            self.trees.len(),
            touched.len()
        );
        result
    }

    /// Compile and append a single tree.
    pub fn enqueue_tree(&mut self, tree: &Leaf<V>) -> Result<()>
    where
        V: Clone,
    {
        self.enqueue([tree])
    }

    /// Remove the oldest tree and return its value table.
    ///
    /// Returns `None` (and does nothing) when the forest is empty.
    pub fn dequeue(&mut self) -> Option<Vec<V>> {
        let retired = self.trees.pop_front()?;
        for bucket in self.features.values_mut() {
            bucket.retire_oldest();
        }
        self.features.retain(|_, bucket| !bucket.is_empty());

        debug!(
            "dequeued oldest tree ({} leaves, {} live)",
            retired.n_leaves(),
            self.trees.len()
        );
        Some(retired.into_values())
    }

    fn compile_tree(&mut self, root: &Leaf<V>, touched: &mut BTreeSet<FeatureId>) -> Result<()>
    where
        V: Clone,
    {
        let n_leaves = check_compilable(root)?;
        let slot = self.trees.len() as u32;

        let mut compiler = TreeCompiler {
            values: Vec::with_capacity(n_leaves),
            splits: Vec::with_capacity(n_leaves - 1),
        };
        compiler.visit(root);
        debug_assert_eq!(compiler.values.len(), n_leaves);

        for split in &compiler.splits {
            self.features
                .entry(split.feature_id)
                .or_default()
                .push(split.threshold, slot, split.mask);
            touched.insert(split.feature_id);
        }
        trace!(
            "compiled tree into slot {slot}: {n_leaves} leaves, {} splits",
            compiler.splits.len()
        );
        self.trees.push_back(CompiledTree::new(compiler.values));
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Prediction
    // ------------------------------------------------------------------------

    /// Predict one value per tree, in FIFO order (oldest first).
    ///
    /// Fails on the first feature access error, without partial results.
    pub fn predict<F: FeatureVector + ?Sized>(&self, x: &F) -> Result<Vec<V>>
    where
        V: Clone,
    {
        let mut output = Vec::with_capacity(self.trees.len());
        self.predict_into(x, &mut output)?;
        Ok(output)
    }

    /// Same as [`predict`](Self::predict), writing into a reusable buffer.
    ///
    /// `output` is cleared first and left empty on error.
    pub fn predict_into<F: FeatureVector + ?Sized>(&self, x: &F, output: &mut Vec<V>) -> Result<()>
    where
        V: Clone,
    {
        output.clear();
        let leaves = self.exit_leaves(x)?;
        output.extend(
            self.trees
                .iter()
                .zip(leaves)
                .map(|(tree, leaf)| tree.values[leaf].clone()),
        );
        Ok(())
    }

    /// Predict a batch of vectors, in parallel across vectors when the
    /// configured thread count allows it.
    ///
    /// Fails with the error of the first failing vector in input order.
    pub fn predict_batch<F>(&self, xs: &[F]) -> Result<Vec<Vec<V>>>
    where
        F: FeatureVector + Sync,
        V: Clone + Send + Sync,
    {
        run_with_threads(self.config.n_threads, |parallelism| {
            parallelism
                .maybe_par_map(xs, |x| self.predict(x))
                .into_iter()
                .collect()
        })
    }

    /// Bit position of the reached leaf, per tree.
    fn exit_leaves<F: FeatureVector + ?Sized>(&self, x: &F) -> Result<Vec<usize>> {
        let mut accumulators: Vec<u64> = self.trees.iter().map(CompiledTree::full_mask).collect();

        for (&feature_id, bucket) in &self.features {
            let value = self.read_feature(x, feature_id)?;
            let (slots, masks) = bucket.exceeded(value);
            for (&slot, &mask) in slots.iter().zip(masks) {
                accumulators[slot as usize] &= mask;
            }
        }

        Ok(accumulators.into_iter().map(highest_bit).collect())
    }

    #[inline]
    fn read_feature<F: FeatureVector + ?Sized>(&self, x: &F, feature_id: FeatureId) -> Result<f32> {
        let value = match self.config.access_policy {
            AccessPolicy::Lenient => x.get(feature_id)?,
            AccessPolicy::Strict => Strict(x).get(feature_id)?,
        };
        Ok(value)
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Validate structural invariants (leaf counts, bucket alignment, sorting,
    /// slot ranges and masks).
    ///
    /// A forest built through [`enqueue`](Self::enqueue) always validates;
    /// this is intended for deserialized forests and tests.
    pub fn validate(&self) -> std::result::Result<(), ForestValidationError> {
        for (slot, tree) in self.trees.iter().enumerate() {
            let n_leaves = tree.n_leaves();
            if n_leaves == 0 || n_leaves > MAX_LEAVES {
                return Err(ForestValidationError::LeafCountOutOfRange { slot, n_leaves });
            }
        }

        for (&feature_id, bucket) in &self.features {
            if feature_id == FEATURE_ID_ILLEGAL {
                return Err(ForestValidationError::IllegalFeatureId);
            }
            if !bucket.is_aligned() {
                return Err(ForestValidationError::BucketLenMismatch { feature_id });
            }
            if bucket.is_empty() {
                return Err(ForestValidationError::EmptyBucket { feature_id });
            }
            if bucket.thresholds().iter().any(|t| t.is_nan()) {
                return Err(ForestValidationError::NanThreshold { feature_id });
            }
            if !bucket.is_sorted() {
                return Err(ForestValidationError::UnsortedBucket { feature_id });
            }
            for (_, slot, mask) in bucket.iter() {
                if slot as usize >= self.trees.len() {
                    return Err(ForestValidationError::SlotOutOfRange {
                        feature_id,
                        slot,
                        n_trees: self.trees.len(),
                    });
                }
                // Bit 0 is the rightmost leaf, which lies in no left subtree
                if mask & 1 == 0 {
                    return Err(ForestValidationError::RightmostLeafCleared { feature_id, slot });
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Compilation helpers
// ============================================================================

/// One compiled internal node, staged until the whole tree is compiled.
struct SplitEntry {
    feature_id: FeatureId,
    threshold: f32,
    mask: u64,
}

struct TreeCompiler<V> {
    values: Vec<V>,
    splits: Vec<SplitEntry>,
}

impl<V: Clone> TreeCompiler<V> {
    /// Number the leaves under `node` (right before left) and stage its
    /// splits. Returns the number of leaves under `node`.
    fn visit(&mut self, node: &Leaf<V>) -> usize {
        match node {
            Leaf::Terminal { value } => {
                self.values.push(value.clone());
                1
            }
            Leaf::Internal {
                feature_id,
                threshold,
                left,
                right,
            } => {
                let offset = self.values.len();
                let n_right = self.visit(right);
                let n_left = self.visit(left);
                self.splits.push(SplitEntry {
                    feature_id: *feature_id,
                    threshold: *threshold,
                    mask: split_mask(offset, n_right, n_left),
                });
                n_right + n_left
            }
        }
    }
}

/// Check a tree before any mutation. Returns its number of leaves.
fn check_compilable<V>(root: &Leaf<V>) -> Result<usize> {
    let mut n_leaves = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Leaf::Terminal { .. } => n_leaves += 1,
            Leaf::Internal {
                feature_id,
                threshold,
                left,
                right,
            } => {
                if *feature_id == FEATURE_ID_ILLEGAL {
                    return Err(ForestError::IllegalFeatureId);
                }
                if threshold.is_nan() {
                    return Err(ForestError::NanThreshold {
                        feature_id: *feature_id,
                    });
                }
                stack.push(&**right);
                stack.push(&**left);
            }
        }
    }
    if n_leaves > MAX_LEAVES {
        return Err(ForestError::CapacityExceeded { leaves: n_leaves });
    }
    Ok(n_leaves)
}

/// Mask of a split whose subtree starts at bit `offset`: clears the `n_left`
/// bits of the left subtree, which follow the `n_right` right-subtree bits.
#[inline]
fn split_mask(offset: usize, n_right: usize, n_left: usize) -> u64 {
    !(low_bits(n_left) << (offset + n_right))
}

#[inline]
fn low_bits(n: usize) -> u64 {
    if n >= MAX_LEAVES {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

#[inline]
fn highest_bit(bits: u64) -> usize {
    debug_assert_ne!(bits, 0, "the rightmost leaf is never cleared");
    (u64::BITS - 1 - bits.leading_zeros()) as usize
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AccessError;

    /// Balanced depth-2 tree:
    ///
    /// ```text
    /// (feature[0] <= 0 ? (feature[1] <= 0 ? 10 : 11) : (feature[2] <= 0 ? 12 : 13))
    /// ```
    fn balanced_tree() -> Leaf<i32> {
        let mut root = Leaf::new_internal(0, 0.0, 0, 0).unwrap();
        root.set_left(Some(Leaf::new_internal(1, 0.0, 10, 11).unwrap()))
            .unwrap();
        root.set_right(Some(Leaf::new_internal(2, 0.0, 12, 13).unwrap()))
            .unwrap();
        root
    }

    /// Tree with `n_internal` splits chained on the right, so `n_internal + 1` leaves.
    fn right_spine(n_internal: usize) -> Leaf<i32> {
        let mut root = Leaf::new_terminal(n_internal as i32);
        for depth in (0..n_internal).rev() {
            root = Leaf::Internal {
                feature_id: 0,
                threshold: depth as f32,
                left: Box::new(Leaf::new_terminal(depth as i32)),
                right: Box::new(root),
            };
        }
        root
    }

    #[test]
    fn split_mask_clears_left_subtree() {
        // Root of a 4-leaf tree: 2 right leaves at [0, 2), 2 left at [2, 4)
        assert_eq!(split_mask(0, 2, 2), !0b1100);
        // Nested node starting at bit 2
        assert_eq!(split_mask(2, 1, 1), !0b1000);
        // Full 64-leaf root with one right leaf
        assert_eq!(split_mask(0, 1, 63), 1);
    }

    #[test]
    fn highest_bit_positions() {
        assert_eq!(highest_bit(1), 0);
        assert_eq!(highest_bit(0b1011), 3);
        assert_eq!(highest_bit(u64::MAX), 63);
    }

    #[test]
    fn leaves_numbered_right_before_left() {
        let mut forest = Forest::new();
        forest.enqueue([&balanced_tree()]).unwrap();
        assert_eq!(forest.tree(0).unwrap().values(), &[13, 12, 11, 10]);
        assert_eq!(forest.n_leaves(0), Some(4));
        assert_eq!(forest.n_features(), 3);
    }

    #[test]
    fn balanced_tree_matches_walk() {
        let tree = balanced_tree();
        let mut forest = Forest::new();
        forest.enqueue([&tree]).unwrap();

        for x0 in [-1.0f32, 0.0, 1.0] {
            for x1 in [-1.0f32, 0.0, 1.0] {
                for x2 in [-1.0f32, 0.0, 1.0] {
                    let x = [x0, x1, x2];
                    assert_eq!(
                        forest.predict(&x).unwrap(),
                        vec![*tree.predict(&x).unwrap()],
                        "x = {x:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn nan_follows_right_branch() {
        let tree = balanced_tree();
        let mut forest = Forest::new();
        forest.enqueue([&tree]).unwrap();

        let x = [f32::NAN, -1.0, f32::NAN];
        assert_eq!(tree.predict(&x), Ok(&13));
        assert_eq!(forest.predict(&x).unwrap(), vec![13]);
    }

    #[test]
    fn capacity_boundary() {
        let mut forest = Forest::new();
        let full = right_spine(MAX_LEAVES - 1);
        assert_eq!(full.n_leaves(), 64);
        forest.enqueue([&full]).unwrap();
        assert_eq!(forest.n_leaves(0), Some(64));

        let x = [100.0f32];
        assert_eq!(forest.predict(&x).unwrap(), vec![63]);
        assert_eq!(forest.predict(&[-100.0f32]).unwrap(), vec![0]);
        assert_eq!(forest.predict(&[31.5f32]).unwrap(), vec![32]);
    }

    #[test]
    fn too_many_leaves_leaves_forest_untouched() {
        let mut forest = Forest::new();
        forest.enqueue([&balanced_tree()]).unwrap();
        let before_buckets: Vec<_> = forest.buckets().map(|(id, b)| (id, b.clone())).collect();

        let err = forest.enqueue([&right_spine(MAX_LEAVES)]).unwrap_err();
        assert_eq!(err, ForestError::CapacityExceeded { leaves: 65 });
        assert_eq!(forest.n_trees(), 1);
        let after_buckets: Vec<_> = forest.buckets().map(|(id, b)| (id, b.clone())).collect();
        assert_eq!(before_buckets, after_buckets);
        forest.validate().unwrap();
    }

    #[test]
    fn failing_tree_stops_batch_but_keeps_earlier_trees() {
        let mut forest = Forest::new();
        let ok = balanced_tree();
        let too_big = right_spine(MAX_LEAVES);
        let err = forest.enqueue([&ok, &too_big, &ok]).unwrap_err();
        assert!(matches!(err, ForestError::CapacityExceeded { .. }));
        assert_eq!(forest.n_trees(), 1);
        forest.validate().unwrap();
    }

    #[test]
    fn rejects_sentinel_and_nan_splits() {
        let mut forest: Forest<i32> = Forest::new();
        let sentinel = Leaf::Internal {
            feature_id: FEATURE_ID_ILLEGAL,
            threshold: 0.0,
            left: Box::new(Leaf::new_terminal(0)),
            right: Box::new(Leaf::new_terminal(1)),
        };
        assert_eq!(forest.enqueue([&sentinel]), Err(ForestError::IllegalFeatureId));

        let nan = Leaf::new_internal(3, f32::NAN, 0, 1).unwrap();
        assert_eq!(
            forest.enqueue([&nan]),
            Err(ForestError::NanThreshold { feature_id: 3 })
        );
        assert!(forest.is_empty());
        assert_eq!(forest.n_features(), 0);
    }

    #[test]
    fn buckets_sorted_after_enqueue() {
        let mut forest = Forest::new();
        forest
            .enqueue([&right_spine(5), &right_spine(3), &balanced_tree()])
            .unwrap();
        let bucket = forest.bucket(0).unwrap();
        assert_eq!(bucket.len(), 9);
        assert!(bucket.thresholds().windows(2).all(|w| w[0] <= w[1]));
        forest.validate().unwrap();
    }

    #[test]
    fn dequeue_drops_empty_buckets() {
        let mut forest = Forest::new();
        forest.enqueue([&balanced_tree(), &right_spine(2)]).unwrap();
        assert_eq!(forest.n_features(), 3);

        assert_eq!(forest.dequeue(), Some(vec![13, 12, 11, 10]));
        assert_eq!(forest.n_trees(), 1);
        assert_eq!(forest.n_features(), 1);
        assert_eq!(forest.bucket(0).unwrap().tree_slots(), &[0, 0]);
        forest.validate().unwrap();

        assert_eq!(forest.dequeue(), Some(vec![2, 1, 0]));
        assert_eq!(forest.dequeue(), None);
        assert!(forest.predict(&[0.0f32]).unwrap().is_empty());
    }

    #[test]
    fn clear_then_reuse() {
        let mut forest = Forest::new();
        forest.enqueue([&balanced_tree(), &right_spine(3)]).unwrap();
        forest.clear();
        assert!(forest.is_empty());
        assert_eq!(forest.n_features(), 0);
        assert_eq!(forest.tree_values(0), None);

        forest.enqueue([&right_spine(3)]).unwrap();
        assert_eq!(forest.tree_values(0), Some(&[3, 2, 1, 0][..]));
        assert_eq!(forest.predict(&[0.5f32]).unwrap(), vec![1]);
    }

    #[test]
    fn strict_policy_reports_out_of_range() {
        let config = ForestConfig::builder()
            .access_policy(AccessPolicy::Strict)
            .build();
        let mut forest = Forest::with_config(config);
        forest
            .enqueue([&Leaf::new_internal(5, 0.0, 0.0f32, 0.0).unwrap()])
            .unwrap();

        let x = vec![-2.0f32, -1.0, 0.0, 1.0, 2.0];
        let err = forest.predict(&x).unwrap_err();
        assert_eq!(
            err,
            ForestError::Access(AccessError::OutOfRange { id: 5, dimension: 5 })
        );
        assert_eq!(err.to_string(), "feature id 5 is out of range [0:5]");

        forest.set_config(ForestConfig::default());
        assert_eq!(forest.predict(&x).unwrap(), vec![0.0]);
    }

    #[test]
    fn predict_into_clears_buffer_on_error() {
        let config = ForestConfig::builder()
            .access_policy(AccessPolicy::Strict)
            .build();
        let mut forest = Forest::with_config(config);
        forest.enqueue([&balanced_tree()]).unwrap();

        let mut out = vec![99, 98];
        assert!(forest.predict_into(&[0.0f32], &mut out).is_err());
        assert!(out.is_empty());

        forest.predict_into(&[1.0f32, 0.0, 1.0], &mut out).unwrap();
        assert_eq!(out, vec![13]);
    }

    #[test]
    fn validate_detects_corruption() {
        let mut forest = Forest::new();
        forest.enqueue([&balanced_tree()]).unwrap();

        let mut broken = forest.clone();
        broken
            .features
            .insert(7, FeatureBucket::from_parts(vec![0.0], vec![3], vec![1]));
        assert_eq!(
            broken.validate(),
            Err(ForestValidationError::SlotOutOfRange {
                feature_id: 7,
                slot: 3,
                n_trees: 1
            })
        );

        let mut broken = forest.clone();
        broken
            .features
            .insert(7, FeatureBucket::from_parts(vec![1.0, 0.0], vec![0, 0], vec![1, 1]));
        assert_eq!(
            broken.validate(),
            Err(ForestValidationError::UnsortedBucket { feature_id: 7 })
        );

        let mut broken = forest.clone();
        broken
            .features
            .insert(7, FeatureBucket::from_parts(vec![0.0], vec![0], vec![0b10]));
        assert_eq!(
            broken.validate(),
            Err(ForestValidationError::RightmostLeafCleared { feature_id: 7, slot: 0 })
        );
    }
}
