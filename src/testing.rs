//! Tree fixtures shared by unit tests, integration tests and benchmarks.
//!
//! Builders return [`Result`] so callers decide how to handle failures.

use crate::data::{FeatureId, SparseFeatureMap};
use crate::error::Result;
use crate::repr::Leaf;

/// Dense vector scored by the four [`scenario_trees`].
pub const SCENARIO_VECTOR: [f32; 6] = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];

/// Four unbalanced trees splitting on features `0,1`, `0,2,3`, `0,3` and `0,4`.
///
/// Against [`SCENARIO_VECTOR`] they predict `1, 1, 2, 0`.
pub fn scenario_trees() -> Result<[Leaf<f32>; 4]> {
    let mut tree1 = Leaf::new_internal(0, -2.5, 0.0, 1.0)?;
    tree1.set_right(Some(Leaf::new_internal(1, 0.0, 1.0, 2.0)?))?;

    let mut tree2 = Leaf::new_internal(0, -4.5, 0.0, 1.0)?;
    let mut tree2_right = Leaf::new_internal(2, 0.0, 1.0, 2.0)?;
    tree2_right.set_right(Some(Leaf::new_internal(3, 0.0, 2.0, 3.0)?))?;
    tree2.set_right(Some(tree2_right))?;

    let mut tree3 = Leaf::new_internal(0, -3.5, 0.0, 1.0)?;
    tree3.set_right(Some(Leaf::new_internal(3, 0.0, 1.0, 2.0)?))?;

    let mut tree4 = Leaf::new_internal(0, -1.5, 0.0, 1.0)?;
    tree4.set_right(Some(Leaf::new_internal(4, 0.0, 1.0, 2.0)?))?;

    Ok([tree1, tree2, tree3, tree4])
}

/// Tree whose splits all chain on the right: `n_leaves - 1` internal nodes.
///
/// Split `d` tests `feature_of(d) <= threshold` with left value `d` and the
/// last right leaf valued `n_leaves - 1`.
pub fn right_spine(
    n_leaves: usize,
    threshold: f32,
    feature_of: impl Fn(usize) -> FeatureId,
) -> Result<Leaf<f32>> {
    let depth = n_leaves.saturating_sub(1);
    let mut root = Leaf::new_terminal(depth as f32);
    for d in (0..depth).rev() {
        let mut node = Leaf::new_internal(feature_of(d), threshold, d as f32, 0.0)?;
        node.set_right(Some(root))?;
        root = node;
    }
    Ok(root)
}

/// Mirror of [`right_spine`]: splits chain on the left.
pub fn left_spine(
    n_leaves: usize,
    threshold: f32,
    feature_of: impl Fn(usize) -> FeatureId,
) -> Result<Leaf<f32>> {
    let depth = n_leaves.saturating_sub(1);
    let mut root = Leaf::new_terminal(depth as f32);
    for d in (0..depth).rev() {
        let mut node = Leaf::new_internal(feature_of(d), threshold, 0.0, d as f32)?;
        node.set_left(Some(root))?;
        root = node;
    }
    Ok(root)
}

/// Complete tree of the given depth (`2^depth` leaves) splitting on feature
/// `level` at every level, with leaves valued left to right `0, 1, ...`.
pub fn complete_tree(depth: usize) -> Result<Leaf<f32>> {
    fn build(level: usize, depth: usize, next: &mut f32) -> Result<Leaf<f32>> {
        if level == depth {
            let value = *next;
            *next += 1.0;
            return Ok(Leaf::new_terminal(value));
        }
        let left = build(level + 1, depth, next)?;
        let right = build(level + 1, depth, next)?;
        let mut node = Leaf::new_internal(level as FeatureId, 0.0, 0.0, 0.0)?;
        node.set_left(Some(left))?;
        node.set_right(Some(right))?;
        Ok(node)
    }
    build(0, depth, &mut 0.0)
}

/// Sparse vector of dimension `dimension` with `x[i] = i`.
pub fn identity_sparse(dimension: usize) -> Result<SparseFeatureMap> {
    let mut x = SparseFeatureMap::new(dimension);
    for i in 0..dimension {
        x.set(i as FeatureId, i as f32)?;
    }
    Ok(x)
}
