//! Owned binary decision tree used to author and inspect a single tree.
//!
//! A [`Leaf`] is either terminal (carries a prediction value) or internal
//! (carries a split and owns two children). In prediction, if
//! `feature[feature_id] <= threshold` the left child is taken, else the right
//! one, until a terminal leaf is reached.
//!
//! `Leaf` walks one node at a time and is meant for manipulating tree
//! structure or checking correctness. Compile trees into a
//! [`Forest`](super::Forest) for fast scoring.

use std::fmt;

use crate::data::{FeatureId, FeatureVector, FEATURE_ID_ILLEGAL};
use crate::error::{ForestError, Result};

/// Node of a binary decision tree.
///
/// Children are owned exclusively, so a tree is strictly tree-shaped.
///
/// # Example
///
/// ```
/// use bitforest::repr::Leaf;
///
/// // (feature[0] <= 0.5 ? 1 : (feature[1] <= 2 ? 2 : 3))
/// let mut root = Leaf::new_internal(0, 0.5, 1.0f32, 0.0).unwrap();
/// root.set_right(Some(Leaf::new_internal(1, 2.0, 2.0, 3.0).unwrap())).unwrap();
///
/// assert_eq!(root.predict(&[0.7f32, 3.0]).unwrap(), &3.0);
/// assert_eq!(root.to_string(), "(feature[0] <= 0.5 ? 1 : (feature[1] <= 2 ? 2 : 3))");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf<V> {
    Terminal {
        value: V,
    },
    Internal {
        feature_id: FeatureId,
        threshold: f32,
        left: Box<Leaf<V>>,
        right: Box<Leaf<V>>,
    },
}

impl<V> Leaf<V> {
    /// Create an internal node whose children are terminals with the given values.
    ///
    /// Fails with [`ForestError::IllegalFeatureId`] for the sentinel id.
    pub fn new_internal(
        feature_id: FeatureId,
        threshold: f32,
        left_value: V,
        right_value: V,
    ) -> Result<Self> {
        if feature_id == FEATURE_ID_ILLEGAL {
            return Err(ForestError::IllegalFeatureId);
        }
        Ok(Leaf::Internal {
            feature_id,
            threshold,
            left: Box::new(Leaf::new_terminal(left_value)),
            right: Box::new(Leaf::new_terminal(right_value)),
        })
    }

    /// Create a terminal leaf.
    pub fn new_terminal(value: V) -> Self {
        Leaf::Terminal { value }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Leaf::Terminal { .. })
    }

    /// Left child, `None` for a terminal leaf.
    pub fn left(&self) -> Option<&Leaf<V>> {
        match self {
            Leaf::Internal { left, .. } => Some(&**left),
            Leaf::Terminal { .. } => None,
        }
    }

    /// Right child, `None` for a terminal leaf.
    pub fn right(&self) -> Option<&Leaf<V>> {
        match self {
            Leaf::Internal { right, .. } => Some(&**right),
            Leaf::Terminal { .. } => None,
        }
    }

    pub fn left_mut(&mut self) -> Option<&mut Leaf<V>> {
        match self {
            Leaf::Internal { left, .. } => Some(&mut **left),
            Leaf::Terminal { .. } => None,
        }
    }

    pub fn right_mut(&mut self) -> Option<&mut Leaf<V>> {
        match self {
            Leaf::Internal { right, .. } => Some(&mut **right),
            Leaf::Terminal { .. } => None,
        }
    }

    /// Split feature and threshold of an internal node.
    pub fn threshold(&self) -> Result<(FeatureId, f32)> {
        match self {
            Leaf::Internal {
                feature_id,
                threshold,
                ..
            } => Ok((*feature_id, *threshold)),
            Leaf::Terminal { .. } => Err(ForestError::NotInternal),
        }
    }

    /// Value of a terminal leaf.
    pub fn value(&self) -> Result<&V> {
        match self {
            Leaf::Terminal { value } => Ok(value),
            Leaf::Internal { .. } => Err(ForestError::NotTerminal),
        }
    }

    /// Replace the left child. The previous child is dropped.
    ///
    /// Fails with [`ForestError::NotInternal`] on a terminal leaf and with
    /// [`ForestError::NullChild`] if `child` is `None`.
    pub fn set_left(&mut self, child: Option<Leaf<V>>) -> Result<()> {
        let slot = self.left_mut().ok_or(ForestError::NotInternal)?;
        *slot = child.ok_or(ForestError::NullChild)?;
        Ok(())
    }

    /// Replace the right child. The previous child is dropped.
    ///
    /// Fails with [`ForestError::NotInternal`] on a terminal leaf and with
    /// [`ForestError::NullChild`] if `child` is `None`.
    pub fn set_right(&mut self, child: Option<Leaf<V>>) -> Result<()> {
        let slot = self.right_mut().ok_or(ForestError::NotInternal)?;
        *slot = child.ok_or(ForestError::NullChild)?;
        Ok(())
    }

    /// Walk the tree for `x` and return the reached terminal value.
    ///
    /// Feature access errors are propagated.
    pub fn predict<F: FeatureVector + ?Sized>(&self, x: &F) -> Result<&V> {
        let mut node = self;
        loop {
            match node {
                Leaf::Terminal { value } => return Ok(value),
                Leaf::Internal {
                    feature_id,
                    threshold,
                    left,
                    right,
                } => {
                    let fvalue = x.get(*feature_id)?;
                    node = if fvalue <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    /// Number of terminal leaves reachable from this node.
    pub fn n_leaves(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Leaf::Terminal { .. } => count += 1,
                Leaf::Internal { left, right, .. } => {
                    stack.push(&**right);
                    stack.push(&**left);
                }
            }
        }
        count
    }

    /// Number of edges on the longest root-to-terminal path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Leaf::Terminal { .. } => max_depth = max_depth.max(depth),
                Leaf::Internal { left, right, .. } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }
        max_depth
    }
}

impl<V: fmt::Display> fmt::Display for Leaf<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Terminal { value } => write!(f, "{value}"),
            Leaf::Internal {
                feature_id,
                threshold,
                left,
                right,
            } => write!(f, "(feature[{feature_id}] <= {threshold} ? {left} : {right})"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AccessError, Strict};

    #[test]
    fn terminal_leaf() {
        let x = vec![-2.0f32, -1.0, 0.0, 1.0, 2.0];

        let mut terminal = Leaf::new_terminal(1.0f32);
        assert!(terminal.left().is_none());
        assert!(terminal.right().is_none());
        assert_eq!(terminal.threshold(), Err(ForestError::NotInternal));
        assert_eq!(terminal.value(), Ok(&1.0));
        assert!(terminal.is_terminal());
        assert_eq!(terminal.predict(&x), Ok(&1.0));
        assert_eq!(
            terminal.set_left(Some(Leaf::new_terminal(2.0))),
            Err(ForestError::NotInternal)
        );
        assert_eq!(
            terminal.set_right(Some(Leaf::new_terminal(2.0))),
            Err(ForestError::NotInternal)
        );
        assert_eq!(terminal.to_string(), "1");
    }

    #[test]
    fn illegal_feature_id_is_rejected() {
        assert_eq!(
            Leaf::new_internal(FEATURE_ID_ILLEGAL, 0.0, 0.0f32, 0.0),
            Err(ForestError::IllegalFeatureId)
        );
    }

    #[test]
    fn internal_leaf_accessors() {
        let x = vec![-2.0f32, -1.0, 0.0, 1.0, 2.0];
        let mut leaf = Leaf::new_internal(1, -0.5, 1.0f32, 2.0).unwrap();

        assert_eq!(leaf.left().unwrap().value(), Ok(&1.0));
        assert_eq!(leaf.right().unwrap().value(), Ok(&2.0));
        assert_eq!(leaf.threshold(), Ok((1, -0.5)));
        assert_eq!(leaf.value(), Err(ForestError::NotTerminal));
        assert!(!leaf.is_terminal());
        assert_eq!(leaf.predict(&x), Ok(&1.0));
        assert_eq!(leaf.set_left(None), Err(ForestError::NullChild));
        assert_eq!(leaf.set_right(None), Err(ForestError::NullChild));
        // A rejected child leaves the old one in place
        assert_eq!(leaf.left().unwrap().value(), Ok(&1.0));
    }

    #[test]
    fn nested_tree_predict_and_render() {
        let x1 = vec![-2.0f32, -1.0, 0.0, 1.0, 2.0];
        let x2 = vec![-2.0f32, -1.0, 1.0, 1.0, 2.0];
        let x3 = vec![-2.0f32, 1.0, 0.0, 1.0, 2.0];
        let x4 = vec![-2.0f32, 1.0, 0.0, 2.0, 2.0];
        let x5 = vec![-2.0f32, 1.0, 0.0, 2.0, 3.0];
        let x6 = vec![-2.0f32, 1.0, 0.0, 2.0];

        let mut root = Leaf::new_internal(1, -0.5, 1.0f32, 2.0).unwrap();
        let left = Leaf::new_internal(2, 0.5, 1.0, 2.0).unwrap();
        let mut right = Leaf::new_internal(3, 1.5, 3.0, 4.0).unwrap();
        right
            .set_right(Some(Leaf::new_internal(4, 2.5, 4.0, 5.0).unwrap()))
            .unwrap();
        root.set_left(Some(left)).unwrap();
        root.set_right(Some(right)).unwrap();

        // (feature[1] <= -0.5
        //     ? (feature[2] <= 0.5 ? 1 : 2)
        //     : (feature[3] <= 1.5
        //           ? 3
        //           : (feature[4] <= 2.5 ? 4 : 5)
        //       )
        // )
        assert_eq!(
            root.to_string(),
            "(feature[1] <= -0.5 ? (feature[2] <= 0.5 ? 1 : 2) : (feature[3] <= 1.5 ? 3 : (feature[4] <= 2.5 ? 4 : 5)))"
        );
        assert_eq!(root.predict(&x1), Ok(&1.0));
        assert_eq!(root.predict(&x2), Ok(&2.0));
        assert_eq!(root.predict(&x3), Ok(&3.0));
        assert_eq!(root.predict(&x4), Ok(&4.0));
        assert_eq!(root.predict(&x5), Ok(&5.0));
        // feature[4] is beyond the dimension and reads as 0.0
        assert_eq!(root.predict(&x6), Ok(&4.0));

        assert_eq!(root.n_leaves(), 5);
        assert_eq!(root.depth(), 3);
    }

    #[test]
    fn predict_propagates_access_errors() {
        let x = vec![-2.0f32, 1.0, 0.0, 2.0];
        let root = Leaf::new_internal(4, 2.5, 4.0f32, 5.0).unwrap();
        assert_eq!(
            root.predict(&Strict(&x)),
            Err(ForestError::Access(AccessError::OutOfRange {
                id: 4,
                dimension: 4
            }))
        );
    }

    #[test]
    fn child_mutation_in_place() {
        let mut root = Leaf::new_internal(0, 0.0, 1.0f32, 2.0).unwrap();
        *root.right_mut().unwrap() = Leaf::new_internal(1, 0.0, 3.0, 4.0).unwrap();
        root.right_mut()
            .unwrap()
            .set_left(Some(Leaf::new_terminal(9.0)))
            .unwrap();

        assert_eq!(root.to_string(), "(feature[0] <= 0 ? 1 : (feature[1] <= 0 ? 9 : 4))");
        assert_eq!(root.n_leaves(), 3);
    }
}
