//! Per-feature split storage (SoA) used by forest scoring.

/// Compiled splits of every live tree on one feature.
///
/// Three index-aligned arrays: thresholds, owning tree slots and 64-bit masks.
/// Outside of compilation the entries are sorted ascending by threshold, so
/// the splits exceeded by a feature value always form a prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureBucket {
    thresholds: Vec<f32>,
    tree_slots: Vec<u32>,
    masks: Vec<u64>,
}

impl FeatureBucket {
    /// Build a bucket from raw arrays. No ordering or alignment is checked.
    pub(crate) fn from_parts(thresholds: Vec<f32>, tree_slots: Vec<u32>, masks: Vec<u64>) -> Self {
        Self {
            thresholds,
            tree_slots,
            masks,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    #[inline]
    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    #[inline]
    pub fn tree_slots(&self) -> &[u32] {
        &self.tree_slots
    }

    #[inline]
    pub fn masks(&self) -> &[u64] {
        &self.masks
    }

    /// Iterate `(threshold, tree_slot, mask)` triples in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (f32, u32, u64)> + '_ {
        self.thresholds
            .iter()
            .zip(&self.tree_slots)
            .zip(&self.masks)
            .map(|((&t, &s), &m)| (t, s, m))
    }

    #[inline]
    pub(crate) fn push(&mut self, threshold: f32, tree_slot: u32, mask: u64) {
        self.thresholds.push(threshold);
        self.tree_slots.push(tree_slot);
        self.masks.push(mask);
    }

    /// Number of splits whose threshold is exceeded by `value`.
    ///
    /// Lower-bound search over the sorted thresholds. NaN exceeds every
    /// threshold, matching `Leaf::predict` where `NaN <= t` is false.
    #[inline]
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn n_exceeded(&self, value: f32) -> usize {
        self.thresholds.partition_point(|&t| !(value <= t))
    }

    /// Tree slots and masks of the splits exceeded by `value`.
    #[inline]
    pub(crate) fn exceeded(&self, value: f32) -> (&[u32], &[u64]) {
        let k = self.n_exceeded(value);
        (&self.tree_slots[..k], &self.masks[..k])
    }

    /// Stable sort of all three arrays by threshold.
    pub(crate) fn sort_by_threshold(&mut self) {
        if self.is_sorted() {
            return;
        }
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.thresholds[a].total_cmp(&self.thresholds[b]));
        self.thresholds = permute(&self.thresholds, &order);
        self.tree_slots = permute(&self.tree_slots, &order);
        self.masks = permute(&self.masks, &order);
    }

    pub(crate) fn is_sorted(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0] <= w[1])
    }

    pub(crate) fn is_aligned(&self) -> bool {
        self.thresholds.len() == self.tree_slots.len() && self.thresholds.len() == self.masks.len()
    }

    /// Drop the entries of slot 0 and shift every other slot down by one.
    ///
    /// Relative order is kept, so the bucket stays sorted.
    pub(crate) fn retire_oldest(&mut self) {
        let mut kept = 0;
        for i in 0..self.len() {
            let slot = self.tree_slots[i];
            if slot == 0 {
                continue;
            }
            self.thresholds[kept] = self.thresholds[i];
            self.tree_slots[kept] = slot - 1;
            self.masks[kept] = self.masks[i];
            kept += 1;
        }
        self.thresholds.truncate(kept);
        self.tree_slots.truncate(kept);
        self.masks.truncate(kept);
    }
}

fn permute<T: Copy>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i]).collect()
}
