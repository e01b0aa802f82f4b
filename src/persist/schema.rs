//! Schema types for forest serialization.
//!
//! Schema types are kept separate from the runtime [`Forest`](crate::repr::Forest)
//! so the stored format can evolve on its own and every loaded forest goes
//! through validation.
//!
//! Buckets are stored in a `BTreeMap` for deterministic JSON output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::FeatureId;

/// Current format version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Serialized compiled forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSchema<V> {
    /// Format version, checked on read.
    pub version: u32,
    /// Value tables, oldest tree first.
    pub trees: Vec<TreeSchema<V>>,
    /// Split buckets keyed by feature id.
    #[serde(default)]
    pub features: BTreeMap<FeatureId, BucketSchema>,
}

/// Value table of one compiled tree, indexed by leaf bit position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema<V> {
    pub values: Vec<V>,
}

/// Splits on one feature (SoA layout), sorted by threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSchema {
    pub thresholds: Vec<f32>,
    pub tree_slots: Vec<u32>,
    pub masks: Vec<u64>,
}
