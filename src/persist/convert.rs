//! Conversion between [`Forest`] and [`ForestSchema`].

use super::error::ReadError;
use super::schema::{BucketSchema, ForestSchema, TreeSchema, FORMAT_VERSION};
use crate::repr::forest::CompiledTree;
use crate::repr::{FeatureBucket, Forest};

impl<V: Clone> Forest<V> {
    /// Snapshot the compiled state as a schema at [`FORMAT_VERSION`].
    ///
    /// The configuration is runtime state and is not part of the schema.
    pub fn to_schema(&self) -> ForestSchema<V> {
        ForestSchema::from(self)
    }
}

impl<V: Clone> From<&Forest<V>> for ForestSchema<V> {
    fn from(forest: &Forest<V>) -> Self {
        let trees = forest
            .trees()
            .map(|tree| TreeSchema {
                values: tree.values().to_vec(),
            })
            .collect();
        let features = forest
            .buckets()
            .map(|(feature_id, bucket)| (feature_id, BucketSchema::from(bucket)))
            .collect();

        Self {
            version: FORMAT_VERSION,
            trees,
            features,
        }
    }
}

impl From<&FeatureBucket> for BucketSchema {
    fn from(bucket: &FeatureBucket) -> Self {
        Self {
            thresholds: bucket.thresholds().to_vec(),
            tree_slots: bucket.tree_slots().to_vec(),
            masks: bucket.masks().to_vec(),
        }
    }
}

impl From<BucketSchema> for FeatureBucket {
    fn from(schema: BucketSchema) -> Self {
        FeatureBucket::from_parts(schema.thresholds, schema.tree_slots, schema.masks)
    }
}

impl<V> TryFrom<ForestSchema<V>> for Forest<V> {
    type Error = ReadError;

    /// Rebuild a forest, rejecting unknown versions and broken invariants.
    fn try_from(schema: ForestSchema<V>) -> Result<Self, Self::Error> {
        if schema.version != FORMAT_VERSION {
            return Err(ReadError::UnsupportedVersion {
                found: schema.version,
                expected: FORMAT_VERSION,
            });
        }

        let trees = schema
            .trees
            .into_iter()
            .map(|tree| CompiledTree::new(tree.values))
            .collect();
        let features = schema
            .features
            .into_iter()
            .map(|(feature_id, bucket)| (feature_id, FeatureBucket::from(bucket)))
            .collect();

        let forest = Forest::from_parts(trees, features);
        forest.validate()?;
        Ok(forest)
    }
}
