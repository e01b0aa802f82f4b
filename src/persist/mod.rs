//! Forest persistence.
//!
//! A compiled [`Forest`] is stored as its schema: value tables and sorted split
//! buckets. Loading rebuilds identical prediction behavior without replaying
//! the authored [`Leaf`](crate::repr::Leaf) trees, and validates every invariant
//! the scorer relies on.
//!
//! # Example
//!
//! ```
//! use bitforest::persist::{self, JsonWriteOptions};
//! use bitforest::repr::{Forest, Leaf};
//!
//! let tree = Leaf::new_internal(0, 0.5, 1.0f32, 2.0).unwrap();
//! let mut forest = Forest::new();
//! forest.enqueue([&tree]).unwrap();
//!
//! let json = persist::to_json_string(&forest, &JsonWriteOptions::compact()).unwrap();
//! let restored: Forest<f32> = persist::from_json_str(&json).unwrap();
//! assert_eq!(restored.predict(&[1.0f32]).unwrap(), vec![2.0]);
//! ```

mod convert;
mod error;
mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::{ReadError, WriteError};
pub use schema::{BucketSchema, ForestSchema, TreeSchema, FORMAT_VERSION};

use crate::repr::Forest;

/// JSON output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonWriteOptions {
    /// Indent the output.
    pub pretty: bool,
}

impl JsonWriteOptions {
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

fn checked_schema<V: Clone>(forest: &Forest<V>) -> Result<ForestSchema<V>, WriteError> {
    let schema = forest.to_schema();
    for (&feature_id, bucket) in &schema.features {
        if bucket.thresholds.iter().any(|t| !t.is_finite()) {
            return Err(WriteError::NonFiniteThreshold { feature_id });
        }
    }
    Ok(schema)
}

/// Serialize a forest to a JSON string.
pub fn to_json_string<V>(forest: &Forest<V>, options: &JsonWriteOptions) -> Result<String, WriteError>
where
    V: Clone + Serialize,
{
    let schema = checked_schema(forest)?;
    let json = if options.pretty {
        serde_json::to_string_pretty(&schema)?
    } else {
        serde_json::to_string(&schema)?
    };
    Ok(json)
}

/// Deserialize and validate a forest from a JSON string.
pub fn from_json_str<V: DeserializeOwned>(json: &str) -> Result<Forest<V>, ReadError> {
    let schema: ForestSchema<V> = serde_json::from_str(json)?;
    Forest::try_from(schema)
}

/// Serialize a forest as JSON into `writer`.
pub fn write_json<V, W>(forest: &Forest<V>, writer: W, options: &JsonWriteOptions) -> Result<(), WriteError>
where
    V: Clone + Serialize,
    W: Write,
{
    let schema = checked_schema(forest)?;
    if options.pretty {
        serde_json::to_writer_pretty(writer, &schema)?;
    } else {
        serde_json::to_writer(writer, &schema)?;
    }
    Ok(())
}

/// Deserialize and validate a forest from a JSON reader.
pub fn read_json<V, R>(reader: R) -> Result<Forest<V>, ReadError>
where
    V: DeserializeOwned,
    R: Read,
{
    let schema: ForestSchema<V> = serde_json::from_reader(reader)?;
    Forest::try_from(schema)
}

/// Write a forest to a JSON file, replacing any existing file.
pub fn save_json<V, P>(forest: &Forest<V>, path: P, options: &JsonWriteOptions) -> Result<(), WriteError>
where
    V: Clone + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(forest, &mut writer, options)?;
    writer.flush()?;
    debug!("saved forest with {} trees to {}", forest.n_trees(), path.display());
    Ok(())
}

/// Read a forest from a JSON file.
pub fn load_json<V, P>(path: P) -> Result<Forest<V>, ReadError>
where
    V: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let forest: Forest<V> = read_json(BufReader::new(File::open(path)?))?;
    debug!("loaded forest with {} trees from {}", forest.n_trees(), path.display());
    Ok(forest)
}
