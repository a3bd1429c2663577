//! Hashing utilities for comparison results

use crate::dataset::{Dataset, Value};
use blake3::Hasher;
use rayon::prelude::*;

/// A hash value represented as a hex string
pub type HashValue = String;

/// Hash computer for values, rows and whole datasets
#[derive(Debug, Default, Clone, Copy)]
pub struct HashComputer;

impl HashComputer {
    pub fn new() -> Self {
        Self
    }

    /// Compute hash for a single value
    pub fn hash_value(&self, value: &Value) -> HashValue {
        let mut hasher = Hasher::new();
        Self::update_value(&mut hasher, value);
        hasher.finalize().to_hex().to_string()
    }

    /// Compute hash for multiple values (e.g., a row)
    pub fn hash_values(&self, values: &[Value]) -> HashValue {
        let mut hasher = Hasher::new();
        for value in values {
            Self::update_value(&mut hasher, value);
            hasher.update(b"|"); // Separator to avoid hash collisions
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Compute row hashes, in row order
    pub fn hash_rows(&self, rows: &[Vec<Value>]) -> Vec<HashValue> {
        rows.par_iter().map(|row| self.hash_values(row)).collect()
    }

    /// Hash of the schema followed by every row in order
    pub fn hash_dataset(&self, dataset: &Dataset) -> HashValue {
        let mut hasher = Hasher::new();

        for col in dataset.columns() {
            hasher.update(col.name.as_bytes());
            hasher.update(b"|");
            hasher.update(col.data_type.as_bytes());
            hasher.update(b"||");
        }

        for row_hash in self.hash_rows(dataset.rows()) {
            hasher.update(row_hash.as_bytes());
        }

        hasher.finalize().to_hex().to_string()
    }

    // Each value is tagged with its type so that e.g. "1" and 1 differ
    fn update_value(hasher: &mut Hasher, value: &Value) {
        hasher.update(value.type_name().as_bytes());
        hasher.update(b":");
        match value {
            Value::Null => {}
            Value::Boolean(b) => {
                hasher.update(if *b { b"1" } else { b"0" });
            }
            Value::Integer(i) => {
                hasher.update(&i.to_le_bytes());
            }
            Value::Float(f) => {
                hasher.update(&f.to_bits().to_le_bytes());
            }
            Value::Text(s) => {
                hasher.update(&(s.len() as u64).to_le_bytes());
                hasher.update(s.as_bytes());
            }
            Value::Date(_) | Value::Timestamp(_) => {
                hasher.update(value.to_string().as_bytes());
            }
            Value::Bytes(bytes) => {
                hasher.update(&(bytes.len() as u64).to_le_bytes());
                hasher.update(bytes);
            }
        }
    }
}
