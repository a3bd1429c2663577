//! Row identity: key specifications, composite keys and key maps

use crate::dataset::{Dataset, Value};
use crate::error::ReconcileError;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// How rows are identified across the two datasets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// Row ordinal is the identity
    Positional,
    /// Ordered, non-empty list of distinct key columns
    Columns(Vec<String>),
}

impl KeySpec {
    /// Column-based spec. Empty or repeated column lists are rejected.
    pub fn columns<I, S>(columns: I) -> Result<Self, ReconcileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            return Err(ReconcileError::invalid_key_spec("no key columns given"));
        }

        let mut seen = HashSet::new();
        for col in &columns {
            if col.is_empty() {
                return Err(ReconcileError::invalid_key_spec("empty key column name"));
            }
            if !seen.insert(col.as_str()) {
                return Err(ReconcileError::invalid_key_spec(format!(
                    "key column '{}' listed twice",
                    col
                )));
            }
        }

        Ok(Self::Columns(columns))
    }

    /// Key columns, empty for positional identity
    pub fn key_columns(&self) -> &[String] {
        match self {
            KeySpec::Positional => &[],
            KeySpec::Columns(cols) => cols,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, KeySpec::Positional)
    }
}

/// Identity of a row within a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompositeKey {
    Ordinal(usize),
    Values(Vec<Value>),
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeKey::Ordinal(i) => write!(f, "#{}", i),
            CompositeKey::Values(values) => {
                write!(f, "(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Composite key to row ordinal, in dataset row order
#[derive(Debug, Clone)]
pub struct KeyMap {
    entries: IndexMap<CompositeKey, usize>,
}

impl KeyMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CompositeKey) -> Option<usize> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys with their row ordinals, in row order
    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey, usize)> {
        self.entries.iter().map(|(k, &ordinal)| (k, ordinal))
    }
}

/// Builds key maps for both sides of a comparison
pub struct KeyResolver;

impl KeyResolver {
    /// Resolve the key maps of both datasets under `spec`
    pub fn resolve(
        left: &Dataset,
        right: &Dataset,
        spec: &KeySpec,
    ) -> Result<(KeyMap, KeyMap), ReconcileError> {
        match spec {
            KeySpec::Positional => Ok((Self::positional(left), Self::positional(right))),
            KeySpec::Columns(columns) => {
                let left_positions = Self::key_positions(left, columns)?;
                let right_positions = Self::key_positions(right, columns)?;

                let left_map = Self::build_map(left, &left_positions)?;
                let right_map = Self::build_map(right, &right_positions)?;

                Ok((left_map, right_map))
            }
        }
    }

    /// Ordinals of the key columns inside `dataset`
    fn key_positions(dataset: &Dataset, columns: &[String]) -> Result<Vec<usize>, ReconcileError> {
        columns
            .iter()
            .map(|col| {
                dataset
                    .column_index(col)
                    .ok_or_else(|| ReconcileError::MissingKeyColumn {
                        dataset: dataset.name().to_string(),
                        column: col.clone(),
                    })
            })
            .collect()
    }

    fn positional(dataset: &Dataset) -> KeyMap {
        let entries = (0..dataset.row_count())
            .map(|i| (CompositeKey::Ordinal(i), i))
            .collect();
        KeyMap { entries }
    }

    fn build_map(dataset: &Dataset, positions: &[usize]) -> Result<KeyMap, ReconcileError> {
        let mut entries = IndexMap::with_capacity(dataset.row_count());

        for (ordinal, row) in dataset.rows().iter().enumerate() {
            let key = CompositeKey::Values(positions.iter().map(|&p| row[p].clone()).collect());

            match entries.entry(key) {
                Entry::Occupied(existing) => {
                    return Err(ReconcileError::DuplicateKey {
                        dataset: dataset.name().to_string(),
                        key: existing.key().to_string(),
                        first_row: *existing.get(),
                        duplicate_row: ordinal,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(ordinal);
                }
            }
        }

        Ok(KeyMap { entries })
    }
}
