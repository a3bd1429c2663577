//! Key partitioning and per-row classification

use crate::comparator::CellComparator;
use crate::dataset::{ColumnInfo, Dataset, Value};
use crate::error::ReconcileError;
use crate::keys::{CompositeKey, KeyMap, KeySpec};
use crate::options::{MissingColumnPolicy, ReconcileOptions};
use crate::reconciler::CancellationToken;
use crate::result::DiffStatus;
use rayon::prelude::*;

/// A key found on one side only
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRow {
    pub key: CompositeKey,
    pub row: usize,
}

/// A key found on both sides
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMatch {
    pub key: CompositeKey,
    pub left_row: usize,
    pub right_row: usize,
}

/// Disjoint split of the union of both key sets
#[derive(Debug, Clone, Default)]
pub struct KeyPartition {
    /// In left row order
    pub only_left: Vec<KeyedRow>,
    /// In right row order
    pub only_right: Vec<KeyedRow>,
    /// In left row order
    pub common: Vec<KeyMatch>,
}

impl KeyPartition {
    /// Number of distinct keys across both datasets
    pub fn distinct_keys(&self) -> usize {
        self.only_left.len() + self.only_right.len() + self.common.len()
    }
}

/// One column of the merged schema and where it lives on each side
#[derive(Debug, Clone)]
pub struct PlannedColumn {
    pub info: ColumnInfo,
    pub left: Option<usize>,
    pub right: Option<usize>,
    /// One-sided column holding at least one value on its side
    pub populated: bool,
}

impl PlannedColumn {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_shared(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Merged column layout: key columns, remaining left columns, then
/// right-only columns
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    columns: Vec<PlannedColumn>,
}

impl ColumnPlan {
    pub fn new(left: &Dataset, right: &Dataset, spec: &KeySpec) -> Self {
        let keys = spec.key_columns();
        let mut names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        names.extend(left.column_names().filter(|c| !keys.iter().any(|k| k.as_str() == *c)));
        names.extend(
            right
                .column_names()
                .filter(|c| !left.has_column(c) && !keys.iter().any(|k| k.as_str() == *c)),
        );

        let columns = names
            .into_iter()
            .filter_map(|name| {
                let l = left.column_index(name);
                let r = right.column_index(name);
                let info = left.column(name).or_else(|| right.column(name))?.clone();

                let populated = match (l, r) {
                    (Some(pos), None) => left.rows().iter().any(|row| !row[pos].is_null()),
                    (None, Some(pos)) => right.rows().iter().any(|row| !row[pos].is_null()),
                    _ => false,
                };

                Some(PlannedColumn {
                    info,
                    left: l,
                    right: r,
                    populated,
                })
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[PlannedColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Outcome for one common key
#[derive(Debug, Clone, PartialEq)]
pub struct RowComparison {
    pub status: DiffStatus,
    /// Plan indices of the columns that differ
    pub changed: Vec<usize>,
}

/// Matches keys across datasets and classifies common rows
pub struct RowMatcher<'a> {
    left: &'a Dataset,
    right: &'a Dataset,
    plan: &'a ColumnPlan,
    comparator: CellComparator,
    policy: MissingColumnPolicy,
    parallel_threshold: usize,
    cancel: &'a CancellationToken,
}

impl<'a> RowMatcher<'a> {
    pub fn new(
        left: &'a Dataset,
        right: &'a Dataset,
        plan: &'a ColumnPlan,
        options: &ReconcileOptions,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            left,
            right,
            plan,
            comparator: CellComparator::new(options.numeric_cross_type),
            policy: options.missing_columns,
            parallel_threshold: options.parallel_threshold,
            cancel,
        }
    }

    /// Split both key sets into only-left, only-right and common keys
    pub fn partition(left_keys: &KeyMap, right_keys: &KeyMap) -> KeyPartition {
        let mut partition = KeyPartition::default();

        for (key, left_row) in left_keys.iter() {
            match right_keys.get(key) {
                Some(right_row) => partition.common.push(KeyMatch {
                    key: key.clone(),
                    left_row,
                    right_row,
                }),
                None => partition.only_left.push(KeyedRow {
                    key: key.clone(),
                    row: left_row,
                }),
            }
        }

        for (key, right_row) in right_keys.iter() {
            if !left_keys.contains(key) {
                partition.only_right.push(KeyedRow {
                    key: key.clone(),
                    row: right_row,
                });
            }
        }

        partition
    }

    /// Classify every common key. The output is indexed like
    /// `partition.common`, whatever order the workers finish in.
    pub fn classify(&self, partition: &KeyPartition) -> Result<Vec<RowComparison>, ReconcileError> {
        let classify_one = |m: &KeyMatch| -> Result<RowComparison, ReconcileError> {
            if self.cancel.is_cancelled() {
                return Err(ReconcileError::Cancelled);
            }
            Ok(self.compare_rows(m.left_row, m.right_row))
        };

        if partition.common.len() >= self.parallel_threshold {
            log::debug!(
                "Classifying {} common keys in parallel",
                partition.common.len()
            );
            partition.common.par_iter().map(classify_one).collect()
        } else {
            partition.common.iter().map(classify_one).collect()
        }
    }

    /// Compare one row pair over the column plan
    pub fn compare_rows(&self, left_row: usize, right_row: usize) -> RowComparison {
        let l = &self.left.rows()[left_row];
        let r = &self.right.rows()[right_row];

        let changed: Vec<usize> = self
            .plan
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, col)| match (col.left, col.right) {
                (Some(li), Some(ri)) => !self.comparator.equal(&l[li], &r[ri]),
                (Some(li), None) => self.one_sided_differs(col, &l[li]),
                (None, Some(ri)) => self.one_sided_differs(col, &r[ri]),
                (None, None) => false,
            })
            .map(|(idx, _)| idx)
            .collect();

        let status = if changed.is_empty() {
            DiffStatus::Unchanged
        } else {
            DiffStatus::Modified
        };

        RowComparison { status, changed }
    }

    fn one_sided_differs(&self, col: &PlannedColumn, present: &Value) -> bool {
        match self.policy {
            MissingColumnPolicy::Pad => !self.comparator.equal(present, &Value::Null),
            MissingColumnPolicy::Ignore => false,
            MissingColumnPolicy::Mismatch => col.populated,
        }
    }
}
