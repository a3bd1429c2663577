//! Comparison results and their assembly

use crate::dataset::{ColumnInfo, Dataset, Value};
use crate::error::ReconcileError;
use crate::hash::{HashComputer, HashValue};
use crate::keys::{CompositeKey, KeySpec};
use crate::matcher::{ColumnPlan, KeyPartition, PlannedColumn, RowComparison};
use crate::options::{MissingColumnPolicy, ReconcileOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a key after matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffStatus {
    Added,
    Deleted,
    Modified,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Added => "Added",
            DiffStatus::Deleted => "Deleted",
            DiffStatus::Modified => "Modified",
            DiffStatus::Unchanged => "Unchanged",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-classification key counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    /// Distinct keys across both datasets
    pub fn total(&self) -> usize {
        self.added + self.deleted + self.modified + self.unchanged
    }

    pub fn total_changes(&self) -> usize {
        self.added + self.deleted + self.modified
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    pub fn count(&self, status: DiffStatus) -> usize {
        match status {
            DiffStatus::Added => self.added,
            DiffStatus::Deleted => self.deleted,
            DiffStatus::Modified => self.modified,
            DiffStatus::Unchanged => self.unchanged,
        }
    }
}

/// A differing cell of a modified row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellChange {
    pub column: String,
    pub before: Value,
    pub after: Value,
}

/// The differing cells of one modified row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowChange {
    pub key: String,
    pub left_row: usize,
    pub right_row: usize,
    pub cells: Vec<CellChange>,
}

/// Annotated union of both datasets plus counts
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    summary: DiffSummary,
    key_columns: Vec<String>,
    status_column: String,
    dataset: Dataset,
    #[serde(skip)]
    statuses: Vec<DiffStatus>,
    changes: Vec<RowChange>,
}

impl ComparisonResult {
    pub fn summary(&self) -> &DiffSummary {
        &self.summary
    }

    /// Output rows: union schema with the status column last
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn status_column(&self) -> &str {
        &self.status_column
    }

    /// Status of each output row, aligned with `dataset().rows()`
    pub fn statuses(&self) -> &[DiffStatus] {
        &self.statuses
    }

    /// Cell-level detail for every modified row, in output order
    pub fn changes(&self) -> &[RowChange] {
        &self.changes
    }

    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    /// Output rows carrying `status`
    pub fn rows_with_status(&self, status: DiffStatus) -> Vec<&[Value]> {
        self.dataset
            .rows()
            .iter()
            .zip(&self.statuses)
            .filter(|(_, s)| **s == status)
            .map(|(row, _)| row.as_slice())
            .collect()
    }

    /// Content hash of the output schema and rows, in order
    pub fn fingerprint(&self) -> HashValue {
        HashComputer::new().hash_dataset(&self.dataset)
    }
}

/// Assembles a `ComparisonResult` from matched keys
pub struct ResultBuilder<'a> {
    options: &'a ReconcileOptions,
}

impl<'a> ResultBuilder<'a> {
    pub fn new(options: &'a ReconcileOptions) -> Self {
        Self { options }
    }

    /// `comparisons` must be indexed like `partition.common`
    pub fn build(
        &self,
        left: &Dataset,
        right: &Dataset,
        key_spec: &KeySpec,
        plan: &ColumnPlan,
        partition: &KeyPartition,
        comparisons: &[RowComparison],
    ) -> Result<ComparisonResult, ReconcileError> {
        if comparisons.len() != partition.common.len() {
            return Err(ReconcileError::invalid_dataset(
                "comparison",
                format!(
                    "{} classifications for {} common keys",
                    comparisons.len(),
                    partition.common.len()
                ),
            ));
        }

        let mut summary = DiffSummary::default();

        // Everything keyed in left, slotted by left row ordinal
        let mut left_slots: Vec<Option<Slot>> = vec![None; left.row_count()];
        for keyed in &partition.only_left {
            summary.deleted += 1;
            left_slots[keyed.row] = Some(Slot::Deleted);
        }
        for (idx, (m, cmp)) in partition.common.iter().zip(comparisons).enumerate() {
            match cmp.status {
                DiffStatus::Modified => summary.modified += 1,
                _ => summary.unchanged += 1,
            }
            left_slots[m.left_row] = Some(Slot::Common(idx));
        }
        summary.added = partition.only_right.len();

        let mut rows = Vec::with_capacity(left.row_count() + partition.only_right.len());
        let mut statuses = Vec::with_capacity(rows.capacity());
        let mut changes = Vec::new();

        for (left_row, slot) in left_slots.into_iter().enumerate() {
            match slot {
                Some(Slot::Deleted) => {
                    rows.push(self.deleted_row(plan, &left.rows()[left_row]));
                    statuses.push(DiffStatus::Deleted);
                }
                Some(Slot::Common(idx)) => {
                    let m = &partition.common[idx];
                    let cmp = &comparisons[idx];
                    let l = &left.rows()[m.left_row];
                    let r = &right.rows()[m.right_row];

                    match cmp.status {
                        DiffStatus::Modified => {
                            rows.push(self.modified_row(plan, l, r));
                            statuses.push(DiffStatus::Modified);
                            changes.push(row_change(plan, &m.key, m.left_row, m.right_row, cmp, l, r));
                        }
                        _ if self.options.include_unchanged => {
                            rows.push(self.unchanged_row(plan, l, r));
                            statuses.push(DiffStatus::Unchanged);
                        }
                        _ => {}
                    }
                }
                None => {}
            }
        }

        for keyed in &partition.only_right {
            rows.push(self.added_row(plan, &right.rows()[keyed.row]));
            statuses.push(DiffStatus::Added);
        }

        debug_assert_eq!(summary.total(), partition.distinct_keys());

        let status_column = self.options.status_column.clone();
        let mut columns: Vec<ColumnInfo> = plan.columns().iter().map(|c| c.info.clone()).collect();
        columns.push(ColumnInfo {
            name: status_column.clone(),
            data_type: "VARCHAR".to_string(),
            nullable: false,
        });

        for (row, status) in rows.iter_mut().zip(&statuses) {
            row.push(Value::Text(status.as_str().to_string()));
        }

        let dataset = Dataset::new("comparison", columns, rows)?;

        Ok(ComparisonResult {
            summary,
            key_columns: key_spec.key_columns().to_vec(),
            status_column,
            dataset,
            statuses,
            changes,
        })
    }

    fn added_row(&self, plan: &ColumnPlan, r: &[Value]) -> Vec<Value> {
        plan.columns().iter().map(|c| pick(r, c.right)).collect()
    }

    fn deleted_row(&self, plan: &ColumnPlan, l: &[Value]) -> Vec<Value> {
        plan.columns().iter().map(|c| pick(l, c.left)).collect()
    }

    /// Post-change state of the row
    fn modified_row(&self, plan: &ColumnPlan, l: &[Value], r: &[Value]) -> Vec<Value> {
        plan.columns()
            .iter()
            .map(|c| match c.right {
                Some(ri) => r[ri].clone(),
                // Left-only columns are never compared under Ignore
                None if self.options.missing_columns == MissingColumnPolicy::Ignore => {
                    pick(l, c.left)
                }
                None => Value::Null,
            })
            .collect()
    }

    fn unchanged_row(&self, plan: &ColumnPlan, l: &[Value], r: &[Value]) -> Vec<Value> {
        plan.columns()
            .iter()
            .map(|c| match c.left {
                Some(li) => l[li].clone(),
                None => pick(r, c.right),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Deleted,
    Common(usize),
}

fn pick(row: &[Value], pos: Option<usize>) -> Value {
    pos.map(|p| row[p].clone()).unwrap_or(Value::Null)
}

fn row_change(
    plan: &ColumnPlan,
    key: &CompositeKey,
    left_row: usize,
    right_row: usize,
    cmp: &RowComparison,
    l: &[Value],
    r: &[Value],
) -> RowChange {
    // A one-sided column flagged under the mismatch policy can be missing
    // in this very row; it changes the status but has no cell to show
    let cells = cmp
        .changed
        .iter()
        .map(|&idx| {
            let col: &PlannedColumn = &plan.columns()[idx];
            CellChange {
                column: col.name().to_string(),
                before: pick(l, col.left),
                after: pick(r, col.right),
            }
        })
        .filter(|cell| !(cell.before.is_null() && cell.after.is_null()))
        .collect();

    RowChange {
        key: key.to_string(),
        left_row,
        right_row,
        cells,
    }
}
