//! Staged comparison of two datasets

use crate::dataset::Dataset;
use crate::error::ReconcileError;
use crate::keys::{KeyResolver, KeySpec};
use crate::matcher::{ColumnPlan, RowMatcher};
use crate::options::ReconcileOptions;
use crate::result::{ComparisonResult, ResultBuilder};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a caller and a running
/// comparison
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Comparison stages, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    ResolveKeys,
    Classify,
    BuildResult,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::ResolveKeys => "resolve-keys",
            Stage::Classify => "classify",
            Stage::BuildResult => "build-result",
        };
        f.write_str(name)
    }
}

/// Runs a full reconciliation. Any failure aborts the whole comparison.
pub struct Reconciler {
    options: ReconcileOptions,
    cancel: CancellationToken,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Observe `token` instead of the reconciler's private one
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn compare(
        &self,
        left: &Dataset,
        right: &Dataset,
        key_spec: &KeySpec,
    ) -> Result<ComparisonResult, ReconcileError> {
        self.enter(Stage::Validate)?;
        self.validate(left, right)?;

        self.enter(Stage::ResolveKeys)?;
        let (left_keys, right_keys) = KeyResolver::resolve(left, right, key_spec)?;
        log::debug!(
            "Resolved {} left keys and {} right keys",
            left_keys.len(),
            right_keys.len()
        );

        self.enter(Stage::Classify)?;
        let partition = RowMatcher::partition(&left_keys, &right_keys);
        let plan = ColumnPlan::new(left, right, key_spec);
        let comparisons =
            RowMatcher::new(left, right, &plan, &self.options, &self.cancel).classify(&partition)?;

        self.enter(Stage::BuildResult)?;
        let result = ResultBuilder::new(&self.options).build(
            left,
            right,
            key_spec,
            &plan,
            &partition,
            &comparisons,
        )?;

        let summary = result.summary();
        log::info!(
            "Compared {} vs {}: {} added, {} deleted, {} modified, {} unchanged",
            left.name(),
            right.name(),
            summary.added,
            summary.deleted,
            summary.modified,
            summary.unchanged
        );

        Ok(result)
    }

    fn enter(&self, stage: Stage) -> Result<(), ReconcileError> {
        if self.cancel.is_cancelled() {
            log::debug!("Cancelled before stage {}", stage);
            return Err(ReconcileError::Cancelled);
        }
        log::debug!("Entering stage {}", stage);
        Ok(())
    }

    fn validate(&self, left: &Dataset, right: &Dataset) -> Result<(), ReconcileError> {
        let status = &self.options.status_column;
        // An empty name would be an unaddressable output column
        if status.is_empty() || left.has_column(status) || right.has_column(status) {
            return Err(ReconcileError::StatusColumnConflict {
                column: status.clone(),
            });
        }

        if self.options.strict_types {
            for col in left.columns() {
                if let Some(other) = right.column(&col.name) {
                    if !types_compatible(
                        &col.data_type,
                        &other.data_type,
                        self.options.numeric_cross_type,
                    ) {
                        return Err(ReconcileError::SchemaConflict {
                            column: col.name.clone(),
                            left_type: col.data_type.clone(),
                            right_type: other.data_type.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Compare two datasets with the given options
pub fn compare(
    left: &Dataset,
    right: &Dataset,
    key_spec: &KeySpec,
    options: &ReconcileOptions,
) -> Result<ComparisonResult, ReconcileError> {
    Reconciler::new(options.clone()).compare(left, right, key_spec)
}

fn types_compatible(left: &str, right: &str, numeric_cross_type: bool) -> bool {
    left.eq_ignore_ascii_case(right)
        || (numeric_cross_type && is_numeric_type(left) && is_numeric_type(right))
}

fn is_numeric_type(data_type: &str) -> bool {
    let upper = data_type.to_ascii_uppercase();
    const NUMERIC: &[&str] = &[
        "TINYINT", "SMALLINT", "INTEGER", "INT", "BIGINT", "HUGEINT", "UTINYINT", "USMALLINT",
        "UINTEGER", "UBIGINT", "FLOAT", "REAL", "DOUBLE",
    ];
    NUMERIC.contains(&upper.as_str()) || upper.starts_with("DECIMAL") || upper.starts_with("NUMERIC")
}
