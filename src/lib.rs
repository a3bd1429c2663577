//! # tabrecon
//!
//! Row-level reconciliation of two tabular datasets. Rows are matched by
//! key columns (or by position), classified as added, deleted, modified or
//! unchanged, and returned as one annotated dataset with a status column.

pub mod cli;
pub mod commands;
pub mod comparator;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod hash;
pub mod keys;
pub mod matcher;
pub mod options;
pub mod output;
pub mod progress;
pub mod reconciler;
pub mod result;

pub use dataset::{ColumnInfo, Dataset, Value};
pub use error::{ReconcileError, Result, TabreconError};
pub use keys::KeySpec;
pub use options::{MissingColumnPolicy, ReconcileOptions};
pub use reconciler::{compare, CancellationToken, Reconciler};
pub use result::{ComparisonResult, DiffStatus, DiffSummary};

/// Current format version of the JSON report
pub const FORMAT_VERSION: &str = "1.0.0";

/// Name of the synthetic status column unless configured otherwise
pub const DEFAULT_STATUS_COLUMN: &str = "status";

/// Matched key count at which classification runs in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Rows shown by the pretty renderer
pub const DEFAULT_ROW_LIMIT: usize = 20;

/// DuckDB memory limit while loading inputs
pub const DEFAULT_MEMORY_LIMIT: &str = "4GB";

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tabrecon.json";
