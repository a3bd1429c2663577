//! Error types for tabrecon operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabreconError>;

/// Failures raised by the reconciliation engine itself.
///
/// Every variant is terminal: a comparison that hits one of these returns no
/// partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("Key column '{column}' not found in {dataset} dataset")]
    MissingKeyColumn { dataset: String, column: String },

    #[error("Duplicate key {key} in {dataset} dataset (rows {first_row} and {duplicate_row})")]
    DuplicateKey {
        dataset: String,
        key: String,
        first_row: usize,
        duplicate_row: usize,
    },

    #[error("Schema conflict on column '{column}': {left_type} vs {right_type}")]
    SchemaConflict {
        column: String,
        left_type: String,
        right_type: String,
    },

    #[error("Invalid key specification: {message}")]
    InvalidKeySpec { message: String },

    #[error("Invalid {dataset} dataset: {message}")]
    InvalidDataset { dataset: String, message: String },

    #[error("Status column '{column}' collides with an input column")]
    StatusColumnConflict { column: String },

    #[error("Comparison cancelled")]
    Cancelled,
}

impl ReconcileError {
    pub fn invalid_key_spec(msg: impl Into<String>) -> Self {
        Self::InvalidKeySpec {
            message: msg.into(),
        }
    }

    pub fn invalid_dataset(dataset: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidDataset {
            dataset: dataset.into(),
            message: msg.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TabreconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Data processing error: {message}")]
    DataProcessing { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl TabreconError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn data_processing(msg: impl Into<String>) -> Self {
        Self::DataProcessing {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// The engine failure behind this error, if any
    pub fn as_reconcile(&self) -> Option<&ReconcileError> {
        match self {
            Self::Reconcile(e) => Some(e),
            _ => None,
        }
    }
}
