//! Comparison options

use serde::{Deserialize, Serialize};
use std::fmt;

/// Treatment of columns that exist in only one of the two datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// The absent side reads as missing; a row differs when the present
    /// side holds a value
    #[default]
    Pad,
    /// One-sided columns are not compared
    Ignore,
    /// Any one-sided column that holds at least one value marks every
    /// common row as modified
    Mismatch,
}

impl MissingColumnPolicy {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pad" => Ok(Self::Pad),
            "ignore" => Ok(Self::Ignore),
            "mismatch" => Ok(Self::Mismatch),
            _ => Err(format!(
                "Invalid missing column policy: {}. Use 'pad', 'ignore', or 'mismatch'",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pad => "pad",
            Self::Ignore => "ignore",
            Self::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for MissingColumnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Emit unchanged rows in the result (they are always counted)
    pub include_unchanged: bool,
    /// Reject shared columns whose declared types are incompatible
    pub strict_types: bool,
    /// Let integers equal floats holding the same integral value
    pub numeric_cross_type: bool,
    pub missing_columns: MissingColumnPolicy,
    /// Name of the synthetic classification column
    pub status_column: String,
    /// Common-key count from which classification runs on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            include_unchanged: true,
            strict_types: false,
            numeric_cross_type: false,
            missing_columns: MissingColumnPolicy::default(),
            status_column: crate::DEFAULT_STATUS_COLUMN.to_string(),
            parallel_threshold: crate::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
