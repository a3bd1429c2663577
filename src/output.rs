//! Output formatting utilities

use crate::dataset::{ColumnInfo, Value};
use crate::error::{Result, TabreconError};
use crate::result::{ComparisonResult, DiffSummary, RowChange};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;

/// Pretty printer for terminal output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Render the summary tree, a sample of modified cells and up to
    /// `row_limit` result rows
    pub fn render_result(result: &ComparisonResult, row_limit: usize) -> String {
        let mut out = String::new();
        let summary = result.summary();

        let key = if result.key_columns().is_empty() {
            "row position".to_string()
        } else {
            result.key_columns().join(", ")
        };

        let _ = writeln!(out, "📊 tabrecon compare");
        let _ = writeln!(out, "├─ Key: {}", key);
        let _ = writeln!(out, "├─ Added: {}", summary.added);
        let _ = writeln!(out, "├─ Deleted: {}", summary.deleted);
        let _ = writeln!(out, "├─ Modified: {}", summary.modified);
        Self::render_changes(&mut out, result.changes(), "│  ");
        let _ = writeln!(out, "├─ Unchanged: {}", summary.unchanged);
        let _ = writeln!(out, "└─ Total keys: {}", summary.total());

        if result.row_count() > 0 && row_limit > 0 {
            let _ = writeln!(out);
            Self::render_rows(&mut out, result, row_limit);
        }

        if summary.has_changes() {
            let _ = writeln!(out);
            let _ = writeln!(out, "🟡 {} of {} keys changed", summary.total_changes(), summary.total());
        } else {
            let _ = writeln!(out);
            let _ = writeln!(out, "✅ Datasets match");
        }

        out
    }

    /// Modified-row sample, at most three rows and two cells per row
    fn render_changes(out: &mut String, changes: &[RowChange], prefix: &str) {
        for (i, change) in changes.iter().take(3).enumerate() {
            let is_last = i == std::cmp::min(2, changes.len() - 1);
            let row_marker = if is_last { "└─" } else { "├─" };
            if change.cells.is_empty() {
                let _ = writeln!(
                    out,
                    "{}{} {}: one-sided columns differ",
                    prefix, row_marker, change.key
                );
                continue;
            }
            let _ = writeln!(
                out,
                "{}{} {}: {} columns changed",
                prefix,
                row_marker,
                change.key,
                change.cells.len()
            );

            let cell_prefix = if is_last { "   " } else { "│  " };
            for (j, cell) in change.cells.iter().take(2).enumerate() {
                let is_last_cell = j == std::cmp::min(1, change.cells.len() - 1);
                let cell_marker = if is_last_cell { "└─" } else { "├─" };
                let _ = writeln!(
                    out,
                    "{}{}{} {}: '{}' → '{}'",
                    prefix, cell_prefix, cell_marker, cell.column, cell.before, cell.after
                );
            }
            if change.cells.len() > 2 {
                let _ = writeln!(
                    out,
                    "{}{}└─ ... and {} more",
                    prefix,
                    cell_prefix,
                    change.cells.len() - 2
                );
            }
        }

        if changes.len() > 3 {
            let _ = writeln!(out, "{}   ... and {} more modified rows", prefix, changes.len() - 3);
        }
    }

    fn render_rows(out: &mut String, result: &ComparisonResult, row_limit: usize) {
        let dataset = result.dataset();
        let header: Vec<&str> = dataset.column_names().collect();
        let _ = writeln!(out, "{}", header.join(" | "));

        for row in dataset.rows().iter().take(row_limit) {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            let _ = writeln!(out, "{}", cells.join(" | "));
        }

        if dataset.row_count() > row_limit {
            let _ = writeln!(out, "... and {} more rows", dataset.row_count() - row_limit);
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    format_version: &'static str,
    summary: &'a DiffSummary,
    key_columns: &'a [String],
    status_column: &'a str,
    columns: &'a [ColumnInfo],
    rows: Vec<IndexMap<&'a str, &'a Value>>,
    changes: &'a [RowChange],
    fingerprint: String,
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Rows are emitted as objects keyed in result column order
    pub fn format_result(result: &ComparisonResult) -> Result<String> {
        let dataset = result.dataset();
        let rows = dataset
            .rows()
            .iter()
            .map(|row| dataset.column_names().zip(row.iter()).collect())
            .collect();

        let report = JsonReport {
            format_version: crate::FORMAT_VERSION,
            summary: result.summary(),
            key_columns: result.key_columns(),
            status_column: result.status_column(),
            columns: dataset.columns(),
            rows,
            changes: result.changes(),
            fingerprint: result.fingerprint(),
        };

        Self::format(&report)
    }
}

/// CSV formatter; missing values become empty fields
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn format_result(result: &ComparisonResult) -> Result<String> {
        let dataset = result.dataset();
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(dataset.column_names())?;
        for row in dataset.rows() {
            writer.write_record(row.iter().map(csv_field))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| TabreconError::data_processing(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| TabreconError::data_processing(format!("CSV output is not UTF-8: {}", e)))
    }
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        // Debug keeps the decimal point, so 2.0 is not re-read as an integer
        Value::Float(f) => format!("{:?}", f),
        other => other.to_string(),
    }
}
