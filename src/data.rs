//! Dataset loading using DuckDB

use crate::dataset::{ColumnInfo, Dataset, Value};
use crate::error::{Result, TabreconError};
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::Connection;
use std::path::Path;

/// Days between 0001-01-01 and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Reads tabular files (CSV, Parquet, JSON) into in-memory datasets
pub struct DataProcessor {
    connection: Connection,
}

impl DataProcessor {
    /// Create a new data processor with default settings
    pub fn new() -> Result<Self> {
        Self::new_with_config(crate::DEFAULT_MEMORY_LIMIT)
    }

    /// Create a new data processor with a custom DuckDB memory limit
    pub fn new_with_config(memory_limit: &str) -> Result<Self> {
        if memory_limit.is_empty()
            || !memory_limit
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == ' ')
        {
            return Err(TabreconError::config(format!(
                "Invalid memory limit: '{}'",
                memory_limit
            )));
        }

        let connection = Connection::open_in_memory()?;
        connection.execute(&format!("SET memory_limit='{}'", memory_limit), [])?;
        connection.execute("SET enable_progress_bar=false", [])?;
        // Row order is the identity in positional comparisons
        connection.execute("SET preserve_insertion_order=true", [])?;

        Ok(Self { connection })
    }

    /// Load a file as a dataset named `name`
    pub fn load_dataset(&self, file_path: &Path, name: &str) -> Result<Dataset> {
        if !file_path.exists() {
            return Err(TabreconError::invalid_input(format!(
                "File not found: {}",
                file_path.display()
            )));
        }

        if !file_path.is_file() {
            return Err(TabreconError::invalid_input(format!(
                "Path is not a file: {}",
                file_path.display()
            )));
        }

        let path_str = file_path.to_string_lossy().replace('\'', "''");
        let create_view_sql = format!(
            "CREATE OR REPLACE VIEW data_view AS SELECT * FROM '{}'",
            path_str
        );

        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| self.convert_duckdb_error(e, file_path))?;

        let columns = self.get_column_info()?;
        let rows = self.extract_rows(&columns)?;

        log::debug!(
            "Loaded {} rows x {} columns from {}",
            rows.len(),
            columns.len(),
            file_path.display()
        );

        Ok(Dataset::new(name, columns, rows)?)
    }

    /// Convert DuckDB errors to appropriate TabreconError types
    fn convert_duckdb_error(&self, error: duckdb::Error, file_path: &Path) -> TabreconError {
        let error_msg = error.to_string();

        if error_msg.contains("CSV Error")
            || error_msg.contains("Could not convert")
            || error_msg.contains("Invalid CSV")
            || error_msg.contains("Unterminated quoted field")
        {
            TabreconError::invalid_input(format!(
                "Malformed CSV file '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else if error_msg.contains("JSON") {
            TabreconError::invalid_input(format!(
                "Malformed JSON file '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else if error_msg.contains("No files found") || error_msg.contains("does not exist") {
            TabreconError::invalid_input(format!("File not found: {}", file_path.display()))
        } else if error_msg.contains("UTF-8") || error_msg.contains("encoding") {
            TabreconError::invalid_input(format!(
                "File encoding error '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else {
            TabreconError::DuckDb(error)
        }
    }

    /// Get column information from the current view
    fn get_column_info(&self) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.connection.prepare("DESCRIBE data_view").map_err(|e| {
            TabreconError::data_processing(format!("Failed to prepare describe query: {}", e))
        })?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get::<_, String>(0)?,
                    data_type: row.get::<_, String>(1)?,
                    nullable: row
                        .get::<_, Option<String>>(2)?
                        .map(|n| n != "NO")
                        .unwrap_or(true),
                })
            })
            .map_err(|e| {
                TabreconError::data_processing(format!("Failed to query column info: {}", e))
            })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row.map_err(|e| {
                TabreconError::data_processing(format!("Failed to process column info row: {}", e))
            })?);
        }

        Ok(columns)
    }

    /// Extract all rows as typed values, in file order
    fn extract_rows(&self, columns: &[ColumnInfo]) -> Result<Vec<Vec<Value>>> {
        let column_count = columns.len();
        if column_count == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.connection.prepare("SELECT * FROM data_view").map_err(|e| {
            TabreconError::data_processing(format!("Failed to prepare data extraction query: {}", e))
        })?;

        let raw_rows = stmt
            .query_map([], |row| {
                (0..column_count)
                    .map(|i| row.get::<_, DuckValue>(i))
                    .collect::<duckdb::Result<Vec<_>>>()
            })
            .map_err(|e| {
                TabreconError::data_processing(format!("Failed to extract data rows: {}", e))
            })?;

        let mut rows = Vec::new();
        for raw in raw_rows {
            let raw = raw.map_err(|e| {
                TabreconError::data_processing(format!("Failed to process data row: {}", e))
            })?;
            let row = raw
                .into_iter()
                .zip(columns)
                .map(|(value, col)| convert_value(value, &col.name))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Map a DuckDB value onto the engine's value model. SQL NULL becomes the
/// missing marker; nested types are rejected rather than flattened.
fn convert_value(value: DuckValue, column: &str) -> Result<Value> {
    let converted = match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Boolean(b),
        DuckValue::TinyInt(i) => Value::Integer(i as i64),
        DuckValue::SmallInt(i) => Value::Integer(i as i64),
        DuckValue::Int(i) => Value::Integer(i as i64),
        DuckValue::BigInt(i) => Value::Integer(i),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::UTinyInt(i) => Value::Integer(i as i64),
        DuckValue::USmallInt(i) => Value::Integer(i as i64),
        DuckValue::UInt(i) => Value::Integer(i as i64),
        DuckValue::UBigInt(i) => i64::try_from(i)
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::Float(f) => Value::Float(f as f64),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Decimal(d) => convert_decimal(d.value(), u32::from(d.scale())),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Blob(b) => Value::Bytes(b),
        DuckValue::Date32(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Value::Date)
            .ok_or_else(|| out_of_range(column, "date"))?,
        DuckValue::Timestamp(unit, v) => split_seconds(unit, v)
            .and_then(|(secs, nanos)| DateTime::from_timestamp(secs, nanos))
            .map(|dt| Value::Timestamp(dt.naive_utc()))
            .ok_or_else(|| out_of_range(column, "timestamp"))?,
        DuckValue::Time64(unit, v) => split_seconds(unit, v)
            .and_then(|(secs, nanos)| {
                NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(secs).ok()?, nanos)
            })
            .map(|t| Value::Text(t.to_string()))
            .ok_or_else(|| out_of_range(column, "time"))?,
        other => {
            return Err(TabreconError::data_processing(format!(
                "Unsupported value in column '{}': {:?}",
                column, other
            )))
        }
    };

    Ok(converted)
}

/// Whole seconds and the sub-second remainder in nanoseconds, at full
/// precision for every unit
fn split_seconds(unit: TimeUnit, v: i64) -> Option<(i64, u32)> {
    let per_second: i64 = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    };
    let nanos_per_tick = 1_000_000_000 / per_second;
    let nanos = v.rem_euclid(per_second) * nanos_per_tick;
    Some((v.div_euclid(per_second), u32::try_from(nanos).ok()?))
}

/// Exact decimal `mantissa / 10^scale` as an integer or float when either
/// holds it without loss, else as canonical text (trailing zeros trimmed)
fn convert_decimal(mantissa: i128, scale: u32) -> Value {
    let (mut mantissa, mut scale) = (mantissa, scale);
    while scale > 0 && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }

    if scale == 0 {
        if let Ok(i) = i64::try_from(mantissa) {
            return Value::Integer(i);
        }
    } else if let Some(pow5) = 5i128.checked_pow(scale) {
        // m / 10^s == (m / 5^s) / 2^s, exact in f64 when m / 5^s fits 53 bits
        if mantissa % pow5 == 0 {
            let odd = mantissa / pow5;
            if odd.unsigned_abs() < (1u128 << 53) {
                return Value::Float(odd as f64 / 2f64.powi(scale as i32));
            }
        }
    }

    let digits = mantissa.unsigned_abs().to_string();
    let sign = if mantissa < 0 { "-" } else { "" };
    let scale = scale as usize;
    if scale == 0 {
        return Value::Text(format!("{}{}", sign, digits));
    }
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (whole, frac) = padded.split_at(padded.len() - scale);
    Value::Text(format!("{}{}.{}", sign, whole, frac))
}

fn out_of_range(column: &str, kind: &str) -> TabreconError {
    TabreconError::data_processing(format!("Out-of-range {} in column '{}'", kind, column))
}
