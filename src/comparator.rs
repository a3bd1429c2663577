//! Null-safe cell equality

use crate::dataset::Value;

/// Exact, null-safe equality over single cell values.
///
/// Two missing markers are equal; a missing marker never equals a present
/// value. Present values must share a type unless numeric cross-type
/// comparison is enabled, in which case an integer equals a float holding
/// exactly the same integral value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellComparator {
    numeric_cross_type: bool,
}

impl CellComparator {
    pub fn new(numeric_cross_type: bool) -> Self {
        Self { numeric_cross_type }
    }

    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i))
                if self.numeric_cross_type =>
            {
                int_equals_float(*i, *f)
            }
            _ => a == b,
        }
    }
}

fn int_equals_float(i: i64, f: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.is_finite() && f.fract() == 0.0 && f >= -LIMIT && f < LIMIT && f as i64 == i
}
