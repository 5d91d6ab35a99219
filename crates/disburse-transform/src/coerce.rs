//! Conversion of cell text into typed JSON values.

use serde_json::{Number, Value};

use disburse_model::{Path, ValueType};

/// Terminal keys of fields that hold a list of ids.
///
/// Text written to these fields is kept only when it is itself a JSON
/// array; anything else resets the field to the full list.
pub const ARRAY_ID_FIELDS: &[(&str, &[u64])] =
    &[("allowed_payment_method_ids", &[1, 2, 3, 4, 5, 6, 7])];

/// Largest magnitude at which every integer is exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parses numeric text, falling back to `0`.
///
/// Integral results are written as JSON integers, so `"1"` gives `1` and
/// `"58.80"` gives `58.8`.
pub fn coerce_number(text: &str) -> Value {
    let parsed = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite());
    match parsed {
        Some(value) => number_value(value),
        None => Value::from(0),
    }
}

/// Writes a finite float as the narrowest JSON number.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        return Value::from(value as i64);
    }
    Number::from_f64(value).map_or_else(|| Value::from(0), Value::Number)
}

/// True only for `"true"`, ignoring case and surrounding whitespace.
pub fn coerce_boolean(text: &str) -> Value {
    Value::Bool(text.trim().eq_ignore_ascii_case("true"))
}

/// Converts text according to the declared type of its target field.
///
/// Types other than number and boolean pass the text through unchanged.
pub fn coerce(text: &str, declared: ValueType) -> Value {
    match declared {
        ValueType::Number => coerce_number(text),
        ValueType::Boolean => coerce_boolean(text),
        _ => Value::String(text.to_string()),
    }
}

/// Default id list when `path` ends in a known array-of-id key.
pub fn array_id_default(path: &Path) -> Option<Value> {
    let key = path.last_key()?;
    ARRAY_ID_FIELDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, ids)| Value::from(ids.to_vec()))
}

/// Converts text for `path`, honoring the array-of-id fields.
pub fn coerce_for_path(text: &str, path: &Path, declared: Option<ValueType>) -> Value {
    if let Some(default) = array_id_default(path) {
        return match serde_json::from_str::<Value>(text.trim()) {
            Ok(list @ Value::Array(_)) => list,
            _ => default,
        };
    }
    match declared {
        Some(value_type) => coerce(text, value_type),
        None => Value::String(text.to_string()),
    }
}
