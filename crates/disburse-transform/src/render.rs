//! Serialized output text.

use serde_json::Value;

/// Two-space indented JSON, keys in template order.
pub fn render_pretty(document: &Value) -> String {
    format!("{document:#}")
}

/// Single-line JSON.
pub fn render_compact(document: &Value) -> String {
    document.to_string()
}

/// Pretty JSON array of all documents.
pub fn render_array(documents: &[Value]) -> String {
    render_pretty(&Value::Array(documents.to_vec()))
}
