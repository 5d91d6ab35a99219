//! Field extraction from example JSON documents.
//!
//! Only leaves are emitted, in document order:
//!
//! - scalars yield one field each, with the stringified value as example;
//! - objects are descended into but never emitted themselves;
//! - arrays are templates-of-one: the first element is walked at `[0]`.
//!   An array whose first element is a scalar is itself a leaf of type
//!   `array`. Empty arrays yield nothing.
//!
//! Elements after `[0]` are visited only where the catalog pins a path, so
//! the built-in template surfaces its second `field_values` slot.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde_json::Value;
use tracing::debug;

use disburse_model::{Path, TemplateField, ValueType, example_text};

use crate::catalog::FieldCatalog;
use crate::embedded::DEFAULT_TEMPLATE_JSON;
use crate::error::{Result, TemplateError};

static DEFAULT_TEMPLATE: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(DEFAULT_TEMPLATE_JSON).expect("embedded default template is valid")
});

/// Walks templates and annotates the fields it finds from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct TemplateExtractor<'c> {
    catalog: &'c FieldCatalog,
}

impl Default for TemplateExtractor<'static> {
    fn default() -> Self {
        Self::with_catalog(FieldCatalog::builtin())
    }
}

impl<'c> TemplateExtractor<'c> {
    pub fn with_catalog(catalog: &'c FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn extract(&self, template: &Value) -> Vec<TemplateField> {
        let mut fields = Vec::new();
        self.walk(template, Path::root(), false, &mut fields);
        debug!(field_count = fields.len(), "extracted template fields");
        fields
    }

    fn walk(&self, value: &Value, path: Path, pinned_only: bool, out: &mut Vec<TemplateField>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.walk(child, path.clone().child(key.as_str()), pinned_only, out);
                }
            }
            Value::Array(items) => {
                let Some(first) = items.first() else {
                    return;
                };
                if first.is_object() || first.is_array() {
                    self.walk(first, path.clone().index(0), pinned_only, out);
                    for (index, item) in items.iter().enumerate().skip(1) {
                        let element = path.clone().index(index);
                        if self.catalog.pins_under(&element) {
                            self.walk(item, element, true, out);
                        }
                    }
                } else {
                    self.emit(value, path, pinned_only, out);
                }
            }
            scalar => self.emit(scalar, path, pinned_only, out),
        }
    }

    fn emit(&self, value: &Value, path: Path, pinned_only: bool, out: &mut Vec<TemplateField>) {
        if path.is_empty() || (pinned_only && !self.catalog.contains(&path)) {
            return;
        }
        let field = TemplateField::new(path, ValueType::of(value), example_text(value));
        out.push(self.catalog.annotate(field));
    }
}

/// Extracts fields using the built-in catalog.
pub fn extract(template: &Value) -> Vec<TemplateField> {
    TemplateExtractor::default().extract(template)
}

/// Parses template text.
///
/// # Errors
///
/// Returns [`crate::TemplateError::InvalidJson`] when the text is not JSON.
pub fn parse_template(json_text: &str) -> Result<Value> {
    Ok(serde_json::from_str(json_text)?)
}

/// Parses template text and extracts its fields.
///
/// # Errors
///
/// Returns [`crate::TemplateError::InvalidJson`] when the text is not JSON.
pub fn extract_template_fields(json_text: &str) -> Result<Vec<TemplateField>> {
    let template = parse_template(json_text)?;
    Ok(extract(&template))
}

/// Reads and parses a template file.
///
/// # Errors
///
/// Returns [`crate::TemplateError::Io`] when the file cannot be read and
/// [`crate::TemplateError::InvalidJson`] when it is not JSON.
pub fn read_template_file(path: &std::path::Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read template file");
    parse_template(&text)
}

/// A fresh copy of the built-in disbursement template.
pub fn default_template() -> Value {
    DEFAULT_TEMPLATE.clone()
}

/// Fields of the built-in template.
pub fn default_template_fields() -> Vec<TemplateField> {
    extract(&DEFAULT_TEMPLATE)
}

/// Fields of `uploaded` whose paths the built-in template does not have.
pub fn additional_fields(uploaded: &Value) -> Vec<TemplateField> {
    let known: HashSet<Path> = default_template_fields()
        .into_iter()
        .map(|field| field.path)
        .collect();
    let additional: Vec<TemplateField> = extract(uploaded)
        .into_iter()
        .filter(|field| !known.contains(&field.path))
        .collect();
    debug!(
        additional_count = additional.len(),
        "filtered uploaded template against default fields"
    );
    additional
}

/// Built-in fields followed by the additional fields of `uploaded`.
pub fn merged_fields(uploaded: &Value) -> Vec<TemplateField> {
    let mut fields = default_template_fields();
    fields.extend(additional_fields(uploaded));
    fields
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paths(fields: &[TemplateField]) -> Vec<String> {
        fields.iter().map(|f| f.path.to_string()).collect()
    }

    #[test]
    fn leaves_in_document_order() {
        let template = json!({
            "zeta": "z",
            "alpha": {"inner": 1, "flag": true},
            "nothing": null
        });
        let fields = extract(&template);
        assert_eq!(paths(&fields), ["zeta", "alpha.inner", "alpha.flag", "nothing"]);
        assert_eq!(fields[1].value_type, ValueType::Number);
        assert_eq!(fields[1].example, "1");
        assert_eq!(fields[2].example, "true");
        assert_eq!(fields[3].value_type, ValueType::Null);
        assert_eq!(fields[3].example, "null");
    }

    #[test]
    fn arrays_of_objects_use_first_element() {
        let template = json!({"items": [{"x": 1}, {"x": 2, "y": 3}], "empty": []});
        assert_eq!(paths(&extract(&template)), ["items[0].x"]);
    }

    #[test]
    fn scalar_arrays_are_leaves() {
        let template = json!({"ids": [1, 2, 3]});
        let fields = extract(&template);
        assert_eq!(paths(&fields), ["ids"]);
        assert_eq!(fields[0].value_type, ValueType::Array);
        assert_eq!(fields[0].example, "[1,2,3]");
    }

    #[test]
    fn nested_arrays_recurse() {
        let template = json!({"grid": [[{"v": "a"}]]});
        assert_eq!(paths(&extract(&template)), ["grid[0][0].v"]);
    }

    #[test]
    fn scalar_root_has_no_fields() {
        assert!(extract(&json!(42)).is_empty());
    }

    #[test]
    fn invalid_json_reports_position() {
        let err = extract_template_fields("{\"a\": ").unwrap_err();
        assert!(matches!(err, crate::TemplateError::InvalidJson { line: 1, .. }));
    }
}
