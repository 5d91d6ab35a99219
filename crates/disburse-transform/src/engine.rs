//! Applying a mapping table to CSV rows.
//!
//! Every output document starts as a deep clone of the template. Each
//! complete binding then writes its coerced value at its target path, in
//! table order, so a later binding to the same path wins. Documents depend
//! only on their own row.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use disburse_model::{
    CsvDocument, MappingBinding, MappingTable, Path, RowValues, TemplateField, ValueType,
};

use crate::coerce::coerce_for_path;

/// A template, its declared field types and a mapping table, ready to
/// merge rows.
#[derive(Debug, Clone)]
pub struct TransformEngine<'a> {
    template: &'a Value,
    types: HashMap<&'a Path, ValueType>,
    bindings: Vec<&'a MappingBinding>,
}

impl<'a> TransformEngine<'a> {
    pub fn new(template: &'a Value, fields: &'a [TemplateField], table: &'a MappingTable) -> Self {
        let types = fields
            .iter()
            .map(|field| (&field.path, field.value_type))
            .collect();
        let bindings: Vec<&MappingBinding> = table.complete().collect();
        debug!(
            bindings = bindings.len(),
            skipped = table.len() - bindings.len(),
            "prepared transform"
        );
        Self {
            template,
            types,
            bindings,
        }
    }

    /// Declared type of the field at `path`, when the field list has it.
    pub fn declared_type(&self, path: &Path) -> Option<ValueType> {
        self.types.get(path).copied()
    }

    /// Builds the document for one row.
    ///
    /// Columns missing from `row` read as empty text. Bindings whose path
    /// runs through a scalar or addresses an array by key are logged and
    /// skipped.
    pub fn transform_row(&self, row: &RowValues) -> Value {
        let mut document = self.template.clone();
        for binding in &self.bindings {
            let Some(path) = binding.target_path.as_ref() else {
                continue;
            };
            let raw = if binding.is_static {
                binding.static_value.as_str()
            } else {
                binding
                    .source()
                    .and_then(|column| row.get(column))
                    .map_or("", String::as_str)
            };
            let value = coerce_for_path(raw, path, self.declared_type(path));
            if let Err(conflict) = path.set(&mut document, value) {
                warn!(path = %path, error = %conflict, "skipping binding with conflicting path");
            }
        }
        document
    }

    /// Builds one document per data row, in row order.
    pub fn transform_all(&self, csv: &CsvDocument) -> Vec<Value> {
        let documents: Vec<Value> = csv
            .iter_row_values()
            .map(|row| self.transform_row(&row))
            .collect();
        debug!(documents = documents.len(), "transformed rows");
        documents
    }

    /// The document for the first data row, if there is one.
    pub fn preview(&self, csv: &CsvDocument) -> Option<Value> {
        csv.first_row().map(|row| self.transform_row(&row))
    }
}

/// Builds the document for one row.
pub fn transform_row(
    template: &Value,
    fields: &[TemplateField],
    table: &MappingTable,
    row: &RowValues,
) -> Value {
    TransformEngine::new(template, fields, table).transform_row(row)
}

/// Builds one document per data row of `csv`.
pub fn transform_all(
    template: &Value,
    fields: &[TemplateField],
    table: &MappingTable,
    csv: &CsvDocument,
) -> Vec<Value> {
    TransformEngine::new(template, fields, table).transform_all(csv)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RowValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn later_binding_wins() {
        let template = json!({"a": ""});
        let path = Path::parse("a").unwrap();
        let table = MappingTable::new(vec![
            MappingBinding::column("X", path.clone()),
            MappingBinding::fixed(path, "fixed"),
        ]);
        let doc = transform_row(&template, &[], &table, &row(&[("X", "col")]));
        assert_eq!(doc, json!({"a": "fixed"}));
    }

    #[test]
    fn missing_column_writes_empty_text() {
        let template = json!({"a": "keep"});
        let table = MappingTable::new(vec![MappingBinding::column("Gone", Path::parse("a").unwrap())]);
        let doc = transform_row(&template, &[], &table, &row(&[]));
        assert_eq!(doc, json!({"a": ""}));
    }

    #[test]
    fn conflicting_path_is_skipped() {
        let template = json!({"a": "scalar", "b": 1});
        let table = MappingTable::new(vec![
            MappingBinding::fixed(Path::parse("a.inner").unwrap(), "x"),
            MappingBinding::fixed(Path::parse("b").unwrap(), "2"),
        ]);
        let doc = transform_row(&template, &[], &table, &row(&[]));
        assert_eq!(doc, json!({"a": "scalar", "b": "2"}));
    }

    #[test]
    fn creates_missing_containers() {
        let template = json!({});
        let table = MappingTable::new(vec![MappingBinding::fixed(
            Path::parse("x.list[1].name").unwrap(),
            "n",
        )]);
        let doc = transform_row(&template, &[], &table, &row(&[]));
        assert_eq!(doc, json!({"x": {"list": [null, {"name": "n"}]}}));
    }

    #[test]
    fn far_array_index_is_skipped() {
        let template = json!({"a": [], "b": ""});
        let table = MappingTable::new(vec![
            MappingBinding::fixed(Path::parse("a[18446744073709551615]").unwrap(), "x"),
            MappingBinding::fixed(Path::parse("a[4000000000]").unwrap(), "y"),
            MappingBinding::fixed(Path::parse("b").unwrap(), "kept"),
        ]);
        let doc = transform_row(&template, &[], &table, &row(&[]));
        assert_eq!(doc, json!({"a": [], "b": "kept"}));
    }

    #[test]
    fn zero_padded_template_key_is_overwritten_in_place() {
        let template = json!({"codes": {"007": "old"}});
        let table = MappingTable::new(vec![MappingBinding::fixed(
            Path::root().child("codes").child("007"),
            "new",
        )]);
        let doc = transform_row(&template, &[], &table, &row(&[]));
        assert_eq!(doc, json!({"codes": {"007": "new"}}));
    }
}
