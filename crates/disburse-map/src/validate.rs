//! Completeness checks of a mapping table against template fields.

use tracing::debug;

use disburse_model::{MappingTable, TemplateField, ValidationResult};

/// Checks that every required field has a complete binding.
///
/// Missing paths are listed in the order of `fields`. Fields that are not
/// flagged `required` are ignored.
pub fn validate(table: &MappingTable, fields: &[TemplateField]) -> ValidationResult {
    let missing: Vec<_> = fields
        .iter()
        .filter(|field| field.required)
        .filter(|field| {
            !table
                .complete()
                .any(|binding| binding.target_path.as_ref() == Some(&field.path))
        })
        .map(|field| field.path.clone())
        .collect();
    debug!(
        bindings = table.len(),
        missing = missing.len(),
        "validated mapping table"
    );
    ValidationResult::from_missing(missing)
}
