//! The fixed field catalog of the default template.
//!
//! Whether a field is required is policy, not something an uploaded example
//! can express, so the flag only ever comes from this catalog.

use std::sync::LazyLock;

use disburse_model::{Path, TemplateField};

use crate::embedded::FIELD_CATALOG_JSON;

static BUILTIN_CATALOG: LazyLock<FieldCatalog> = LazyLock::new(|| {
    let fields: Vec<TemplateField> =
        serde_json::from_str(FIELD_CATALOG_JSON).expect("embedded field catalog is valid");
    FieldCatalog::new(fields)
});

/// Known fields with their required flag and description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    fields: Vec<TemplateField>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<TemplateField>) -> Self {
        Self { fields }
    }

    /// Catalog of the built-in disbursement template.
    pub fn builtin() -> &'static FieldCatalog {
        &BUILTIN_CATALOG
    }

    pub fn fields(&self) -> &[TemplateField] {
        &self.fields
    }

    pub fn get(&self, path: &Path) -> Option<&TemplateField> {
        self.fields.iter().find(|field| &field.path == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// True when some catalog path lies at or below `prefix`.
    pub fn pins_under(&self, prefix: &Path) -> bool {
        self.fields.iter().any(|field| field.path.starts_with(prefix))
    }

    /// Required fields, in catalog order.
    pub fn required_fields(&self) -> impl Iterator<Item = &TemplateField> {
        self.fields.iter().filter(|field| field.required)
    }

    /// Copies the catalog's policy flags onto an extracted field.
    pub fn annotate(&self, mut field: TemplateField) -> TemplateField {
        if let Some(known) = self.get(&field.path) {
            field.required = known.required;
            field.description.clone_from(&known.description);
        }
        field
    }
}
