//! Built-in template data, embedded at compile time.

/// The payee disbursement record every mapping starts from.
pub const DEFAULT_TEMPLATE_JSON: &str = include_str!("../data/default_template.json");

/// Fixed annotations (required flag, description, sample value) for the
/// fields of the default template.
pub const FIELD_CATALOG_JSON: &str = include_str!("../data/field_catalog.json");
