//! Disbursement templates: the built-in example document, its field
//! catalog, and extraction of addressable fields from any JSON example.

pub mod catalog;
mod embedded;
pub mod error;
pub mod extract;

pub use catalog::FieldCatalog;
pub use error::{Result, TemplateError};
pub use extract::{
    TemplateExtractor, additional_fields, default_template, default_template_fields, extract,
    extract_template_fields, merged_fields, parse_template, read_template_file,
};
