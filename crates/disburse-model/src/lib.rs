//! Shared data model for CSV-to-payload mapping.

pub mod error;
pub mod field;
pub mod mapping;
pub mod path;
pub mod table;

pub use error::{PathConflict, PathError, Result};
pub use field::{TemplateField, ValueType, example_text};
pub use mapping::{MappingBinding, MappingTable, ValidationResult};
pub use path::{MAX_ARRAY_PADDING, Path, Segment};
pub use table::{CsvDocument, RowValues};
