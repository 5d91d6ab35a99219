//! Merge engine for disbursement payloads.
//!
//! Given a template, its fields and a mapping table, builds one JSON
//! document per CSV row:
//!
//! - [`engine`]: row merging, full-file transforms and first-row preview
//! - [`coerce`]: text to typed JSON by the declared field type
//! - [`render`]: pretty and compact serialization

pub mod coerce;
pub mod engine;
pub mod render;

pub use coerce::{ARRAY_ID_FIELDS, coerce, coerce_for_path};
pub use engine::{TransformEngine, transform_all, transform_row};
pub use render::{render_array, render_compact, render_pretty};
