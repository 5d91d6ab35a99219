//! Mapping tables: completeness validation, target suggestion, fuzzy
//! candidate ranking, and storage of saved mappings.

pub mod error;
pub mod repository;
pub mod suggest;
pub mod validate;

pub use error::{MapError, Result};
pub use repository::{JsonFileStore, MappingStore, MemoryStore, SavedMapping, mapping_id};
pub use suggest::{
    Candidate, TargetSuggestion, apply_suggestions, auto_bind, normalize_key, rank_candidates,
    suggest_targets,
};
pub use validate::validate;
