//! Auto-binding of CSV columns to template paths.
//!
//! Suggestions compare a normalized source name with the normalized last
//! dotted chunk of each candidate path, so `Payee UUID` binds to
//! `disbursements[0].payees[0].payee_uuid`. Only exact normalized matches
//! bind. [`rank_candidates`] offers fuzzy near matches for display.

use std::cmp::Ordering;
use std::collections::HashSet;

use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;
use tracing::debug;

use disburse_model::{MappingTable, Path, TemplateField};

/// Lowercases and drops whitespace, `_`, `[`, `]` and `.`.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '[' | ']' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// The text after the last `.` of a rendered path.
fn last_chunk(path: &Path) -> String {
    let text = path.to_string();
    match text.rsplit_once('.') {
        Some((_, tail)) => tail.to_string(),
        None => text,
    }
}

/// A proposed target for one binding of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSuggestion {
    /// Position of the binding in the table.
    pub binding_index: usize,
    pub source_field: String,
    pub target_path: Path,
}

/// Proposes targets for column bindings that have none yet.
///
/// Static bindings and bindings with a target are left alone, and a path
/// already bound by another binding is never proposed again.
pub fn suggest_targets(table: &MappingTable, fields: &[TemplateField]) -> Vec<TargetSuggestion> {
    let keyed: Vec<(String, &Path)> = fields
        .iter()
        .map(|field| (normalize_key(&last_chunk(&field.path)), &field.path))
        .collect();
    let mut taken: HashSet<&Path> = table
        .bindings()
        .iter()
        .filter_map(|binding| binding.target_path.as_ref())
        .collect();

    let mut suggestions = Vec::new();
    for (index, binding) in table.bindings().iter().enumerate() {
        if binding.is_static || binding.target_path.is_some() {
            continue;
        }
        let Some(source) = binding.source() else {
            continue;
        };
        let wanted = normalize_key(source);
        if wanted.is_empty() {
            continue;
        }
        let found = keyed
            .iter()
            .find(|(key, path)| *key == wanted && !taken.contains(*path));
        if let Some((_, path)) = found {
            taken.insert(*path);
            suggestions.push(TargetSuggestion {
                binding_index: index,
                source_field: source.to_string(),
                target_path: (*path).clone(),
            });
        }
    }
    debug!(count = suggestions.len(), "suggested mapping targets");
    suggestions
}

/// Writes suggestions into the table. Returns how many were applied.
///
/// A suggestion is skipped when its binding has gained a target since the
/// suggestion was made.
pub fn apply_suggestions(table: &mut MappingTable, suggestions: &[TargetSuggestion]) -> usize {
    let mut applied = 0;
    for suggestion in suggestions {
        let Some(binding) = table.bindings_mut().get_mut(suggestion.binding_index) else {
            continue;
        };
        if binding.is_static || binding.target_path.is_some() {
            continue;
        }
        binding.target_path = Some(suggestion.target_path.clone());
        applied += 1;
    }
    applied
}

/// Suggests and applies targets in one step.
pub fn auto_bind(table: &mut MappingTable, fields: &[TemplateField]) -> usize {
    let suggestions = suggest_targets(table, fields);
    apply_suggestions(table, &suggestions)
}

/// A scored near match for a source column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub path: Path,
    /// Jaro-Winkler similarity in `0.0..=1.0`.
    pub score: f64,
}

/// Ranks fields by similarity to `source`, best first.
///
/// Ties keep field order. Scores of zero are left out.
pub fn rank_candidates(source: &str, fields: &[TemplateField], limit: usize) -> Vec<Candidate> {
    let wanted = normalize_key(source);
    let mut candidates: Vec<Candidate> = fields
        .iter()
        .map(|field| {
            let key = normalize_key(&last_chunk(&field.path));
            Candidate {
                path: field.path.clone(),
                score: jaro_winkler::similarity(wanted.chars(), key.chars()),
            }
        })
        .filter(|candidate| candidate.score > 0.0)
        .collect();
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators() {
        assert_eq!(normalize_key(" Payee_UUID "), "payeeuuid");
        assert_eq!(normalize_key("field_values[0]"), "fieldvalues0");
        assert_eq!(normalize_key("Zip.Code"), "zipcode");
    }

    #[test]
    fn last_chunk_of_indexed_path() {
        let path = Path::parse("a.b[0].c_d").unwrap();
        assert_eq!(last_chunk(&path), "c_d");
        let path = Path::parse("list[2]").unwrap();
        assert_eq!(last_chunk(&path), "list[2]");
    }
}
