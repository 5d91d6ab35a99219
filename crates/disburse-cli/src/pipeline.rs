//! Command building blocks: loading inputs, merging rows and delivering
//! output files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{info, trace, warn};

use disburse_ingest::{IngestReport, read_csv_report};
use disburse_map::{Candidate, MapError, MappingStore, SavedMapping, auto_bind, rank_candidates};
use disburse_model::{CsvDocument, MappingTable, TemplateField};
use disburse_output::{OutputFile, UploadSink, UploadTarget};
use disburse_template::{
    additional_fields, default_template, default_template_fields, extract, read_template_file,
};
use disburse_transform::TransformEngine;

use crate::logging::redact_value;

/// A template document together with its addressable fields.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub document: Value,
    pub fields: Vec<TemplateField>,
    /// File the template came from; `None` for the built-in template.
    pub source: Option<PathBuf>,
}

impl LoadedTemplate {
    pub fn builtin() -> Self {
        Self {
            document: default_template(),
            fields: default_template_fields(),
            source: None,
        }
    }

    /// Fields of an uploaded template that the built-in one lacks.
    pub fn additional_fields(&self) -> Vec<TemplateField> {
        match self.source {
            Some(_) => additional_fields(&self.document),
            None => Vec::new(),
        }
    }
}

/// Loads the template at `path`, or the built-in template.
pub fn load_template(path: Option<&Path>) -> Result<LoadedTemplate> {
    let Some(path) = path else {
        return Ok(LoadedTemplate::builtin());
    };
    let document = read_template_file(path)
        .with_context(|| format!("load template {}", path.display()))?;
    let fields = extract(&document);
    info!(path = %path.display(), fields = fields.len(), "loaded template");
    Ok(LoadedTemplate {
        document,
        fields,
        source: Some(path.to_path_buf()),
    })
}

/// Reads and parses a CSV file, keeping the dropped-line report.
pub fn load_csv(path: &Path) -> Result<IngestReport> {
    let report =
        read_csv_report(path).with_context(|| format!("load CSV {}", path.display()))?;
    if !report.dropped_lines.is_empty() {
        warn!(
            path = %path.display(),
            lines = ?report.dropped_lines,
            "rows with the wrong number of cells were dropped"
        );
    }
    info!(
        path = %path.display(),
        columns = report.document.headers.len(),
        rows = report.document.row_count(),
        "loaded CSV"
    );
    Ok(report)
}

/// Reads a mapping file holding either a saved mapping or a bare table.
pub fn read_mapping_file(path: &Path) -> Result<MappingTable> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read mapping {}", path.display()))?;
    if let Ok(saved) = serde_json::from_str::<SavedMapping>(&text) {
        return Ok(saved.bindings);
    }
    serde_json::from_str::<MappingTable>(&text)
        .with_context(|| format!("parse mapping {}", path.display()))
}

/// Resolves a mapping reference: a file path, a saved id, or a saved name.
pub fn resolve_mapping(store: &dyn MappingStore, reference: &str) -> Result<MappingTable> {
    let as_path = Path::new(reference);
    if as_path.is_file() {
        return read_mapping_file(as_path);
    }
    match store.load(reference) {
        Ok(saved) => return Ok(saved.bindings),
        Err(MapError::NotFound { .. } | MapError::InvalidId { .. }) => {}
        Err(err) => return Err(err).context("load saved mapping"),
    }
    store
        .find_by_name(reference)
        .context("search saved mappings")?
        .map(|saved| saved.bindings)
        .ok_or_else(|| anyhow!("no mapping file, id or name matches '{reference}'"))
}

/// A header left unbound after suggestion, with its nearest fields.
#[derive(Debug, Clone)]
pub struct UnboundHeader {
    pub header: String,
    pub candidates: Vec<Candidate>,
}

/// Result of auto-binding CSV headers.
#[derive(Debug, Clone)]
pub struct SuggestOutcome {
    pub table: MappingTable,
    pub applied: usize,
    pub unbound: Vec<UnboundHeader>,
}

/// Builds a table from CSV headers and binds what normalizes exactly.
pub fn suggest_mapping(csv: &CsvDocument, fields: &[TemplateField], candidates: usize) -> SuggestOutcome {
    let mut table = MappingTable::from_headers(&csv.headers);
    let applied = auto_bind(&mut table, fields);
    let unbound = table
        .bindings()
        .iter()
        .filter(|binding| binding.target_path.is_none())
        .filter_map(|binding| binding.source())
        .map(|header| UnboundHeader {
            header: header.to_string(),
            candidates: rank_candidates(header, fields, candidates),
        })
        .collect();
    SuggestOutcome {
        table,
        applied,
        unbound,
    }
}

/// Merges every CSV row into the template.
pub fn transform_rows(template: &LoadedTemplate, table: &MappingTable, csv: &CsvDocument) -> Vec<Value> {
    let engine = TransformEngine::new(&template.document, &template.fields, table);
    csv.iter_row_values()
        .enumerate()
        .map(|(index, row)| {
            for (column, value) in &row {
                trace!(row = index + 1, column = %column, value = redact_value(value), "cell");
            }
            engine.transform_row(&row)
        })
        .collect()
}

/// The document built from the first CSV row.
pub fn preview_row(template: &LoadedTemplate, table: &MappingTable, csv: &CsvDocument) -> Option<Value> {
    TransformEngine::new(&template.document, &template.fields, table).preview(csv)
}

/// Upload target from configuration, with a remote path override.
///
/// Without a configured target, files go to a local target rooted at `/`.
pub fn resolve_target(configured: Option<&UploadTarget>, remote_path: Option<&str>) -> UploadTarget {
    let mut target = configured
        .cloned()
        .unwrap_or_else(|| UploadTarget::new("localhost", "local", ""));
    if let Some(remote_path) = remote_path {
        target.remote_path = remote_path.to_string();
    }
    target
}

/// Uploads every file, reporting each finished file to `on_file`.
pub fn deliver(
    sink: &dyn UploadSink,
    target: &UploadTarget,
    files: &[OutputFile],
    mut on_file: impl FnMut(&OutputFile),
) -> Result<Vec<String>> {
    let mut remote_paths = Vec::with_capacity(files.len());
    for file in files {
        let remote = sink
            .upload(target, &file.content, &file.name)
            .with_context(|| format!("upload {}", file.name))?;
        info!(file = %file.name, remote = %remote, "delivered");
        remote_paths.push(remote);
        on_file(file);
    }
    Ok(remote_paths)
}
