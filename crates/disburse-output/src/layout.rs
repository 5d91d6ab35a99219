//! Naming and grouping of output documents into files.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use disburse_transform::{render_array, render_pretty};

/// How transformed documents are grouped into files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// One file holding a JSON array of every document.
    #[default]
    Array,
    /// One file per CSV row.
    PerRow,
}

impl OutputLayout {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::PerRow => "per-row",
        }
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(Self::Array),
            "per-row" | "per_row" | "perrow" => Ok(Self::PerRow),
            other => Err(format!("unknown output layout '{other}'")),
        }
    }
}

/// Rendered content waiting to be written or uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
}

/// Output file name derived from the source CSV name.
///
/// `payees.csv` gives `payees_transformed.json`, and with a 1-based row
/// number `payees_transformed_3.json`. Without a source name the current
/// UTC time is used instead of the stem.
pub fn output_file_name(source_csv: Option<&str>, row: Option<usize>) -> String {
    output_file_name_at(source_csv, row, Utc::now())
}

/// [`output_file_name`] with an explicit clock.
pub fn output_file_name_at(source_csv: Option<&str>, row: Option<usize>, now: DateTime<Utc>) -> String {
    let stem = source_csv.map(csv_stem).filter(|stem| !stem.is_empty());
    let base = match stem {
        Some(stem) => format!("{stem}_transformed"),
        None => format!("transformed_{}", now.format("%Y%m%dT%H%M%SZ")),
    };
    match row {
        Some(row) => format!("{base}_{row}.json"),
        None => format!("{base}.json"),
    }
}

/// File name without directories or a trailing `.csv` (any case).
fn csv_stem(source: &str) -> &str {
    let name = source.rsplit(['/', '\\']).next().unwrap_or(source).trim();
    match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".csv") => &name[..cut],
        _ => name,
    }
}

/// Groups rendered documents into files according to `layout`.
///
/// An empty document list yields no files.
pub fn plan_outputs(documents: &[Value], layout: OutputLayout, source_csv: Option<&str>) -> Vec<OutputFile> {
    plan_outputs_at(documents, layout, source_csv, Utc::now())
}

/// [`plan_outputs`] with an explicit clock.
pub fn plan_outputs_at(
    documents: &[Value],
    layout: OutputLayout,
    source_csv: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<OutputFile> {
    if documents.is_empty() {
        return Vec::new();
    }
    match layout {
        OutputLayout::Array => vec![OutputFile {
            name: output_file_name_at(source_csv, None, now),
            content: render_array(documents),
        }],
        OutputLayout::PerRow => documents
            .iter()
            .enumerate()
            .map(|(index, document)| OutputFile {
                name: output_file_name_at(source_csv, Some(index + 1), now),
                content: render_pretty(document),
            })
            .collect(),
    }
}
