//! CSV text parsing into a header row and equal-width data rows.

mod reader;
mod scanner;

pub use reader::{read_csv_file, read_csv_report, validate_encoding};
pub use scanner::{dedupe_headers, normalize_field, parse_csv_line, unquote_header};

use tracing::{debug, warn};

use disburse_model::CsvDocument;

use crate::error::{IngestError, Result};

/// A parsed document plus the rows that were dropped for having the wrong
/// number of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub document: CsvDocument,
    /// 1-based line numbers of the dropped rows.
    pub dropped_lines: Vec<usize>,
}

impl IngestReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped_lines.len()
    }
}

/// Parses CSV text, silently dropping ragged rows.
///
/// # Errors
///
/// Returns [`IngestError::EmptyCsv`] when the text holds no lines.
pub fn parse_csv(text: &str) -> Result<CsvDocument> {
    parse_csv_with_report(text).map(|report| report.document)
}

/// Parses CSV text and reports which lines were dropped.
///
/// # Errors
///
/// Returns [`IngestError::EmptyCsv`] when the text holds no lines.
pub fn parse_csv_with_report(text: &str) -> Result<IngestReport> {
    let clean = text.strip_prefix('\u{FEFF}').unwrap_or(text).trim_end();
    let mut lines = clean
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .skip_while(|(_, line)| line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(IngestError::EmptyCsv);
    };
    let headers = dedupe_headers(
        parse_csv_line(header_line)
            .iter()
            .map(String::as_str)
            .map(unquote_header)
            .collect(),
    );

    let mut rows = Vec::new();
    let mut dropped_lines = Vec::new();
    for (index, line) in lines {
        let cells = parse_csv_line(line);
        if cells.len() == headers.len() {
            rows.push(cells);
        } else {
            dropped_lines.push(index + 1);
        }
    }

    if !dropped_lines.is_empty() {
        warn!(
            dropped = dropped_lines.len(),
            columns = headers.len(),
            "dropped CSV rows with mismatched cell counts"
        );
    }
    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");

    Ok(IngestReport {
        document: CsvDocument { headers, rows },
        dropped_lines,
    })
}
