//! Reading CSV files from disk.

use std::path::Path;

use tracing::debug;

use disburse_model::CsvDocument;

use crate::error::{IngestError, Result};

use super::{IngestReport, parse_csv_with_report};

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks the leading bytes for UTF-16 byte-order marks. A UTF-8 BOM is
/// accepted and stripped during parsing.
pub fn validate_encoding(bytes: &[u8], path: &Path) -> Result<()> {
    let encoding = match bytes {
        [0xFF, 0xFE, ..] => "UTF-16 LE",
        [0xFE, 0xFF, ..] => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding,
    })
}

/// Reads and parses a CSV file.
///
/// # Errors
///
/// Fails when the file is missing or unreadable, is not UTF-8, or holds
/// no lines.
pub fn read_csv_file(path: &Path) -> Result<CsvDocument> {
    read_csv_report(path).map(|report| report.document)
}

/// Reads a CSV file and reports the dropped lines.
///
/// # Errors
///
/// Same as [`read_csv_file`].
pub fn read_csv_report(path: &Path) -> Result<IngestReport> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    validate_encoding(&bytes, path)?;

    let text = String::from_utf8(bytes).map_err(|e| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read CSV file");
    parse_csv_with_report(&text)
}
