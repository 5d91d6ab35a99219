//! CSV ingestion for disbursement mapping.
//!
//! Parses raw CSV exports into a [`disburse_model::CsvDocument`]: a unique
//! header row and data rows that all have exactly one cell per header.

pub mod csv;
pub mod error;

pub use csv::{
    IngestReport, parse_csv, parse_csv_line, parse_csv_with_report, read_csv_file, read_csv_report,
};
pub use error::{IngestError, Result};
