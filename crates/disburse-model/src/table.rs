use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Header name to cell text for one CSV row.
pub type RowValues = BTreeMap<String, String>;

/// Parsed CSV content.
///
/// Headers are unique and every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvDocument {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Header-to-cell map for row `index`.
    pub fn row_values(&self, index: usize) -> Option<RowValues> {
        let row = self.rows.get(index)?;
        Some(
            self.headers
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect(),
        )
    }

    pub fn first_row(&self) -> Option<RowValues> {
        self.row_values(0)
    }

    /// All rows as header-to-cell maps, in file order.
    pub fn iter_row_values(&self) -> impl Iterator<Item = RowValues> + '_ {
        (0..self.rows.len()).filter_map(|index| self.row_values(index))
    }
}
