//! Line tokenizing and header normalization.

use std::collections::HashSet;

use tracing::warn;

/// Trims a closed field.
pub fn normalize_field(value: &str) -> String {
    value.trim().to_string()
}

/// Parses a CSV line into fields, handling quoted values.
///
/// A `"` toggles quoting unless it is doubled, in which case a literal
/// quote is emitted. Commas outside quotes close the current field. Each
/// field is trimmed once closed.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => {
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                fields.push(normalize_field(&current));
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(normalize_field(&current));
    fields
}

/// Strips one pair of surrounding single or double quotes from a header.
pub fn unquote_header(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Makes header names unique by suffixing repeats with `_2`, `_3`, ...
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut unique = Vec::with_capacity(headers.len());

    for header in headers {
        if seen.insert(header.clone()) {
            unique.push(header);
            continue;
        }
        let mut n = 2;
        let renamed = loop {
            let candidate = format!("{header}_{n}");
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        warn!(header = %header, renamed = %renamed, "duplicate CSV header renamed");
        seen.insert(renamed.clone());
        unique.push(renamed);
    }
    unique
}
