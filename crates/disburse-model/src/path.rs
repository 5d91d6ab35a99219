//! Addresses into nested JSON documents.
//!
//! A [`Path`] is an ordered list of [`Segment`]s written in the canonical
//! form `disbursements[0].payees[0].amount`: object keys are joined with
//! `.` and array positions are written as `[n]`. A dotted token written as
//! a canonical decimal (`0`, `12`, never `007`) that fits `usize` is an
//! index, so `a.0` and `a[0]` parse to the same path and render back as
//! `a[0]`. Other digit runs such as `007` stay object keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{PathConflict, PathError};
use crate::field::ValueType;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl Segment {
    /// Classifies a dotted token or object key, turning canonical decimals
    /// into indices.
    fn from_token(token: String) -> Self {
        match index_token(&token) {
            Some(index) => Segment::Index(index),
            None => Segment::Key(token),
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

/// Furthest a write may reach past the end of an array.
pub const MAX_ARRAY_PADDING: usize = 1024;

fn index_token(token: &str) -> Option<usize> {
    let digits = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    let canonical = digits && (token == "0" || !token.starts_with('0'));
    if canonical { token.parse().ok() } else { None }
}

/// Canonical address of a value inside a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Malformed`] for empty text, empty segments
    /// (`a..b`, `a.`, `.a`), unterminated or unmatched brackets, and
    /// bracket contents that are not a non-negative integer.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut after_bracket = false;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(Segment::from_token(std::mem::take(&mut current)));
                    } else if !after_bracket {
                        return Err(PathError::malformed(text, "empty segment"));
                    }
                    if matches!(chars.peek(), None | Some('.') | Some('[')) {
                        return Err(PathError::malformed(text, "empty segment"));
                    }
                    after_bracket = false;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(Segment::from_token(std::mem::take(&mut current)));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(c) if c.is_ascii_digit() => digits.push(c),
                            Some(_) => {
                                return Err(PathError::malformed(text, "non-digit array index"));
                            }
                            None => return Err(PathError::malformed(text, "unterminated '['")),
                        }
                    }
                    if digits.is_empty() {
                        return Err(PathError::malformed(text, "empty array index"));
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| PathError::malformed(text, "array index out of range"))?;
                    segments.push(Segment::Index(index));
                    if !matches!(chars.peek(), None | Some('.') | Some('[')) {
                        return Err(PathError::malformed(text, "missing separator after ']'"));
                    }
                    after_bracket = true;
                }
                ']' => return Err(PathError::malformed(text, "unmatched ']'")),
                other => {
                    current.push(other);
                    after_bracket = false;
                }
            }
        }

        if !current.is_empty() {
            segments.push(Segment::from_token(current));
        }
        if segments.is_empty() {
            return Err(PathError::malformed(text, "empty path"));
        }
        Ok(Self { segments })
    }

    /// Appends an object key. Canonical decimal names become indices.
    #[must_use]
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::from_token(name.into()));
        self
    }

    /// Appends an array index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The final object key, skipping trailing indices.
    pub fn last_key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(Segment::as_key)
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// The path with its final segment removed, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, rest) = self.segments.split_last()?;
        Some(Path {
            segments: rest.to_vec(),
        })
    }

    /// Looks up the value this path addresses.
    ///
    /// An index applied to an object looks up its decimal key.
    pub fn get<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key),
                (Segment::Index(index), Value::Array(items)) => items.get(*index),
                (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
                _ => None,
            })
    }

    /// Writes `value` at this path, creating containers along the way.
    ///
    /// Missing or `null` intermediates become an object, or an array when the
    /// following segment is an index. Arrays are padded with `null` up to the
    /// written position. The terminal value is always overwritten.
    ///
    /// # Errors
    ///
    /// Returns a [`PathConflict`] when a key must be written into an array, a
    /// segment descends through a scalar, or an index lies more than
    /// [`MAX_ARRAY_PADDING`] past the end of its array.
    pub fn set(&self, document: &mut Value, value: Value) -> Result<(), PathConflict> {
        let mut current = document;
        for segment in &self.segments {
            current = slot_mut(current, segment).map_err(|found| PathConflict {
                path: self.to_string(),
                segment: segment_text(segment),
                found,
            })?;
        }
        *current = value;
        Ok(())
    }
}

fn segment_text(segment: &Segment) -> String {
    match segment {
        Segment::Key(key) => key.clone(),
        Segment::Index(index) => format!("[{index}]"),
    }
}

/// Returns the child slot `segment` addresses inside `current`.
fn slot_mut<'v>(current: &'v mut Value, segment: &Segment) -> Result<&'v mut Value, &'static str> {
    if let Segment::Index(index) = segment {
        let len = match current {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => usize::MAX,
        };
        if index.saturating_sub(len) > MAX_ARRAY_PADDING {
            return Err("short array");
        }
    }
    if current.is_null() {
        *current = match segment {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        };
    }
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => {
            Ok(map.entry(key.clone()).or_insert(Value::Null))
        }
        (Segment::Index(index), Value::Object(map)) => {
            Ok(map.entry(index.to_string()).or_insert(Value::Null))
        }
        (Segment::Index(index), Value::Array(items)) => {
            let Some(needed) = index.checked_add(1) else {
                return Err("short array");
            };
            if items.len() < needed {
                items.resize(needed, Value::Null);
            }
            items.get_mut(*index).ok_or("short array")
        }
        (_, other) => Err(ValueType::of(other).as_str()),
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if position == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Path::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(text: &str) -> Path {
        Path::parse(text).unwrap()
    }

    #[test]
    fn parses_keys_and_indices() {
        let parsed = path("disbursements[0].payees[0].amount");
        assert_eq!(
            parsed.segments(),
            &[
                Segment::Key("disbursements".to_string()),
                Segment::Index(0),
                Segment::Key("payees".to_string()),
                Segment::Index(0),
                Segment::Key("amount".to_string()),
            ]
        );
        assert_eq!(parsed.to_string(), "disbursements[0].payees[0].amount");
    }

    #[test]
    fn dotted_digits_are_indices() {
        assert_eq!(path("a.0.b"), path("a[0].b"));
        assert_eq!(path("a.0.b").to_string(), "a[0].b");
    }

    #[test]
    fn consecutive_and_leading_indices() {
        assert_eq!(path("grid[1][2]").to_string(), "grid[1][2]");
        assert_eq!(path("[0].name").to_string(), "[0].name");
    }

    #[test]
    fn rejects_malformed_paths() {
        for text in [
            "", "a..b", "a.", ".a", "a[", "a[x]", "a[]", "a]", "a[0]b", "a.[0]", "a[-1]",
        ] {
            assert!(
                matches!(Path::parse(text), Err(PathError::Malformed { .. })),
                "expected '{text}' to be rejected"
            );
        }
    }

    #[test]
    fn set_creates_objects_and_arrays() {
        let mut doc = json!({});
        path("a.b[1].c").set(&mut doc, json!(5)).unwrap();
        assert_eq!(doc, json!({"a": {"b": [null, {"c": 5}]}}));
        assert_eq!(path("a.b[1].c").get(&doc), Some(&json!(5)));
    }

    #[test]
    fn set_overwrites_terminal_in_place() {
        let mut doc = json!({"first": 1, "second": 2, "third": 3});
        path("second").set(&mut doc, json!("two")).unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["first", "second", "third"]);
        assert_eq!(doc["second"], json!("two"));
    }

    #[test]
    fn set_replaces_null_intermediate() {
        let mut doc = json!({"settings": null});
        path("settings.mode").set(&mut doc, json!("fast")).unwrap();
        assert_eq!(doc, json!({"settings": {"mode": "fast"}}));
    }

    #[test]
    fn set_refuses_to_descend_through_scalars() {
        let mut doc = json!({"server": "live", "list": [1]});
        let before = doc.clone();
        let err = path("server.name").set(&mut doc, json!("x")).unwrap_err();
        assert_eq!(err.found, "string");
        let err = path("list.name").set(&mut doc, json!("x")).unwrap_err();
        assert_eq!(err.found, "array");
        assert_eq!(doc, before);
    }

    #[test]
    fn index_on_object_uses_decimal_key() {
        let mut doc = json!({"slots": {}});
        path("slots[3]").set(&mut doc, json!(true)).unwrap();
        assert_eq!(doc, json!({"slots": {"3": true}}));
        assert_eq!(path("slots.3").get(&doc), Some(&json!(true)));
    }

    #[test]
    fn far_indices_are_refused_without_panicking() {
        let mut doc = json!({"a": [], "m": {}});
        let before = doc.clone();
        for text in ["a[18446744073709551615]", "a[4000000000]", "a[1025]"] {
            let err = path(text).set(&mut doc, json!("x")).unwrap_err();
            assert_eq!(err.found, "short array");
        }
        assert_eq!(doc, before);

        path("a[1024]").set(&mut doc, json!(1)).unwrap();
        assert_eq!(doc["a"].as_array().unwrap().len(), 1025);
        path("m[18446744073709551615]").set(&mut doc, json!(2)).unwrap();
        assert_eq!(doc["m"]["18446744073709551615"], json!(2));
    }

    #[test]
    fn non_canonical_digit_keys_stay_keys() {
        assert_eq!(
            path("codes.007").segments()[1],
            Segment::Key("007".to_string())
        );
        assert_eq!(path("codes.007").to_string(), "codes.007");
        let big = path("big.99999999999999999999");
        assert_eq!(big.segments()[1], Segment::Key("99999999999999999999".to_string()));
        assert_eq!(path(&big.to_string()), big);
        assert_eq!(Path::root().child("007").to_string(), "007");
        assert_eq!(Path::root().child("0"), Path::root().index(0));

        let mut doc = json!({"codes": {"007": "old"}});
        path("codes.007").set(&mut doc, json!("new")).unwrap();
        assert_eq!(doc, json!({"codes": {"007": "new"}}));
    }

    #[test]
    fn get_missing_is_none() {
        let doc = json!({"a": [1, 2]});
        assert_eq!(path("a[5]").get(&doc), None);
        assert_eq!(path("a.b").get(&doc), None);
        assert_eq!(path("z").get(&doc), None);
    }

    #[test]
    fn builders_and_accessors() {
        let built = Path::root().child("payees").index(0).child("amount");
        assert_eq!(built, path("payees[0].amount"));
        assert_eq!(built.last_key(), Some("amount"));
        assert_eq!(built.parent(), Some(path("payees[0]")));
        assert_eq!(Path::root().child("7"), Path::root().index(7));
        assert_eq!(path("ids[2]").last_key(), Some("ids"));
    }

    #[test]
    fn serde_uses_canonical_text() {
        let encoded = serde_json::to_string(&path("a.0.b")).unwrap();
        assert_eq!(encoded, "\"a[0].b\"");
        let decoded: Path = serde_json::from_str("\"x[1]\"").unwrap();
        assert_eq!(decoded, path("x[1]"));
        assert!(serde_json::from_str::<Path>("\"x[\"").is_err());
    }
}
