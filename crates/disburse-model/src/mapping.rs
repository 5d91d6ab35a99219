//! Bindings between CSV columns (or fixed values) and template paths.

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// Binds one target path to a CSV column or to a static value.
///
/// Serialized in camelCase (`sourceField`, `targetPath`, `isStatic`,
/// `staticValue`). An empty `targetPath` string reads back as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingBinding {
    #[serde(default, alias = "csvField")]
    pub source_field: Option<String>,
    #[serde(default, alias = "jsonPath", with = "optional_path")]
    pub target_path: Option<Path>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub static_value: String,
}

impl MappingBinding {
    /// Binds a CSV column to a path.
    pub fn column(source_field: impl Into<String>, target_path: Path) -> Self {
        Self {
            source_field: Some(source_field.into()),
            target_path: Some(target_path),
            ..Self::default()
        }
    }

    /// Writes the same literal value into every output document.
    pub fn fixed(target_path: Path, value: impl Into<String>) -> Self {
        Self {
            source_field: None,
            target_path: Some(target_path),
            is_static: true,
            static_value: value.into(),
        }
    }

    /// A column that has not been pointed at a path yet.
    pub fn unbound(source_field: impl Into<String>) -> Self {
        Self {
            source_field: Some(source_field.into()),
            ..Self::default()
        }
    }

    /// The source column, when set and non-empty.
    pub fn source(&self) -> Option<&str> {
        self.source_field.as_deref().filter(|s| !s.is_empty())
    }

    /// True when the binding has a target and a usable value source.
    pub fn is_complete(&self) -> bool {
        self.target_path.is_some()
            && if self.is_static {
                !self.static_value.is_empty()
            } else {
                self.source().is_some()
            }
    }
}

/// Ordered list of bindings defining one transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    bindings: Vec<MappingBinding>,
}

impl MappingTable {
    pub fn new(bindings: Vec<MappingBinding>) -> Self {
        Self { bindings }
    }

    /// One unbound binding per CSV header, in column order.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            bindings: headers
                .iter()
                .map(|header| MappingBinding::unbound(header.as_ref()))
                .collect(),
        }
    }

    pub fn bindings(&self) -> &[MappingBinding] {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut [MappingBinding] {
        &mut self.bindings
    }

    pub fn push(&mut self, binding: MappingBinding) {
        self.bindings.push(binding);
    }

    /// Removes and returns the binding at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<MappingBinding> {
        (index < self.bindings.len()).then(|| self.bindings.remove(index))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Complete bindings, in table order.
    pub fn complete(&self) -> impl Iterator<Item = &MappingBinding> {
        self.bindings.iter().filter(|b| b.is_complete())
    }

    /// The first complete binding targeting `path`.
    pub fn binding_for(&self, path: &Path) -> Option<&MappingBinding> {
        self.complete()
            .find(|b| b.target_path.as_ref() == Some(path))
    }
}

impl FromIterator<MappingBinding> for MappingTable {
    fn from_iter<I: IntoIterator<Item = MappingBinding>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Outcome of checking a table against the required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub missing_required_paths: Vec<Path>,
}

impl ValidationResult {
    pub fn from_missing(missing_required_paths: Vec<Path>) -> Self {
        Self {
            valid: missing_required_paths.is_empty(),
            missing_required_paths,
        }
    }
}

mod optional_path {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::path::Path;

    pub fn serialize<S: Serializer>(path: &Option<Path>, serializer: S) -> Result<S::Ok, S::Error> {
        match path {
            Some(path) => serializer.collect_str(path),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Path>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => Path::parse(text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
