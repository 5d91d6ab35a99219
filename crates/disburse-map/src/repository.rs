//! Saved mappings and the stores that persist them.
//!
//! A [`SavedMapping`] is a named mapping table, optionally with the
//! template it was built against. Stores are injected by the caller;
//! [`JsonFileStore`] keeps one pretty-printed JSON file per mapping:
//!
//! ```text
//! <base_dir>/<id>.json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use disburse_model::MappingTable;

use crate::error::{MapError, Result};

/// A named mapping table kept for reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMapping {
    pub id: String,
    pub name: String,
    #[serde(alias = "mappings")]
    pub bindings: MappingTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl SavedMapping {
    /// Creates a mapping stamped with the current time.
    pub fn new(name: impl Into<String>, bindings: MappingTable) -> Self {
        Self::created_at(name, bindings, Utc::now())
    }

    pub fn created_at(name: impl Into<String>, bindings: MappingTable, at: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            id: mapping_id(&name, at),
            name,
            bindings,
            template: None,
            created_at: at,
            last_modified: at,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: Value) -> Self {
        self.template = Some(template);
        self
    }

    /// Replaces the bindings and bumps `last_modified`.
    pub fn update(&mut self, bindings: MappingTable) {
        self.bindings = bindings;
        self.last_modified = Utc::now();
    }
}

/// First 12 hex characters of `sha256(name + rfc3339(at))`.
pub fn mapping_id(name: &str, at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(at.to_rfc3339().as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(12);
    id
}

fn check_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MapError::InvalidId { id: id.to_string() })
    }
}

fn sort_for_listing(mappings: &mut [SavedMapping]) {
    mappings.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Storage for saved mappings.
pub trait MappingStore {
    /// Inserts or replaces the mapping with the same id.
    fn save(&self, mapping: &SavedMapping) -> Result<()>;

    /// Fails with [`MapError::NotFound`] for unknown ids.
    fn load(&self, id: &str) -> Result<SavedMapping>;

    /// All mappings, ordered by name then creation time.
    fn list(&self) -> Result<Vec<SavedMapping>>;

    /// Returns whether a mapping was removed.
    fn delete(&self, id: &str) -> Result<bool>;

    /// The most recently modified mapping with this exact name.
    fn find_by_name(&self, name: &str) -> Result<Option<SavedMapping>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|mapping| mapping.name == name)
            .max_by_key(|mapping| mapping.last_modified))
    }
}

/// Directory-backed store, one JSON file per mapping.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| MapError::Io {
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_for(&self, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.base_dir.join(format!("{id}.json")))
    }

    fn read(path: &Path) -> Result<SavedMapping> {
        let contents = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl MappingStore for JsonFileStore {
    fn save(&self, mapping: &SavedMapping) -> Result<()> {
        let path = self.file_for(&mapping.id)?;
        let json = serde_json::to_string_pretty(mapping).map_err(|source| MapError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| MapError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(id = %mapping.id, path = %path.display(), "saved mapping");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<SavedMapping> {
        let path = self.file_for(id)?;
        if !path.is_file() {
            return Err(MapError::NotFound { id: id.to_string() });
        }
        Self::read(&path)
    }

    fn list(&self) -> Result<Vec<SavedMapping>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|source| MapError::Io {
            path: self.base_dir.clone(),
            source,
        })?;

        let mut mappings = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| MapError::Io {
                path: self.base_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(mapping) => mappings.push(mapping),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable mapping file"),
            }
        }
        sort_for_listing(&mut mappings);
        Ok(mappings)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let path = self.file_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| MapError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(id, "deleted mapping");
        Ok(true)
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, SavedMapping>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, SavedMapping>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MappingStore for MemoryStore {
    fn save(&self, mapping: &SavedMapping) -> Result<()> {
        self.entries().insert(mapping.id.clone(), mapping.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<SavedMapping> {
        self.entries()
            .get(id)
            .cloned()
            .ok_or_else(|| MapError::NotFound { id: id.to_string() })
    }

    fn list(&self) -> Result<Vec<SavedMapping>> {
        let mut mappings: Vec<SavedMapping> = self.entries().values().cloned().collect();
        sort_for_listing(&mut mappings);
        Ok(mappings)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.entries().remove(id).is_some())
    }
}
