//! Optional `disburse.toml` configuration.
//!
//! ```toml
//! [output]
//! directory = "out"
//! layout = "per-row"
//!
//! [upload]
//! host = "sftp.example.com"
//! port = 22
//! username = "ops"
//! remote_path = "/uploads"
//!
//! [mappings]
//! directory = ".disburse/mappings"
//! ```
//!
//! Command-line flags override every value read here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use disburse_output::{OutputLayout, UploadTarget};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "disburse.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputSection,
    pub upload: Option<UploadTarget>,
    pub mappings: MappingsSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub directory: PathBuf,
    pub layout: OutputLayout,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            layout: OutputLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingsSection {
    /// Directory of the saved-mapping store.
    pub directory: PathBuf,
}

impl Default for MappingsSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".disburse").join("mappings"),
        }
    }
}

impl Config {
    /// Parses configuration text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    /// Loads `explicit`, or `disburse.toml` from the working directory when
    /// present, or the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    debug!("no configuration file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        let config =
            Self::from_toml(&text).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
