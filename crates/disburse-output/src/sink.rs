//! Upload targets and sinks.
//!
//! The target is passed with every upload call. Sinks hold no connection
//! settings of their own, so one sink can serve several targets.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OutputError, Result};

fn default_port() -> u16 {
    22
}

/// Where uploaded files land on the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default, alias = "remote_path")]
    pub remote_path: String,
}

impl UploadTarget {
    pub fn new(host: impl Into<String>, username: impl Into<String>, remote_path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: username.into(),
            remote_path: remote_path.into(),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `<remote_path>/<filename>`.
    pub fn remote_path_for(&self, filename: &str) -> String {
        format!("{}/{}", self.remote_path.trim_end_matches('/'), filename)
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}{}",
            self.username,
            self.host,
            self.port,
            self.remote_path_for("").trim_end_matches('/')
        )
    }
}

/// Delivers file content to a remote store.
pub trait UploadSink: Send + Sync {
    /// Stores `content` as `filename` under the target's remote path and
    /// returns the remote path written.
    fn upload(&self, target: &UploadTarget, content: &str, filename: &str) -> Result<String>;
}

/// Rejects names that are empty or carry directory parts.
pub fn check_file_name(filename: &str) -> Result<()> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(OutputError::InvalidFileName {
            name: filename.to_string(),
        })
    }
}

/// Writes uploads below a local directory, mirroring the remote path.
///
/// Uploading `a.json` to remote path `/uploads` writes
/// `<root>/uploads/a.json`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local file that mirrors `remote`.
    fn local_path(&self, remote: &str) -> Result<PathBuf> {
        let relative = Path::new(remote.trim_start_matches('/'));
        let mut local = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => local.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(OutputError::InvalidTarget {
                        reason: format!("remote path '{remote}' leaves the upload root"),
                    });
                }
            }
        }
        Ok(local)
    }
}

impl UploadSink for DirectorySink {
    fn upload(&self, target: &UploadTarget, content: &str, filename: &str) -> Result<String> {
        check_file_name(filename)?;
        let remote = target.remote_path_for(filename);
        let local = self.local_path(&remote)?;
        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&local, content).map_err(|source| OutputError::Io {
            path: local.clone(),
            source,
        })?;
        debug!(
            target = %target,
            local = %local.display(),
            bytes = content.len(),
            "uploaded file"
        );
        Ok(remote)
    }
}
