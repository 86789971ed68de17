//! Backup sessions: one timestamp-named folder per backup run.
//!
//! A session folder holds one subfolder per phone source directory, the
//! `session.json` manifest and the delete-candidates script of that run.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SESSION_FORMAT: &str = "%Y_%m_%d_%H%M";
pub const MANIFEST_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Files become delete candidates.
    Media,
    /// Backed up only.
    Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOutcome {
    Copied,
    Missing,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSource {
    pub phone_dir: String,
    pub folder: String,
    pub kind: SourceKind,
    pub outcome: SourceOutcome,
    pub files: usize,
    /// Why the directory was not copied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub session: String,
    pub created_at: String,
    pub device: String,
    pub sources: Vec<ManifestSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub dir: PathBuf,
}

impl Session {
    /// Create a fresh session folder under `root`.
    ///
    /// Never reuses an existing folder: a run within the same minute gets a
    /// `_2`, `_3`, ... suffix.
    pub fn create(root: &Path, now: DateTime<Local>) -> Result<Self> {
        fs::create_dir_all(root).map_err(|source| Error::LocalWrite {
            path: root.to_path_buf(),
            source,
        })?;

        let base = now.format(SESSION_FORMAT).to_string();
        let mut attempt = 1u32;
        loop {
            let name = if attempt == 1 {
                base.clone()
            } else {
                format!("{base}_{attempt}")
            };
            let dir = root.join(&name);
            match fs::create_dir(&dir) {
                Ok(()) => {
                    log::info!("created session folder {}", dir.display());
                    return Ok(Self { name, dir });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => return Err(Error::LocalWrite { path: dir, source }),
            }
        }
    }

    /// Resolve a session from a folder path or a session name under `root`.
    pub fn open(root: Option<&Path>, selector: &str) -> Result<Self> {
        let direct = Path::new(selector);
        let dir = if direct.is_dir() {
            direct.to_path_buf()
        } else if let Some(dir) = root.map(|root| root.join(selector)).filter(|d| d.is_dir()) {
            dir
        } else {
            return Err(Error::SessionNotFound {
                name: selector.to_string(),
            });
        };

        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::SessionNotFound {
                name: selector.to_string(),
            })?;
        Ok(Self { name, dir })
    }

    /// All sessions under `root`, oldest first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if session_sort_key(&name).is_some() {
                sessions.push(Self {
                    name,
                    dir: entry.path(),
                });
            }
        }
        sessions.sort_by_key(|session| session_sort_key(&session.name));
        Ok(sessions)
    }

    pub fn latest(root: &Path) -> Result<Self> {
        Self::list(root)?
            .pop()
            .ok_or_else(|| Error::NoSessions {
                root: root.to_path_buf(),
            })
    }

    pub fn folder_path(&self, folder: &str) -> PathBuf {
        self.dir.join(folder)
    }

    pub fn script_path(&self) -> PathBuf {
        self.dir.join(format!("delete_candidates_{}.txt", self.name))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        let path = self.manifest_path();
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json).map_err(|source| Error::LocalWrite { path, source })
    }

    /// Read the manifest; `None` for folders created without one.
    pub fn read_manifest(&self) -> Result<Option<Manifest>> {
        let path = self.manifest_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| Error::ManifestParse { path, source })
    }
}

/// Ordering key for session folder names; `None` when the name is not a session.
fn session_sort_key(name: &str) -> Option<(NaiveDateTime, u32)> {
    let (stamp, suffix) = match name.get(..15) {
        Some(stamp) => (stamp, &name[15..]),
        None => return None,
    };
    let when = NaiveDateTime::parse_from_str(stamp, SESSION_FORMAT).ok()?;
    let attempt = if suffix.is_empty() {
        1
    } else {
        suffix.strip_prefix('_')?.parse().ok()?
    };
    Some((when, attempt))
}
