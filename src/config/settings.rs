use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_ADB_PATH: &str = "adb";

/// Resolved runtime settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub adb_path: String,
    pub backup_root: Option<PathBuf>,
    pub media_dirs: Vec<String>,
    pub extra_dirs: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub device_serial: Option<String>,
    pub wsl_interop: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            adb_path: DEFAULT_ADB_PATH.to_string(),
            backup_root: None,
            media_dirs: Vec::new(),
            extra_dirs: Vec::new(),
            ignore_patterns: Vec::new(),
            device_serial: None,
            wsl_interop: false,
        }
    }
}

impl Settings {
    pub fn backup_root(&self) -> Result<&Path> {
        self.backup_root
            .as_deref()
            .ok_or_else(|| Error::MissingSetting {
                key: "BACKUP_ROOT".to_string(),
            })
    }

    /// Media directories to back up; at least one is required.
    pub fn media_dirs(&self) -> Result<&[String]> {
        if self.media_dirs.is_empty() {
            Err(Error::MissingSetting {
                key: "PHONE_MEDIA_DIRS".to_string(),
            })
        } else {
            Ok(&self.media_dirs)
        }
    }
}

/// Check that every configured phone directory is an absolute path.
pub fn validate_phone_dirs(key: &str, dirs: &[String]) -> Result<()> {
    match dirs.iter().find(|dir| !dir.starts_with('/')) {
        Some(bad) => Err(Error::InvalidSetting {
            key: key.to_string(),
            message: format!("phone directory must be absolute: {bad}"),
        }),
        None => Ok(()),
    }
}

/// Split a comma separated list, dropping blank items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::InvalidSetting {
            key: key.to_string(),
            message: format!("expected true/false, got '{other}'"),
        }),
    }
}
