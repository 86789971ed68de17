use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional TOML config file; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    #[serde(default)]
    pub adb_path: Option<String>,
    #[serde(default)]
    pub backup_root: Option<PathBuf>,
    #[serde(default)]
    pub media_dirs: Vec<String>,
    #[serde(default)]
    pub extra_dirs: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub device_serial: Option<String>,
    #[serde(default)]
    pub wsl_interop: Option<bool>,
}

impl FileSettings {
    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is optional and yields
    /// empty settings when missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = default_config_path();
                if path.is_file() {
                    Self::read(&path)
                } else {
                    log::debug!("no config file at {}", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigFileIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::ConfigFileParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn default_config_path() -> PathBuf {
    env::var("DROIDSWEEP_CONFIG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            directories::ProjectDirs::from("", "", "droidsweep")
                .map(|dirs| dirs.config_dir().join("config.toml"))
        })
        .unwrap_or_else(|| {
            env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("droidsweep.toml")
        })
}
