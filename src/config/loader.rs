use crate::config::file::FileSettings;
use crate::config::settings::{
    DEFAULT_ADB_PATH, Settings, parse_bool, split_list, validate_phone_dirs,
};
use crate::error::Result;
use log::debug;
use std::env;
use std::path::PathBuf;

const ADB_PATH_KEYS: &[&str] = &["ADB_PATH", "ADB_PATH_WSL"];
const BACKUP_ROOT_KEYS: &[&str] = &["BACKUP_ROOT", "BACKUP_ROOT_WSL"];
const MEDIA_DIRS_KEYS: &[&str] = &["PHONE_MEDIA_DIRS"];
const EXTRA_DIRS_KEYS: &[&str] = &["PHONE_EXTRA_DIRS"];
const IGNORE_KEYS: &[&str] = &["DELETE_IGNORE_PATTERNS", "DOWNLOAD_IGNORE_PATTERNS"];
const SERIAL_KEYS: &[&str] = &["ANDROID_SERIAL"];
const WSL_KEYS: &[&str] = &["ADB_WSL_INTEROP"];

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Read the first available environment variable from a list of keys.
/// Empty strings are treated as missing values.
fn env_any_from(keys: &[&str], get: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    keys.iter().find_map(|key| get(key))
}

/// Values supplied on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct SettingsRequest {
    pub adb_path: Option<String>,
    pub backup_root: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

/// Resolve settings from flags, the environment (including `.env`) and the config file.
pub fn resolve(request: SettingsRequest) -> Result<Settings> {
    if let Ok(path) = dotenv::dotenv() {
        debug!("loaded environment from {}", path.display());
    }
    let file = FileSettings::load(request.config_file.as_deref())?;
    resolve_from_source(&request, file, &env_value)
}

fn resolve_from_source(
    request: &SettingsRequest,
    file: FileSettings,
    get: &dyn Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let adb_path = request
        .adb_path
        .clone()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env_any_from(ADB_PATH_KEYS, get))
        .or(file.adb_path)
        .unwrap_or_else(|| {
            debug!("ADB_PATH not set, using '{DEFAULT_ADB_PATH}' from PATH");
            DEFAULT_ADB_PATH.to_string()
        });

    let backup_root = request
        .backup_root
        .clone()
        .or_else(|| env_any_from(BACKUP_ROOT_KEYS, get).map(PathBuf::from))
        .or(file.backup_root);

    let media_dirs = list_setting(MEDIA_DIRS_KEYS, get, file.media_dirs);
    let extra_dirs = list_setting(EXTRA_DIRS_KEYS, get, file.extra_dirs);
    let ignore_patterns = list_setting(IGNORE_KEYS, get, file.ignore_patterns);
    validate_phone_dirs("PHONE_MEDIA_DIRS", &media_dirs)?;
    validate_phone_dirs("PHONE_EXTRA_DIRS", &extra_dirs)?;

    let device_serial = env_any_from(SERIAL_KEYS, get).or(file.device_serial);

    let wsl_interop = match env_any_from(WSL_KEYS, get) {
        Some(raw) => parse_bool(WSL_KEYS[0], &raw)?,
        None => file
            .wsl_interop
            .unwrap_or_else(|| adb_path.to_ascii_lowercase().ends_with(".exe")),
    };

    Ok(Settings {
        adb_path,
        backup_root,
        media_dirs,
        extra_dirs,
        ignore_patterns,
        device_serial,
        wsl_interop,
    })
}

fn list_setting(
    keys: &[&str],
    get: &dyn Fn(&str) -> Option<String>,
    fallback: Vec<String>,
) -> Vec<String> {
    match env_any_from(keys, get) {
        Some(raw) => split_list(&raw),
        None => fallback
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    }
}
