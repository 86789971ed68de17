// Path helpers shared by the phone operations
use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Prefixes that all name the shared storage root on Android.
const STORAGE_ROOTS: &[&str] = &[
    "/storage/emulated/0/",
    "/storage/self/primary/",
    "/mnt/sdcard/",
    "/sdcard/",
];

/// Drop trailing slashes from a phone directory.
pub fn normalize_phone_dir(dir: &str) -> String {
    let trimmed = dir.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Local folder name for a phone directory: `/sdcard/DCIM/Camera` becomes `DCIM_Camera`.
pub fn folder_name(phone_dir: &str) -> Result<String> {
    let dir = format!("{}/", normalize_phone_dir(phone_dir));
    let rest = STORAGE_ROOTS
        .iter()
        .find_map(|root| dir.strip_prefix(root))
        .unwrap_or(&dir);

    let parts: Vec<&str> = rest.split('/').filter(|part| !part.is_empty()).collect();
    if parts.is_empty() || parts.iter().any(|part| *part == "." || *part == "..") {
        return Err(Error::InvalidPhonePath {
            path: phone_dir.to_string(),
        });
    }
    Ok(parts.join("_"))
}

/// Path of `file` relative to `dir`, or `None` when it is not below it.
pub fn relative_phone_path<'a>(file: &'a str, dir: &str) -> Option<&'a str> {
    file.strip_prefix(dir)?
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty())
}

pub fn join_phone_path(dir: &str, relative: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), relative.trim_start_matches('/'))
}

/// Last component of a phone path.
pub fn phone_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Convert a WSL mount path into the Windows form a Windows `adb.exe` understands.
///
/// `/mnt/c/Users/me/Backups` becomes `C:\Users\me\Backups`.
pub fn wsl_to_windows(path: &Path) -> Result<String> {
    let invalid = || Error::WslPath {
        path: path.to_path_buf(),
    };

    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                parts.pop().ok_or_else(invalid)?;
            }
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(invalid)?),
            Component::Prefix(_) => return Err(invalid()),
        }
    }

    match parts.as_slice() {
        ["mnt", drive, rest @ ..]
            if drive.len() == 1 && drive.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            Ok(format!("{}:\\{}", drive.to_ascii_uppercase(), rest.join("\\")))
        }
        _ => Err(invalid()),
    }
}
