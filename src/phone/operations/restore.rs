use crate::error::Result;
use crate::phone::bridge::DeviceBridge;
use crate::phone::utils::path::join_phone_path;
use crate::wrap_err;
use async_recursion::async_recursion;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A session folder and the phone directory it goes back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTarget {
    pub folder: String,
    pub phone_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub pushed: usize,
    pub skipped_folders: Vec<String>,
    /// Folders whose local copy could not be read.
    pub failed_folders: Vec<String>,
    pub failed_files: Vec<String>,
}

/// Trait for copying a session back onto the phone.
pub trait Restorer {
    /// Push every file of every target folder; existing phone files are overwritten.
    async fn restore(&self, session_dir: &Path, targets: &[RestoreTarget]) -> Result<RestoreReport>;
}

pub struct BridgeRestorer<'a, B> {
    bridge: &'a B,
}

impl<'a, B: DeviceBridge> BridgeRestorer<'a, B> {
    pub fn new(bridge: &'a B) -> Self {
        Self { bridge }
    }
}

impl<B: DeviceBridge> Restorer for BridgeRestorer<'_, B> {
    async fn restore(&self, session_dir: &Path, targets: &[RestoreTarget]) -> Result<RestoreReport> {
        let mut report = RestoreReport::default();

        for target in targets {
            let local_dir = session_dir.join(&target.folder);
            if !local_dir.exists() {
                println!(
                    "Skipped: no local folder {} for {}",
                    local_dir.display(),
                    target.phone_dir
                );
                report.skipped_folders.push(target.folder.clone());
                continue;
            }

            println!("Restoring: {} -> {} ...", local_dir.display(), target.phone_dir);
            let mut files = Vec::new();
            let walked = wrap_err!(
                collect_files(&local_dir, &mut files).await,
                RestoreDirFailed {
                    folder: target.folder.clone(),
                    phone_dir: target.phone_dir.clone()
                }
            );
            if let Err(err) = walked {
                log::warn!("{err}");
                eprintln!("Warning: {err}");
                report.failed_folders.push(target.folder.clone());
                continue;
            }
            files.sort();

            let mut pushed = 0usize;
            for file in files {
                let relative = relative_slash_path(&file, &local_dir);
                let remote = join_phone_path(&target.phone_dir, &relative);
                match self.bridge.push(&file, &remote).await {
                    Ok(()) => pushed += 1,
                    Err(err) => {
                        log::warn!("push {} failed: {err}", file.display());
                        eprintln!("Failed to restore {remote}: {err}");
                        report.failed_files.push(remote);
                    }
                }
            }
            println!("Restored: {pushed} file(s) to {}", target.phone_dir);
            report.pushed += pushed;
        }

        Ok(report)
    }
}

#[async_recursion]
async fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_type = entry.file_type().await?;
        if file_type.is_dir() {
            collect_files(&path, out).await?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// `file` relative to `base`, joined with `/` for the phone side.
fn relative_slash_path(file: &Path, base: &Path) -> String {
    file.strip_prefix(base)
        .unwrap_or(file)
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
