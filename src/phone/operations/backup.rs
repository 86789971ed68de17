use crate::error::{Error, Result};
use crate::phone::bridge::DeviceBridge;
use crate::phone::utils::path::{folder_name, normalize_phone_dir, phone_file_name, relative_phone_path};
use crate::session::{ManifestSource, Session, SourceKind, SourceOutcome};
use crate::wrap_err;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::Path;

/// One phone directory to copy into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSource {
    pub phone_dir: String,
    pub folder: String,
    pub kind: SourceKind,
}

/// Per-directory result of a backup run.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: BackupSource,
    pub outcome: SourceOutcome,
    /// Phone paths confirmed present in the local copy.
    pub copied: Vec<String>,
    pub error: Option<String>,
}

impl SourceReport {
    pub fn to_manifest(&self) -> ManifestSource {
        ManifestSource {
            phone_dir: self.source.phone_dir.clone(),
            folder: self.source.folder.clone(),
            kind: self.source.kind,
            outcome: self.outcome,
            files: self.copied.len(),
            error: self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    pub sources: Vec<SourceReport>,
}

impl BackupReport {
    /// Copied media files whose names do not match an ignore pattern.
    pub fn delete_candidates(&self, ignore: &GlobSet) -> Vec<String> {
        self.sources
            .iter()
            .filter(|report| report.source.kind == SourceKind::Media)
            .flat_map(|report| report.copied.iter())
            .filter(|path| !ignore.is_match(phone_file_name(path)))
            .cloned()
            .collect()
    }

    pub fn failed_dirs(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|report| report.outcome != SourceOutcome::Copied)
            .map(|report| report.source.phone_dir.clone())
            .collect()
    }

    pub fn copied_files(&self) -> usize {
        self.sources.iter().map(|report| report.copied.len()).sum()
    }
}

/// Build the ordered source list, rejecting two directories that would share a folder.
pub fn plan_sources(media_dirs: &[String], extra_dirs: &[String]) -> Result<Vec<BackupSource>> {
    let tagged = media_dirs
        .iter()
        .map(|dir| (dir, SourceKind::Media))
        .chain(extra_dirs.iter().map(|dir| (dir, SourceKind::Extra)));

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for (dir, kind) in tagged {
        let phone_dir = normalize_phone_dir(dir);
        let folder = folder_name(&phone_dir)?;
        if !seen.insert(folder.clone()) {
            let key = match kind {
                SourceKind::Media => "PHONE_MEDIA_DIRS",
                SourceKind::Extra => "PHONE_EXTRA_DIRS",
            };
            return Err(Error::InvalidSetting {
                key: key.to_string(),
                message: format!("'{phone_dir}' maps to folder '{folder}' which is already used"),
            });
        }
        sources.push(BackupSource {
            phone_dir,
            folder,
            kind,
        });
    }
    Ok(sources)
}

/// Compile ignore patterns; they match against the file name only.
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| Error::InvalidPattern {
        pattern: patterns.join(","),
        source,
    })
}

/// Trait for copying phone directories into a session.
pub trait Backuper {
    /// Copy one phone directory to `dest` and return the phone paths that arrived locally.
    async fn backup_dir(&self, phone_dir: &str, dest: &Path) -> Result<Vec<String>>;

    /// Copy every source; a failing directory never stops the others.
    async fn backup_all(&self, session: &Session, sources: &[BackupSource]) -> BackupReport;
}

/// Implementation of Backuper over a device bridge.
pub struct BridgeBackuper<'a, B> {
    bridge: &'a B,
}

impl<'a, B: DeviceBridge> BridgeBackuper<'a, B> {
    pub fn new(bridge: &'a B) -> Self {
        Self { bridge }
    }
}

impl<B: DeviceBridge> Backuper for BridgeBackuper<'_, B> {
    async fn backup_dir(&self, phone_dir: &str, dest: &Path) -> Result<Vec<String>> {
        if !self.bridge.dir_exists(phone_dir).await? {
            return Err(Error::PhonePathNotFound {
                path: phone_dir.to_string(),
            });
        }

        let listed = self.bridge.list_files(phone_dir).await?;
        log::debug!("listed {} file(s) under {}", listed.len(), phone_dir);

        self.bridge.pull(phone_dir, dest).await?;

        let mut copied = Vec::with_capacity(listed.len());
        for path in listed {
            match relative_phone_path(&path, phone_dir) {
                Some(relative) if dest.join(relative).is_file() => copied.push(path),
                _ => log::warn!("{path} was listed on the phone but not found in the backup"),
            }
        }
        Ok(copied)
    }

    async fn backup_all(&self, session: &Session, sources: &[BackupSource]) -> BackupReport {
        let mut report = BackupReport::default();
        for source in sources {
            let dest = session.folder_path(&source.folder);
            println!("Backing up: {} ...", source.phone_dir);

            let result = wrap_err!(
                self.backup_dir(&source.phone_dir, &dest).await,
                BackupDirFailed {
                    phone_dir: source.phone_dir.clone()
                }
            );

            let entry = match result {
                Ok(copied) => {
                    println!(
                        "Backed up: {} -> {} ({} file(s))",
                        source.phone_dir,
                        dest.display(),
                        copied.len()
                    );
                    SourceReport {
                        source: source.clone(),
                        outcome: SourceOutcome::Copied,
                        copied,
                        error: None,
                    }
                }
                Err(err) => {
                    let outcome = match &err {
                        Error::BackupDirFailed { source, .. }
                            if matches!(**source, Error::PhonePathNotFound { .. }) =>
                        {
                            SourceOutcome::Missing
                        }
                        _ => SourceOutcome::Failed,
                    };
                    log::warn!("{err}");
                    eprintln!("Warning: {err}");
                    SourceReport {
                        source: source.clone(),
                        outcome,
                        copied: Vec::new(),
                        error: Some(err.to_string()),
                    }
                }
            };
            report.sources.push(entry);
        }
        report
    }
}
