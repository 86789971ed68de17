use crate::config::Settings;
use crate::error::{Error, Result};
use crate::session::{Manifest, Session, SourceKind, SourceOutcome};
use chrono::Local;
use std::path::PathBuf;

pub mod bridge;
mod operations;
pub mod utils;

pub use self::bridge::{AdbBridge, DeviceBridge, DeviceEntry};
pub use self::operations::backup::{BackupReport, build_ignore_set, plan_sources};
pub use self::operations::delete::DeleteReport;
pub use self::operations::restore::{RestoreReport, RestoreTarget};

use self::operations::backup::BridgeBackuper;
use self::operations::delete::BridgeDeleter;
use self::operations::restore::BridgeRestorer;
use self::operations::{Backuper, Deleter, Restorer};
use self::utils::path::{folder_name, normalize_phone_dir};

/// Inputs of one backup run.
#[derive(Debug, Clone)]
pub struct BackupRequest {
    pub backup_root: PathBuf,
    pub media_dirs: Vec<String>,
    pub extra_dirs: Vec<String>,
    pub ignore_patterns: Vec<String>,
}

impl BackupRequest {
    pub fn from_settings(settings: &Settings, skip_extras: bool) -> Result<Self> {
        Ok(Self {
            backup_root: settings.backup_root()?.to_path_buf(),
            media_dirs: settings.media_dirs()?.to_vec(),
            extra_dirs: if skip_extras {
                Vec::new()
            } else {
                settings.extra_dirs.clone()
            },
            ignore_patterns: settings.ignore_patterns.clone(),
        })
    }
}

/// What a finished backup produced.
#[derive(Debug, Clone)]
pub struct BackupOutcome {
    pub session: Session,
    pub report: BackupReport,
    pub candidates: Vec<String>,
    pub script: Option<PathBuf>,
}

/// Choose the device to talk to from `adb devices` output.
pub fn select_device(entries: &[DeviceEntry], wanted: Option<&str>) -> Result<String> {
    let seen = || {
        if entries.is_empty() {
            "no devices attached".to_string()
        } else {
            entries
                .iter()
                .map(|entry| format!("{} ({})", entry.serial, entry.state))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    if let Some(wanted) = wanted {
        return match entries.iter().find(|entry| entry.serial == wanted) {
            Some(entry) if entry.is_ready() => Ok(entry.serial.clone()),
            Some(entry) => Err(Error::DeviceUnreachable {
                detail: format!("{} is {}", entry.serial, entry.state),
            }),
            None => Err(Error::DeviceUnreachable {
                detail: format!("{wanted} not attached; seen: {}", seen()),
            }),
        };
    }

    let ready: Vec<&DeviceEntry> = entries.iter().filter(|entry| entry.is_ready()).collect();
    match ready.as_slice() {
        [only] => Ok(only.serial.clone()),
        [] => Err(Error::DeviceUnreachable { detail: seen() }),
        _ => Err(Error::DeviceUnreachable {
            detail: format!(
                "several devices ready ({}); set ANDROID_SERIAL to pick one",
                seen()
            ),
        }),
    }
}

/// Phone access for the backup, delete and restore steps.
pub struct PhoneClient<B: DeviceBridge = AdbBridge> {
    bridge: B,
    serial: String,
}

impl PhoneClient<AdbBridge> {
    /// Probe the bridge and bind to the single ready (or configured) device.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let probe = AdbBridge::new(settings.adb_path.clone(), settings.wsl_interop);
        let entries = probe.devices().await?;
        let serial = select_device(&entries, settings.device_serial.as_deref())?;
        log::info!("using device {serial}");
        Ok(Self {
            bridge: probe.with_serial(serial.clone()),
            serial,
        })
    }
}

impl<B: DeviceBridge> PhoneClient<B> {
    #[cfg(test)]
    pub fn with_bridge(bridge: B, serial: impl Into<String>) -> Self {
        Self {
            bridge,
            serial: serial.into(),
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Run a full backup: session folder, copies, manifest, delete-candidates script.
    pub async fn backup(&self, request: &BackupRequest) -> Result<BackupOutcome> {
        log::debug!(
            "backup serial={} root={} media_dirs={:?} extra_dirs={:?}",
            self.serial,
            request.backup_root.display(),
            request.media_dirs,
            request.extra_dirs
        );
        let sources = plan_sources(&request.media_dirs, &request.extra_dirs)?;
        let ignore = build_ignore_set(&request.ignore_patterns)?;

        let now = Local::now();
        let session = Session::create(&request.backup_root, now)?;
        println!("Session folder: {}", session.dir.display());

        let report = BridgeBackuper::new(&self.bridge)
            .backup_all(&session, &sources)
            .await;

        let manifest = Manifest {
            session: session.name.clone(),
            created_at: now.to_rfc3339(),
            device: self.serial.clone(),
            sources: report.sources.iter().map(|s| s.to_manifest()).collect(),
        };
        session.write_manifest(&manifest)?;

        let candidates = report.delete_candidates(&ignore);
        let script = if candidates.is_empty() {
            None
        } else {
            let path = session.script_path();
            crate::script::write(&path, &session.name, &self.serial, &candidates)?;
            Some(path)
        };

        Ok(BackupOutcome {
            session,
            report,
            candidates,
            script,
        })
    }

    pub async fn delete_files(&self, paths: &[String]) -> Result<DeleteReport> {
        log::debug!(
            "delete_files serial={} paths_count={}",
            self.serial,
            paths.len()
        );
        BridgeDeleter::new(&self.bridge).delete(paths).await
    }

    pub async fn restore_session(
        &self,
        session: &Session,
        targets: &[RestoreTarget],
    ) -> Result<RestoreReport> {
        log::debug!(
            "restore_session serial={} session={} targets={}",
            self.serial,
            session.name,
            targets.len()
        );
        BridgeRestorer::new(&self.bridge)
            .restore(&session.dir, targets)
            .await
    }
}

/// Session folders to push back, and the media folders left out with the reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestorePlan {
    pub targets: Vec<RestoreTarget>,
    pub skipped: Vec<(String, String)>,
}

/// Plan a restore from the session manifest (copied media sources only), or
/// from the configured media directories when the session has no manifest.
pub fn restore_plan(session: &Session, media_dirs: &[String]) -> Result<RestorePlan> {
    let Some(manifest) = session.read_manifest()? else {
        log::info!(
            "{} has no manifest; using configured media directories",
            session.name
        );
        let targets = media_dirs
            .iter()
            .map(|dir| {
                let phone_dir = normalize_phone_dir(dir);
                Ok(RestoreTarget {
                    folder: folder_name(&phone_dir)?,
                    phone_dir,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(RestorePlan {
            targets,
            skipped: Vec::new(),
        });
    };

    let mut plan = RestorePlan::default();
    for source in manifest.sources {
        if source.kind != SourceKind::Media {
            continue;
        }
        match source.outcome {
            SourceOutcome::Copied => plan.targets.push(RestoreTarget {
                folder: source.folder,
                phone_dir: source.phone_dir,
            }),
            SourceOutcome::Missing => plan.skipped.push((
                source.folder,
                format!("{} was not on the phone at backup time", source.phone_dir),
            )),
            SourceOutcome::Failed => {
                let reason = match source.error {
                    Some(error) => format!("backup of {} failed: {error}", source.phone_dir),
                    None => format!("backup of {} failed", source.phone_dir),
                };
                plan.skipped.push((source.folder, reason));
            }
        }
    }
    Ok(plan)
}
