use crate::error::{Error, Result};
use crate::phone::bridge::DeviceBridge;
use crate::phone::{AdbBridge, BackupRequest, PhoneClient, restore_plan};
use crate::script;
use crate::session::Session;
use crate::utils::format_deletion_message;
use clap::Args as ClapArgs;
use std::path::PathBuf;

use super::context::CliContext;
use super::entry::Command;

#[derive(ClapArgs, Debug, Clone)]
pub struct BackupArgs {
    /// Do not copy the backup-only extra directories
    #[arg(long)]
    pub skip_extras: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DeleteArgs {
    /// Delete-candidates script produced by `backup`
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Delete without confirmation
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RestoreArgs {
    /// Session name or folder (default: latest, or pick interactively)
    #[arg(value_name = "SESSION")]
    pub session: Option<String>,
}

pub async fn execute(command: &Command, ctx: &CliContext) -> Result<()> {
    match command {
        Command::Backup(args) => backup(args, ctx).await,
        Command::Delete(args) => delete(args, ctx).await,
        Command::Restore(args) => restore(args, ctx).await,
        Command::Sessions => sessions(ctx),
        Command::Devices => devices(ctx).await,
    }
}

async fn backup(args: &BackupArgs, ctx: &CliContext) -> Result<()> {
    let request = BackupRequest::from_settings(ctx.settings(), args.skip_extras)?;
    let client = PhoneClient::connect(ctx.settings()).await?;
    println!("Device: {}", client.serial());

    let outcome = client.backup(&request).await?;

    println!(
        "Backup finished: {} file(s) copied into {}",
        outcome.report.copied_files(),
        outcome.session.dir.display()
    );
    match &outcome.script {
        Some(path) => {
            println!(
                "Delete script: {} ({} file(s))",
                path.display(),
                outcome.candidates.len()
            );
            println!("Review it, remove lines for files to keep, then run:");
            println!("  droidsweep delete {}", path.display());
        }
        None => println!("No media files copied; no delete script written."),
    }

    let failed_dirs = outcome.report.failed_dirs();
    if failed_dirs.is_empty() {
        Ok(())
    } else {
        Err(Error::PartialBackup { failed_dirs })
    }
}

async fn delete(args: &DeleteArgs, ctx: &CliContext) -> Result<()> {
    let paths = script::load(&args.script)?;
    if paths.is_empty() {
        println!("{} lists no files; nothing to delete.", args.script.display());
        return Ok(());
    }

    if !args.force {
        ctx.ensure_interactive("delete")?;
        let confirmed = ctx
            .prompt()
            .confirm(&format_deletion_message(&paths), false)
            .await?;
        if !confirmed {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let client = PhoneClient::connect(ctx.settings()).await?;
    let report = client.delete_files(&paths).await?;

    println!(
        "Deleted {} file(s); {} already gone; {} failed.",
        report.removed.len(),
        report.missing.len(),
        report.failed.len()
    );
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(Error::PartialDeletion {
            failed_paths: report.failed_paths(),
        })
    }
}

async fn restore(args: &RestoreArgs, ctx: &CliContext) -> Result<()> {
    let settings = ctx.settings();
    let session = match args.session.as_deref() {
        Some(selector) => Session::open(settings.backup_root.as_deref(), selector)?,
        None => choose_session(ctx).await?,
    };
    println!("Using backup session: {}", session.dir.display());

    let plan = restore_plan(&session, &settings.media_dirs)?;
    for (folder, reason) in &plan.skipped {
        println!("Skipped: {folder} ({reason})");
    }
    if plan.targets.is_empty() {
        println!("Session has no media folders to restore.");
        return Ok(());
    }

    let client = PhoneClient::connect(settings).await?;
    let report = client.restore_session(&session, &plan.targets).await?;

    println!(
        "Restore finished: {} file(s) pushed, {} folder(s) skipped, {} failed.",
        report.pushed,
        report.skipped_folders.len() + plan.skipped.len(),
        report.failed_folders.len() + report.failed_files.len()
    );
    if report.failed_folders.is_empty() && report.failed_files.is_empty() {
        Ok(())
    } else {
        Err(Error::PartialRestore {
            failed_folders: report.failed_folders,
            failed_files: report.failed_files,
        })
    }
}

/// Latest session, or an interactive pick defaulting to it.
async fn choose_session(ctx: &CliContext) -> Result<Session> {
    let root = ctx.settings().backup_root()?;
    if ctx.is_non_interactive() {
        return Session::latest(root);
    }

    let mut sessions = Session::list(root)?;
    let Some(latest) = sessions.len().checked_sub(1) else {
        return Err(Error::NoSessions {
            root: root.to_path_buf(),
        });
    };
    if latest == 0 {
        return Ok(sessions.swap_remove(latest));
    }

    let items = sessions.iter().map(|s| s.name.clone()).collect();
    let index = ctx
        .prompt()
        .select("Backup session to restore", items, latest)
        .await?;
    Ok(sessions.swap_remove(index))
}

fn sessions(ctx: &CliContext) -> Result<()> {
    let root = ctx.settings().backup_root()?;
    let sessions = Session::list(root)?;
    if sessions.is_empty() {
        println!("No backup sessions under {}", root.display());
        return Ok(());
    }

    for session in sessions {
        let summary = match session.read_manifest() {
            Ok(Some(manifest)) => {
                let files: usize = manifest.sources.iter().map(|s| s.files).sum();
                format!(
                    "{} source(s), {} file(s), device {}",
                    manifest.sources.len(),
                    files,
                    manifest.device
                )
            }
            Ok(None) => "no manifest".to_string(),
            Err(err) => format!("unreadable manifest: {err}"),
        };
        let script = if session.script_path().is_file() {
            "delete script"
        } else {
            "no delete script"
        };
        println!("{}  {summary}  {script}", session.name);
    }
    Ok(())
}

async fn devices(ctx: &CliContext) -> Result<()> {
    let settings = ctx.settings();
    let bridge = AdbBridge::new(settings.adb_path.clone(), settings.wsl_interop);
    let entries = bridge.devices().await?;
    if entries.is_empty() {
        println!("No devices attached.");
    }
    for entry in entries {
        println!("{}\t{}", entry.serial, entry.state);
    }
    Ok(())
}
