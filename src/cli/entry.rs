use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::Result;

use super::{
    commands::{self, BackupArgs, DeleteArgs, RestoreArgs},
    context::CliContext,
    prompts::Prompt,
};

#[derive(Parser, Debug, Clone)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "Back up Android media over adb, review a delete list, then clean the phone",
    after_help = "Settings come from flags, the environment, a .env file or config.toml \
                  (ADB_PATH, BACKUP_ROOT, PHONE_MEDIA_DIRS, PHONE_EXTRA_DIRS, \
                  DELETE_IGNORE_PATTERNS, ANDROID_SERIAL, ADB_WSL_INTEROP)."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Disable interactive prompts (fail fast when input is required)
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Config file to read instead of the default location
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the adb executable
    #[arg(long = "adb", value_name = "PATH", global = true)]
    pub adb: Option<String>,

    /// Local folder that holds the backup sessions
    #[arg(long = "backup-root", value_name = "PATH", global = true)]
    pub backup_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy the configured phone directories into a new session folder
    Backup(BackupArgs),
    /// Run a (reviewed) delete-candidates script against the phone
    Delete(DeleteArgs),
    /// Copy a session's media back to the phone
    Restore(RestoreArgs),
    /// List backup sessions
    Sessions,
    /// Show devices reported by adb
    Devices,
}

pub async fn run(args: Args) -> Result<()> {
    run_with_prompt(args, None).await
}

pub async fn run_with_prompt(args: Args, prompt: Option<Prompt>) -> Result<()> {
    let prompt = prompt.unwrap_or_else(|| Prompt::new(!args.global.non_interactive));

    let ctx = CliContext::from_args(args, prompt)?;
    commands::execute(ctx.command(), &ctx).await
}
