use crate::config::Settings;
use crate::config::loader::{SettingsRequest, resolve};
use crate::error::{Error, Result};

use super::entry::{Args, Command, GlobalOptions};
use super::prompts::Prompt;

pub struct CliContext {
    options: GlobalOptions,
    command: Command,
    settings: Settings,
    prompt: Prompt,
}

impl CliContext {
    pub fn from_args(args: Args, prompt: Prompt) -> Result<Self> {
        let request = SettingsRequest {
            adb_path: args.global.adb.clone(),
            backup_root: args.global.backup_root.clone(),
            config_file: args.global.config.clone(),
        };

        let settings = resolve(request)?;
        log::debug!("resolved settings: {settings:?}");

        Ok(Self {
            options: args.global,
            command: args.command,
            settings,
            prompt,
        })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_non_interactive(&self) -> bool {
        self.options.non_interactive
    }

    pub fn ensure_interactive(&self, action: &str) -> Result<()> {
        if self.is_non_interactive() {
            Err(Error::non_interactive(action))
        } else {
            Ok(())
        }
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }
}
