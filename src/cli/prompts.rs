use std::io;

use dialoguer::{Confirm, Select};
use tokio::task;

use crate::error::{Error, Result};

/// Interactive prompt mode for CLI operations
#[derive(Debug, Clone, Copy)]
pub enum Prompt {
    /// Console-based interactive prompts using dialoguer
    Console,
    /// Non-interactive mode that uses defaults or fails
    NonInteractive,
}

impl Prompt {
    pub fn new(interactive: bool) -> Self {
        if interactive {
            Self::Console
        } else {
            Self::NonInteractive
        }
    }

    pub async fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        match self {
            Prompt::Console => {
                let prompt = message.to_string();
                let result = task::spawn_blocking(move || {
                    Confirm::new()
                        .with_prompt(prompt)
                        .default(default)
                        .interact()
                })
                .await
                .map_err(join_error)?;

                result.map_err(|err| Error::InvalidArgument {
                    message: err.to_string(),
                })
            }
            Prompt::NonInteractive => Ok(default),
        }
    }

    /// Pick one of `items`; non-interactive mode takes `default`.
    pub async fn select(&self, message: &str, items: Vec<String>, default: usize) -> Result<usize> {
        match self {
            Prompt::Console => {
                let prompt = message.to_string();
                let result = task::spawn_blocking(move || {
                    Select::new()
                        .with_prompt(prompt)
                        .items(&items)
                        .default(default)
                        .interact()
                })
                .await
                .map_err(join_error)?;

                result.map_err(|err| Error::InvalidArgument {
                    message: err.to_string(),
                })
            }
            Prompt::NonInteractive => Ok(default),
        }
    }
}

fn join_error(err: task::JoinError) -> Error {
    Error::Io {
        source: io::Error::other(err.to_string()),
    }
}
