use crate::error::{Error, Result};
use crate::phone::utils::path::wsl_to_windows;
use crate::utils::shell_quote;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// One line of `adb devices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub serial: String,
    pub state: String,
}

impl DeviceEntry {
    pub fn is_ready(&self) -> bool {
        self.state == "device"
    }
}

/// Result of asking the phone to remove one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The file was already gone (stale reference).
    Missing,
    Failed(String),
}

/// Everything the tool ever asks of the phone.
pub trait DeviceBridge {
    async fn devices(&self) -> Result<Vec<DeviceEntry>>;

    async fn dir_exists(&self, dir: &str) -> Result<bool>;

    /// Every regular file below `dir`, as absolute phone paths.
    async fn list_files(&self, dir: &str) -> Result<Vec<String>>;

    /// Copy the phone directory `remote` to the local path `local`, which must not exist yet.
    async fn pull(&self, remote: &str, local: &Path) -> Result<()>;

    /// Copy one local file to `remote`, replacing whatever is there.
    async fn push(&self, local: &Path, remote: &str) -> Result<()>;

    async fn remove(&self, path: &str) -> Result<RemoveOutcome>;
}

/// [`DeviceBridge`] backed by the `adb` executable.
#[derive(Debug, Clone)]
pub struct AdbBridge {
    program: String,
    serial: Option<String>,
    wsl_interop: bool,
}

impl AdbBridge {
    pub fn new(program: impl Into<String>, wsl_interop: bool) -> Self {
        Self {
            program: program.into(),
            serial: None,
            wsl_interop,
        }
    }

    /// Target a specific device for every later command.
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    fn local_arg(&self, local: &Path) -> Result<OsString> {
        if self.wsl_interop {
            let absolute = std::path::absolute(local)?;
            Ok(wsl_to_windows(&absolute)?.into())
        } else {
            Ok(local.as_os_str().to_owned())
        }
    }

    async fn run(&self, args: &[OsString], targeted: bool) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        if targeted && let Some(serial) = self.serial.as_deref() {
            cmd.arg("-s").arg(serial);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!(
            "bridge exec program={} serial={:?} args={:?}",
            self.program,
            self.serial,
            args
        );

        let output = cmd.output().await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::BridgeNotFound {
                    program: self.program.clone(),
                }
            } else {
                Error::BridgeSpawn {
                    program: self.program.clone(),
                    source,
                }
            }
        })?;

        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            Err(Error::BridgeCommandFailed {
                command: describe(args),
                stderr,
            })
        }
    }

    async fn shell(&self, script: String) -> Result<String> {
        let output = self
            .run(&[OsString::from("shell"), OsString::from(script)], true)
            .await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            log::warn!("adb shell stderr: {}", stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a shell snippet that reports its verdict as one word on the last line.
    async fn shell_verdict(&self, script: String) -> Result<String> {
        let stdout = self.shell(script.clone()).await?;
        last_line(&stdout)
            .map(str::to_string)
            .ok_or_else(|| Error::BridgeCommandFailed {
                command: format!("shell {script}"),
                stderr: "no output".to_string(),
            })
    }
}

impl DeviceBridge for AdbBridge {
    async fn devices(&self) -> Result<Vec<DeviceEntry>> {
        let output = self.run(&[OsString::from("devices")], false).await?;
        Ok(parse_devices(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn dir_exists(&self, dir: &str) -> Result<bool> {
        let quoted = shell_quote(dir);
        let verdict = self
            .shell_verdict(format!(
                "if [ -d {quoted} ]; then echo present; else echo absent; fi"
            ))
            .await?;
        match verdict.as_str() {
            "present" => Ok(true),
            "absent" => Ok(false),
            other => Err(Error::BridgeCommandFailed {
                command: format!("shell test -d {quoted}"),
                stderr: format!("unexpected output: {other}"),
            }),
        }
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let stdout = self
            .shell(format!("find {} -type f 2>/dev/null", shell_quote(dir)))
            .await?;
        let mut files: Vec<String> = stdout
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        files.sort();
        Ok(files)
    }

    async fn pull(&self, remote: &str, local: &Path) -> Result<()> {
        let local = self.local_arg(local)?;
        self.run(&[OsString::from("pull"), OsString::from(remote), local], true)
            .await?;
        Ok(())
    }

    async fn push(&self, local: &Path, remote: &str) -> Result<()> {
        let local = self.local_arg(local)?;
        self.run(&[OsString::from("push"), local, OsString::from(remote)], true)
            .await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<RemoveOutcome> {
        let quoted = shell_quote(path);
        let verdict = self
            .shell_verdict(format!(
                "if [ -e {quoted} ]; then rm -f {quoted} && echo removed || echo failed; else echo missing; fi"
            ))
            .await?;
        Ok(match verdict.as_str() {
            "removed" => RemoveOutcome::Removed,
            "missing" => RemoveOutcome::Missing,
            other => RemoveOutcome::Failed(format!("rm reported '{other}'")),
        })
    }
}

/// Parse the output of `adb devices`.
pub fn parse_devices(output: &str) -> Vec<DeviceEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            let state = parts.next()?;
            Some(DeviceEntry {
                serial: serial.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}

fn last_line(output: &str) -> Option<&str> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
}

fn describe(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
