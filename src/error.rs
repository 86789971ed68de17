use snafu::Snafu;
use std::path::PathBuf;
use toml::de::Error as TomlDeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Setting '{key}' is required but not configured"))]
    MissingSetting { key: String },

    #[snafu(display("Invalid value for '{key}': {message}"))]
    InvalidSetting { key: String, message: String },

    #[snafu(display("Failed to read config file '{}': {source}", path.display()))]
    ConfigFileIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse config file '{}': {source}", path.display()))]
    ConfigFileParse { path: PathBuf, source: TomlDeError },

    #[snafu(display(
        "Device bridge not found at '{program}'. Hint: set ADB_PATH or pass --adb"
    ))]
    BridgeNotFound { program: String },

    #[snafu(display("Failed to run '{program}': {source}"))]
    BridgeSpawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("Device bridge command '{command}' failed: {stderr}"))]
    BridgeCommandFailed { command: String, stderr: String },

    #[snafu(display(
        "No connected/authorized device: {detail}. Make sure USB debugging is on and allowed"
    ))]
    DeviceUnreachable { detail: String },

    #[snafu(display("Path not found on phone: {path}"))]
    PhonePathNotFound { path: String },

    #[snafu(display("Invalid phone path: {path}"))]
    InvalidPhonePath { path: String },

    #[snafu(display("Cannot write '{}': {source}", path.display()))]
    LocalWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Cannot express '{}' as a Windows path for the bridge", path.display()))]
    WslPath { path: PathBuf },

    #[snafu(display("Failed to back up '{phone_dir}': {source}"))]
    BackupDirFailed {
        phone_dir: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to restore '{folder}' to '{phone_dir}': {source}"))]
    RestoreDirFailed {
        folder: String,
        phone_dir: String,
        source: Box<Error>,
    },

    #[snafu(display("Partial backup: {} director(ies) failed: {}", failed_dirs.len(), failed_dirs.join(", ")))]
    PartialBackup { failed_dirs: Vec<String> },

    #[snafu(display("Partial deletion failure: {} path(s) failed to delete", failed_paths.len()))]
    PartialDeletion { failed_paths: Vec<String> },

    #[snafu(display(
        "Partial restore: {} folder(s) unreadable, {} file(s) failed to push",
        failed_folders.len(),
        failed_files.len()
    ))]
    PartialRestore {
        failed_folders: Vec<String>,
        failed_files: Vec<String>,
    },

    #[snafu(display("Failed to read delete script '{}': {source}", path.display()))]
    ScriptRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{}:{line}: expected `rm '<absolute phone path>'`, found: {content}", path.display()))]
    InvalidScriptLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[snafu(display("No backup sessions found under '{}'", root.display()))]
    NoSessions { root: PathBuf },

    #[snafu(display("Backup session '{name}' not found"))]
    SessionNotFound { name: String },

    #[snafu(display("Invalid session manifest '{}': {source}", path.display()))]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Invalid ignore pattern '{pattern}': {source}"))]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[snafu(display("Invalid argument: {message}"))]
    InvalidArgument { message: String },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    #[snafu(display("JSON serialization error: {source}"))]
    Json { source: serde_json::Error },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json { source: error }
    }
}

impl Error {
    pub fn non_interactive(action: &str) -> Self {
        Error::InvalidArgument {
            message: format!(
                "{action} requires interactive input. Hint: rerun without --non-interactive or pass --force."
            ),
        }
    }
}

/// Wrap the error of `$expr` into a context variant that carries a boxed source.
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {
        $expr.map_err(|err| $crate::error::Error::$variant {
            $($field: $value,)*
            source: Box::new(err.into()),
        })
    };
}
