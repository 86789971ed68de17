use assert_cmd::Command;
use libtest_mimic::{Failed, Trial};
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub type TestResult = std::result::Result<(), Failed>;

/// Stand-in for `adb` that maps `/sdcard` onto `$FAKE_PHONE_ROOT/sdcard`.
const FAKE_ADB: &str = r#"#!/bin/sh
root="$FAKE_PHONE_ROOT"
if [ "$1" = "-s" ]; then
    shift 2
fi
cmd="$1"
shift
case "$cmd" in
    devices)
        echo "List of devices attached"
        if [ -n "$FAKE_ADB_OFFLINE" ]; then
            printf 'FAKE0001\toffline\n'
        else
            printf 'FAKE0001\tdevice\n'
        fi
        ;;
    shell)
        script=$(printf '%s' "$1" | sed "s#'/sdcard#'$root/sdcard#g")
        sh -c "$script" | sed "s#^$root##"
        ;;
    pull)
        cp -R "$root$1" "$2"
        ;;
    push)
        mkdir -p "$(dirname "$root$2")" && cp "$1" "$root$2"
        ;;
    *)
        echo "unsupported command: $cmd" >&2
        exit 1
        ;;
esac
"#;

/// Keys the user's shell may carry that would leak into a run.
const CLEARED_ENV: &[&str] = &[
    "ADB_PATH_WSL",
    "BACKUP_ROOT_WSL",
    "PHONE_EXTRA_DIRS",
    "DELETE_IGNORE_PATTERNS",
    "DOWNLOAD_IGNORE_PATTERNS",
    "ANDROID_SERIAL",
    "FAKE_ADB_OFFLINE",
];

/// A temporary phone, backup root and working directory wired to the fake bridge.
pub struct PhoneFixture {
    dir: TempDir,
}

impl PhoneFixture {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("phone/sdcard"))?;
        fs::create_dir_all(dir.path().join("backups"))?;
        fs::create_dir_all(dir.path().join("work"))?;

        let adb = dir.path().join("adb");
        fs::write(&adb, FAKE_ADB)?;
        fs::set_permissions(&adb, fs::Permissions::from_mode(0o755))?;

        Ok(Self { dir })
    }

    fn phone_root(&self) -> PathBuf {
        self.dir.path().join("phone")
    }

    fn local(&self, phone_path: &str) -> PathBuf {
        self.phone_root().join(phone_path.trim_start_matches('/'))
    }

    pub fn backup_root(&self) -> PathBuf {
        self.dir.path().join("backups")
    }

    pub fn put(&self, phone_path: &str, content: &[u8]) -> io::Result<()> {
        let path = self.local(phone_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    pub fn remove(&self, phone_path: &str) -> io::Result<()> {
        fs::remove_file(self.local(phone_path))
    }

    pub fn exists(&self, phone_path: &str) -> bool {
        self.local(phone_path).is_file()
    }

    pub fn read(&self, phone_path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.local(phone_path))
    }

    /// Session folders under the backup root, oldest first.
    pub fn sessions(&self) -> io::Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(self.backup_root())? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// The delete script of the only session.
    pub fn only_script(&self) -> Result<PathBuf, Failed> {
        let sessions = self.sessions()?;
        let [session] = sessions.as_slice() else {
            return Err(format!("expected one session, found {}", sessions.len()).into());
        };
        let name = file_name(session);
        Ok(session.join(format!("delete_candidates_{name}.txt")))
    }

    /// `droidsweep` bound to this fixture, backing up `media_dirs`.
    pub fn cmd(&self, media_dirs: &str) -> Command {
        let mut cmd = droidsweep_cmd();
        for key in CLEARED_ENV {
            cmd.env_remove(key);
        }
        cmd.current_dir(self.dir.path().join("work"))
            .env("ADB_PATH", self.dir.path().join("adb"))
            .env("BACKUP_ROOT", self.backup_root())
            .env("PHONE_MEDIA_DIRS", media_dirs)
            .env("ADB_WSL_INTEROP", "false")
            .env("DROIDSWEEP_CONFIG", self.dir.path().join("absent.toml"))
            .env("FAKE_PHONE_ROOT", self.phone_root())
            .env("RUST_LOG", "warn");
        cmd
    }
}

pub fn droidsweep_cmd() -> Command {
    Command::cargo_bin("droidsweep").expect("droidsweep binary")
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn build_trial(name: &str, f: fn() -> TestResult) -> Trial {
    Trial::test(format!("behavior::{name}"), f)
}

#[macro_export]
macro_rules! trials {
    ($($test:ident),* $(,)?) => {
        vec![$(
            build_trial(stringify!($test), $test),
        )*]
    };
}
