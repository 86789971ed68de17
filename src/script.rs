//! The delete-candidates script: a reviewable list of `rm '<phone path>'` lines.

use crate::error::{Error, Result};
use crate::utils::{shell_quote, shell_split};
use std::fs;
use std::path::Path;

const REMOVE_VERB: &str = "rm";

/// Render the script text for a session.
pub fn render(session: &str, device: &str, paths: &[String]) -> String {
    let mut text = String::new();
    text.push_str("# droidsweep delete candidates\n");
    text.push_str(&format!("# session: {session}\n"));
    text.push_str(&format!("# device: {device}\n"));
    text.push_str(&format!("# files: {}\n", paths.len()));
    text.push_str("# Remove a line to keep that file on the phone.\n");
    text.push_str("# Lines starting with '#' and blank lines are ignored.\n");
    text.push_str("# Run with: droidsweep delete <this file>\n");
    for path in paths {
        text.push_str(REMOVE_VERB);
        text.push(' ');
        text.push_str(&shell_quote(path));
        text.push('\n');
    }
    text
}

pub fn write(path: &Path, session: &str, device: &str, paths: &[String]) -> Result<()> {
    fs::write(path, render(session, device, paths)).map_err(|source| Error::LocalWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a script; any malformed line fails the whole file.
pub fn load(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| Error::ScriptRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &text)
}

pub fn parse(path: &Path, text: &str) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = || Error::InvalidScriptLine {
            path: path.to_path_buf(),
            line: index + 1,
            content: line.to_string(),
        };

        let words = shell_split(line).ok_or_else(invalid)?;
        match words.as_slice() {
            [verb, target] if verb == REMOVE_VERB && target.starts_with('/') && target.len() > 1 => {
                entries.push(target.clone());
            }
            _ => return Err(invalid()),
        }
    }
    Ok(entries)
}
