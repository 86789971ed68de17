//! Utility functions for user interaction and shell text handling.

/// Format deletion confirmation message with path list
pub fn format_deletion_message(paths: &[String]) -> String {
    let mut message = format!("About to delete {} file(s) from the phone:\n", paths.len());
    for path in paths.iter().take(5) {
        message.push_str(&format!("  {}\n", path));
    }
    if paths.len() > 5 {
        message.push_str(&format!("  ... and {} more\n", paths.len() - 5));
    }
    message.push_str("Continue?");
    message
}

/// Quote a value as a single POSIX shell word.
///
/// The whole value is wrapped in single quotes; embedded single quotes become `'\''`.
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// Split a line into POSIX shell words.
///
/// Handles single quotes, double quotes and backslash escapes. Returns `None`
/// when a quote is left open.
pub fn shell_split(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        c => current.push(c),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => {
                            let next = chars.next()?;
                            if !matches!(next, '"' | '\\' | '$' | '`') {
                                current.push('\\');
                            }
                            current.push(next);
                        }
                        c => current.push(c),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next()?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Some(words)
}
