//! Log file location, ANSI stripping, and timestamps.
use std::fs;
use std::path::PathBuf;

/// Directory under the cache root that holds the log files.
const APP_DIR: &str = "revit-addin-deployer";

/// Remove ANSI escape sequences from `s`.
///
/// A CSI sequence (`ESC [` ... final byte in `@..=~`) is dropped whole; any
/// other escape drops only itself and the character after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            let _ = chars.by_ref().find(|inner| ('@'..='~').contains(inner));
        } else {
            chars.next();
        }
    }
    out
}

/// Cache root: `$XDG_CACHE_HOME`, else `%LOCALAPPDATA%`, else
/// `$HOME/.cache` (`%USERPROFILE%\.cache` when `HOME` is unset).
fn cache_root() -> PathBuf {
    let non_empty = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty());
    if let Some(dir) = non_empty("XDG_CACHE_HOME").or_else(|| non_empty("LOCALAPPDATA")) {
        return PathBuf::from(dir);
    }
    non_empty("HOME")
        .or_else(|| non_empty("USERPROFILE"))
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".cache")
}

/// Path of the log file for `command`, creating its directory.
///
/// Returns `None` when the directory cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_root().join(APP_DIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC date and time, `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current UTC time, `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
