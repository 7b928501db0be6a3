//! Config file locations and the shared `key = value` line format.
//!
//! Files live in `$XDG_CONFIG_HOME/userposts-dashboard/`, falling back to
//! `$HOME/.config/userposts-dashboard/`. When neither variable is set, the
//! working directory is used.

use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "userposts-dashboard";

/// Directory that holds `theme.conf`, `keybinds.conf` and `settings.conf`.
pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(".")
}

/// `dir/name`, creating `dir` if needed.
pub fn config_file_write_path(dir: &Path, name: &str) -> PathBuf {
    if let Err(err) = std::fs::create_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), error = %err, "could not create config dir");
    }
    dir.join(name)
}

/// Non-empty, non-comment `key = value` pairs, both sides trimmed.
pub fn parse_kv_lines(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (lhs, rhs) = line.split_once('=')?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        (!lhs.is_empty() && !rhs.is_empty()).then_some((lhs, rhs))
    })
}
