//! Endpoint settings: parse/write `settings.conf`.
//!
//! Keys:
//! - `base_url`: directory host, e.g. `https://jsonplaceholder.typicode.com`
//! - `timeout_secs`: per-request timeout
//! - `sort_by`: initial sort key, `name` or `company`
//!
//! Values given on the command line win over the file.

use std::path::Path;
use std::time::Duration;

use crate::api::DEFAULT_BASE_URL;
use crate::search::SortKey;

use super::config::{config_file_write_path, parse_kv_lines};

pub const SETTINGS_FILE: &str = "settings.conf";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub sort_by: SortKey,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sort_by: SortKey::Name,
        }
    }
}

/// Command-line overrides; `None` keeps the file value.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub sort_by: Option<SortKey>,
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Parse settings text. Unknown keys and unparsable values are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for (key, value) in parse_kv_lines(contents) {
            match key {
                "base_url" => cfg.base_url = value.to_string(),
                "timeout_secs" => {
                    if let Ok(secs) = value.parse() {
                        cfg.timeout_secs = secs;
                    }
                }
                "sort_by" => {
                    if let Ok(key) = value.parse() {
                        cfg.sort_by = key;
                    }
                }
                _ => tracing::debug!(key, "ignoring unknown settings key"),
            }
        }
        cfg
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let mut buf = String::new();
        buf.push_str("# userposts-dashboard settings\n");
        buf.push_str("# Directory host serving /users and /posts?userId=\n");
        buf.push_str(&format!("base_url = {}\n", self.base_url));
        buf.push_str("# Per-request timeout in seconds\n");
        buf.push_str(&format!("timeout_secs = {}\n", self.timeout_secs));
        buf.push_str("# Initial sort key: name|company\n");
        buf.push_str(&format!("sort_by = {}\n", self.sort_by));
        std::fs::write(path, buf)
    }

    /// Load `settings.conf` from `dir`, writing the
    /// defaults there if no file exists yet.
    pub fn load_or_init(dir: &Path) -> Self {
        let own = dir.join(SETTINGS_FILE);
        if own.is_file() {
            return Self::from_file(&own).unwrap_or_default();
        }
        let cfg = Self::default();
        let path = config_file_write_path(dir, SETTINGS_FILE);
        if let Err(err) = cfg.write_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default settings");
        }
        cfg
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(key) = overrides.sort_by {
            self.sort_by = key;
        }
        self
    }
}
