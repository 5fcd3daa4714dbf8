//! Persistent settings of the `datadiff` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use datadiff_session::SessionConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_FILE: &str = "datadiff.toml";

/// Keys accepted by `datadiff config`.
pub const KEYS: &[&str] = &[
    "page_size",
    "base_dir",
    "mod_dir",
    "session.encodings",
    "session.text_extensions",
    "session.json_extensions",
    "session.table_extensions",
    "session.sprite_extensions",
    "session.granularity",
    "session.progress_interval",
];

/// Settings of the command-line shell, persisted as TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Changes shown per page by `scan`.
    pub page_size: usize,
    /// Original folder used by the last scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Mod folder used by the last scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_dir: Option<PathBuf>,
    /// Comparison settings.
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            base_dir: None,
            mod_dir: None,
            session: SessionConfig::default(),
        }
    }
}

/// The settings file to use: the explicit one, or `datadiff.toml` here.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(DEFAULT_FILE), Path::to_path_buf)
}

impl AppConfig {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Write settings to `path` as TOML.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Remember the folders of a scan. Returns `true` if they were new.
    pub fn remember_folders(&mut self, base: &Path, mod_dir: &Path) -> bool {
        let base = Some(base.to_path_buf());
        let mod_dir = Some(mod_dir.to_path_buf());
        if self.base_dir == base && self.mod_dir == mod_dir {
            return false;
        }
        self.base_dir = base;
        self.mod_dir = mod_dir;
        true
    }

    /// Current value of a dotted key, rendered as TOML.
    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        check_key(key)?;
        let tree = toml::Value::try_from(self)?;
        let value = key.split('.').try_fold(&tree, |node, part| node.get(part));
        Ok(value.map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    /// Set a dotted key. The value is read as TOML (`50`, `["txt"]`) and
    /// taken as a plain string otherwise. An empty value resets the key.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        check_key(key)?;
        let mut tree = toml::Value::try_from(&*self)?;
        let (parents, leaf) = key.rsplit_once('.').unwrap_or(("", key));

        let mut table = tree.as_table_mut().context("settings are not a table")?;
        for part in parents.split('.').filter(|p| !p.is_empty()) {
            table = table
                .get_mut(part)
                .and_then(toml::Value::as_table_mut)
                .with_context(|| format!("unknown key {key}"))?;
        }
        if value.is_empty() {
            table.remove(leaf);
        } else {
            table.insert(leaf.to_string(), parse_value(value));
        }

        *self = tree
            .try_into()
            .with_context(|| format!("invalid value for {key}: {value}"))?;
        Ok(())
    }
}

fn check_key(key: &str) -> anyhow::Result<()> {
    if !KEYS.contains(&key) {
        bail!("unknown key {key} (expected one of: {})", KEYS.join(", "));
    }
    Ok(())
}

fn parse_value(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {raw}"))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
