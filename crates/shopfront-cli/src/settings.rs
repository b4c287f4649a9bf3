//! Saved settings.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use shopfront_core::ControllerConfig;

/// Settings stored as `settings.json` in the data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Store directory; defaults to `store/` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,
    pub controller: ControllerConfig,
}

impl Settings {
    /// Resolve the store directory: the flag wins, then the saved setting,
    /// then the data directory.
    pub fn store_root(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.store.clone()) {
            Some(path) => Ok(path),
            None => Ok(data_dir()?.join("store")),
        }
    }
}

fn data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "shopfront").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

fn settings_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("settings.json"))
}

/// Load settings, falling back to defaults when none are saved.
pub fn load() -> Result<Settings> {
    let path = settings_path()?;

    if !path.exists() {
        return Ok(Settings::default());
    }

    let json = fs::read_to_string(&path).context("Failed to read settings file")?;
    serde_json::from_str(&json).context("Invalid settings file")
}

/// Save settings to disk.
pub fn save(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).context("Failed to write settings file")?;
    Ok(path)
}
