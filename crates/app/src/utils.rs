//! Settings file handling

use shared::settings::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// `<config dir>/settings.json`
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com.local", "Mind Chat", "MindChat")
        .map(|proj| proj.config_dir().join("settings.json"))
}

/// Load settings from disk, or defaults. The flag is true when defaults were used.
pub fn load_settings_or_default() -> (AppSettings, bool) {
    match config_path() {
        Some(path) => load_settings_from(&path),
        None => {
            tracing::warn!("no config directory available, using default settings");
            (AppSettings::default(), true)
        }
    }
}

pub fn load_settings_from(path: &Path) -> (AppSettings, bool) {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice::<AppSettings>(&bytes) {
            Ok(settings) => return (settings, false),
            Err(e) => tracing::warn!("ignoring unreadable settings {}: {}", path.display(), e),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // First run: write the defaults so there is a file to edit.
            let defaults = AppSettings::default();
            if let Err(e) = save_settings_to(path, &defaults) {
                tracing::warn!("could not write default settings: {}", e);
            }
            return (defaults, true);
        }
        Err(e) => tracing::warn!("could not read settings {}: {}", path.display(), e),
    }
    (AppSettings::default(), true)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
