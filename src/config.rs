use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::PickerConfig;

pub fn default_config_path() -> Result<PathBuf, AppError> {
    let dirs = directories::ProjectDirs::from("dev", "frogger", "frogger-picker")
        .ok_or_else(|| AppError::Config("could not resolve config directory".to_string()))?;
    Ok(dirs.config_dir().join("config.json"))
}

/// Reads the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PickerConfig, AppError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(PickerConfig::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
}

pub fn save_config(path: &Path, config: &PickerConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
