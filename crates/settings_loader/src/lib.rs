//! # Settings Loader
//!
//! Loads the Flex report settings (`settings.json`): the statement input
//! directory, the optional JSON report path, output formatting and the
//! default log level. Every field has a default, so `{}` is a valid file.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/flex.json")?;
//!
//! // Load from default location
//! let settings = settings_loader::load_default_settings()?;
//!
//! // Explicit path, else ./settings.json, else built-in defaults
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_settings_with_fallback(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;
use tracing::debug;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Uses the given path when provided (it must exist), otherwise settings.json in
/// the current directory when present, otherwise the built-in defaults.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Settings> {
    load_settings_from(path, Path::new(DEFAULT_SETTINGS_FILE))
}

fn load_settings_from(path: Option<&PathBuf>, default_path: &Path) -> Result<Settings> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(settings);
    }

    if settings_file_exists(default_path) {
        return load_settings(default_path);
    }

    debug!("no settings file found, using defaults");
    Ok(Settings::default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}
