//! Settings loader

use crate::error::{Error, Result};
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// Environment variable overriding `config_path`
pub const ENV_CONFIG_PATH: &str = "UCIWALL_CONFIG_PATH";

/// Environment variable overriding `log_filter`
pub const ENV_LOG_FILTER: &str = "UCIWALL_LOG";

/// Settings loader
pub struct SettingsLoader;

impl SettingsLoader {
    /// Resolve settings: explicit file, else the per-user file if present,
    /// else defaults; then environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Settings> {
        let settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::user_settings_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Settings::default(),
            },
        };

        Ok(Self::apply_env(settings, |key| std::env::var(key).ok()))
    }

    /// `<config dir>/uciwall/settings.toml`
    pub fn user_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("uciwall").join("settings.toml"))
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Settings> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Settings(format!("Failed to read {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        Self::from_toml(&content)
    }

    /// Parse TOML settings
    pub fn from_toml(content: &str) -> Result<Settings> {
        toml::from_str(content).map_err(|e| Error::Settings(format!("Invalid TOML: {}", e)))
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(mut settings: Settings, lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_CONFIG_PATH).filter(|v| !v.is_empty()) {
            settings.config_path = PathBuf::from(path);
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|v| !v.is_empty()) {
            settings.log_filter = filter;
        }
        settings
    }
}
