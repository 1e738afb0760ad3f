//! Application settings
//!
//! Settings live in `<config_dir>/consumer-insights/config.json`. A missing
//! file yields the defaults; unknown or missing keys fall back per field.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CSV ingestion options applied to every upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Rows scanned to infer column types (`None` scans the whole file)
    pub infer_schema_length: Option<usize>,
    /// Field separator
    pub separator: char,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            infer_schema_length: Some(10_000),
            separator: ',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Also write daily-rotated log files to the data directory
    pub to_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            to_file: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub csv: CsvSettings,
    pub logging: LoggingSettings,
    /// Rows shown in the data preview after an upload
    pub preview_rows: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            csv: CsvSettings::default(),
            logging: LoggingSettings::default(),
            preview_rows: 10,
        }
    }
}

impl AppSettings {
    /// Default location of the settings file
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("consumer-insights").join("config.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings from `path`, or defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Self =
            serde_json::from_str(&contents).context("Failed to parse settings JSON")?;

        if !settings.csv.separator.is_ascii() {
            anyhow::bail!(
                "CSV separator must be a single ASCII character, got {:?}",
                settings.csv.separator
            );
        }

        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }
}
