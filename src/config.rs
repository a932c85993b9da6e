//! TOML configuration: form defaults and catalog exclusions.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chart_data::ChartType;

/// Application configuration. Every field has a default so a missing or
/// partial config file is always usable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chart type selected after a new query or a full reset.
    pub default_chart_type: ChartType,
    /// Seconds before transient success banners clear.
    pub banner_secs: u64,
    /// Rows shown per table preview.
    pub preview_rows: usize,
    /// Extra table names hidden from the catalog, merged with the built-in
    /// internal set.
    pub excluded_tables: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_chart_type: ChartType::Bar,
            banner_secs: 3,
            preview_rows: 10,
            excluded_tables: Vec::new(),
        }
    }
}

/// Manages the config directory and config file operations.
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for
    /// testing).
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name.
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Ensure the config directory exists.
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Load the config file, falling back to defaults when it is absent.
    pub fn load(&self) -> Result<AppConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&contents)
            .map_err(|e| eyre!("Failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Write the config file, creating the directory if needed.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.ensure_config_dir()?;
        let contents = toml::to_string_pretty(config)?;
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }
}
